// Entrypoint for the CLI application.
// Keeps `main` small: parse arguments, load configuration and hand over to
// the UI flow.

use clap::Parser;
use leo_import::{logger, ui, Config, Credentials};
use std::path::PathBuf;

/// Add the words of a text file to a LinguaLeo word set.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Account email
    email: String,
    /// Account password
    password: String,
    /// Word list, one word per line
    words: PathBuf,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logger::init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let credentials = Credentials {
        email: cli.email,
        password: cli.password,
    };

    ui::run(config, credentials, &cli.words)
}
