// UI layer: terminal front-end for the import.
// Reads the word list, signs in behind a spinner, prints the word sets,
// asks for the target set and streams one status line per word.

use crate::api::{ApiClient, Credentials, DictionaryListing};
use crate::config::Config;
use crate::import::{Importer, Outcome, WordReport};
use crate::models::DictionaryId;
use crate::words;
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal};
use std::path::Path;
use std::time::Duration;

/// Run a full import for one account and one word list.
pub fn run(config: Config, credentials: Credentials, words_path: &Path) -> Result<()> {
    // Read the list first so a bad path fails before any network traffic.
    let entries = words::load(words_path)
        .with_context(|| format!("Failed to read word list {}", words_path.display()))?;

    let client = ApiClient::new(config, credentials).context("Failed to build API client")?;
    let mut importer = Importer::new(client);

    let spinner = spinner("Signing in...");
    let listing = importer.connect();
    spinner.finish_and_clear();
    let listing = listing.context("Login failed")?;

    print_dictionaries(&listing);

    // The id is not checked against the table: whatever the user picks is
    // sent as `wordSetId`, even when the table above is empty.
    let selection = prompt_selection()?;
    let dictionary_id = DictionaryId::from(selection.as_str());

    // Each word is printed as soon as it is done. Failures show up as a
    // red line and the import carries on with the next word.
    importer.import_all(&entries, &dictionary_id, print_report);
    Ok(())
}

/// Ask for the target word set id.
///
/// On a terminal `dialoguer` draws the prompt. When stdin is a pipe or a
/// file, dialoguer would hand back an empty string, so the line is read
/// directly instead.
fn prompt_selection() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        let selection: String = Input::new()
            .with_prompt("Select id of dictionary")
            .interact_text()?;
        return Ok(selection);
    }
    println!("Select id of dictionary.");
    read_selection(stdin.lock())
}

/// First line of `reader`, without the line terminator.
fn read_selection<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read dictionary selection")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_dictionaries(listing: &DictionaryListing) {
    println!("ID\tNAME");
    for d in &listing.dictionaries {
        println!("{}\t{}", d.id, d.name);
    }
    if let Some(notice) = &listing.notice {
        println!("{}", notice.as_str().yellow());
    }
}

/// One coloured line per word; the text itself comes from `WordReport`'s
/// `Display` impl so the wording stays in one place.
fn print_report(report: &WordReport) {
    let line = report.to_string();
    match report.outcome {
        Outcome::Added { .. } => println!("{}", line.green()),
        Outcome::AlreadyExists => println!("{}", line.dark_grey()),
        Outcome::NotFound => println!("{}", line.yellow()),
        Outcome::Failed(_) => println!("{}", line.red()),
    }
}
