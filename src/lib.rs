// Library root
// -----------
// Batch import of a word list into a LinguaLeo vocabulary. The binary
// (`main.rs`) parses arguments and hands over to `ui::run`.
//
// Module responsibilities:
// - `api`: HTTP interactions with the service (login, word sets,
//   translations, adding words) and the cookie session.
// - `models`: request/response payloads per endpoint.
// - `words`: loading the word list.
// - `import`: the per-word decision loop.
// - `ui`: terminal flow around the importer.
// - `config`, `error`, `logger`: ambient plumbing.
pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod logger;
pub mod models;
pub mod ui;
pub mod words;

pub use api::{ApiClient, Credentials, DictionaryListing, Transport};
pub use config::Config;
pub use error::ServiceError;
pub use import::{Importer, Outcome, WordReport};
pub use words::WordEntry;
