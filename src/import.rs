// Import driver: sign in, fetch the word sets, then walk the word list one
// entry at a time. Only sign-in failures stop the run; a failing word is
// reported and the loop moves on.

use crate::api::{ApiClient, DictionaryListing, Transport};
use crate::error::ServiceError;
use crate::models::DictionaryId;
use crate::words::WordEntry;
use std::fmt;
use tracing::{info, warn};

/// What happened to a single word.
#[derive(Debug)]
pub enum Outcome {
    /// The service had no translation for it.
    NotFound,
    /// Already in the user's vocabulary.
    AlreadyExists,
    Added { dictionary_id: DictionaryId },
    Failed(ServiceError),
}

/// Outcome of one entry, with the text it came from.
#[derive(Debug)]
pub struct WordReport {
    /// Line as read from the source.
    pub raw: String,
    /// Lowercased, trimmed form sent to the service.
    pub word: String,
    pub outcome: Outcome,
}

impl WordReport {
    pub fn is_added(&self) -> bool {
        matches!(self.outcome, Outcome::Added { .. })
    }
}

impl fmt::Display for WordReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::NotFound => write!(f, "Translation not found for word {}", self.word),
            Outcome::AlreadyExists => write!(f, "Already exists: {}", self.word),
            Outcome::Added { dictionary_id } => {
                write!(f, "Added word: {} to dict {}", self.word, dictionary_id)
            }
            Outcome::Failed(err) => write!(f, "Failed to import {}: {}", self.word, err),
        }
    }
}

pub struct Importer<T: Transport> {
    client: ApiClient<T>,
}

impl<T: Transport> Importer<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Importer { client }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// Sign in and load the user's word sets. Only the sign-in can fail;
    /// listing problems come back as an empty listing with a notice.
    pub fn connect(&mut self) -> Result<DictionaryListing, ServiceError> {
        self.client.authenticate()?;
        Ok(self.client.list_dictionaries())
    }

    /// Look up one entry and add it unless it is unknown or already owned.
    pub fn import_word(&self, entry: &WordEntry, dictionary_id: &DictionaryId) -> WordReport {
        let word = entry.normalized();
        let outcome = match self.try_import(&word, dictionary_id) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(word = %word, error = %err, "word skipped");
                Outcome::Failed(err)
            }
        };
        WordReport {
            raw: entry.text.clone(),
            word,
            outcome,
        }
    }

    /// The decision for one word. Any error here is turned into
    /// `Outcome::Failed` by `import_word`, never propagated further.
    fn try_import(&self, word: &str, dictionary_id: &DictionaryId) -> Result<Outcome, ServiceError> {
        // Blank lines are looked up too; the service simply returns nothing.
        let candidates = self.client.translate(word)?;
        let first = match candidates.first() {
            Some(first) => first,
            None => return Ok(Outcome::NotFound),
        };
        // Ownership is only ever flagged on the first candidate.
        if first.is_user {
            return Ok(Outcome::AlreadyExists);
        }
        // The full candidate list goes along; `add_word` picks the most voted.
        self.client.add_word(word, &candidates, dictionary_id)?;
        Ok(Outcome::Added {
            dictionary_id: dictionary_id.clone(),
        })
    }

    /// Import every entry in order. `on_report` sees each result as soon as
    /// it is known; all of them are returned at the end.
    pub fn import_all<F>(
        &self,
        entries: &[WordEntry],
        dictionary_id: &DictionaryId,
        mut on_report: F,
    ) -> Vec<WordReport>
    where
        F: FnMut(&WordReport),
    {
        let mut reports = Vec::with_capacity(entries.len());
        // Strictly in source order, one round-trip at a time. Repeated
        // words are looked up again; nothing is deduplicated.
        for entry in entries {
            let report = self.import_word(entry, dictionary_id);
            info!(word = %report.word, added = report.is_added(), "processed");
            on_report(&report);
            reports.push(report);
        }
        reports
    }
}
