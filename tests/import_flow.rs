use leo_import::models::DictionaryId;
use leo_import::{ApiClient, Config, Credentials, Importer, Outcome, ServiceError, Transport, WordEntry};
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use std::cell::RefCell;

/// Scripted stand-in for the service. Translations are answered per word,
/// everything else with a fixed body.
struct FakeService {
    wordsets: Result<Value, String>,
    translations: Box<dyn Fn(&str) -> Result<Value, ServiceError>>,
    fail_add: bool,
    calls: RefCell<Vec<(String, Value)>>,
}

impl FakeService {
    fn new(translations: impl Fn(&str) -> Result<Value, ServiceError> + 'static) -> Self {
        FakeService {
            wordsets: Ok(json!({"data": [{"items": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]}]})),
            translations: Box::new(translations),
            fail_add: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn endpoint_calls(&self, endpoint: &str) -> Vec<Value> {
        self.calls
            .borrow()
            .iter()
            .filter(|(url, _)| url.ends_with(endpoint))
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn looked_up(&self) -> Vec<String> {
        self.endpoint_calls("/gettranslates")
            .iter()
            .map(|b| b["data"]["text"].as_str().unwrap().to_string())
            .collect()
    }
}

impl Transport for FakeService {
    fn post_json(&self, url: &str, body: &Value, _headers: HeaderMap) -> Result<String, ServiceError> {
        self.calls.borrow_mut().push((url.to_string(), body.clone()));
        if url.ends_with("/api/auth") {
            Ok("{}".into())
        } else if url.ends_with("/GetWordSets") {
            match &self.wordsets {
                Ok(v) => Ok(v.to_string()),
                Err(e) => Err(ServiceError::Network(e.clone())),
            }
        } else if url.ends_with("/gettranslates") {
            let word = body["data"]["text"].as_str().unwrap_or_default();
            (self.translations)(word).map(|v| v.to_string())
        } else if url.ends_with("/SetWords") {
            if self.fail_add {
                Err(ServiceError::Network("502 Bad Gateway".into()))
            } else {
                Ok("{}".into())
            }
        } else {
            panic!("unexpected url {}", url)
        }
    }

    fn get(&self, url: &str) -> Result<String, ServiceError> {
        panic!("unexpected GET {}", url)
    }
}

fn importer(service: FakeService) -> Importer<FakeService> {
    let creds = Credentials {
        email: "me@example.com".into(),
        password: "secret".into(),
    };
    Importer::new(ApiClient::with_transport(Config::default(), creds, service))
}

fn entries(lines: &[&str]) -> Vec<WordEntry> {
    lines.iter().map(|l| WordEntry::new(*l)).collect()
}

fn fresh(word: &str) -> Result<Value, ServiceError> {
    Ok(json!({"translate": [
        {"value": format!("{}-1", word), "votes": 3, "is_user": 0},
        {"value": format!("{}-2", word), "votes": 7, "is_user": 0},
        {"value": format!("{}-3", word), "votes": 7, "is_user": 0},
        {"value": format!("{}-4", word), "votes": 1, "is_user": 0}
    ]}))
}

#[test]
fn connect_signs_in_then_lists_dictionaries() {
    let mut imp = importer(FakeService::new(fresh));
    let listing = imp.connect().unwrap();

    assert_eq!(listing.dictionaries.len(), 2);
    assert!(imp.client().session().is_authenticated());
    let urls: Vec<String> = imp.client().transport().calls.borrow().iter().map(|(u, _)| u.clone()).collect();
    assert!(urls[0].ends_with("/api/auth"));
    assert!(urls[1].ends_with("/GetWordSets"));
}

#[test]
fn connect_survives_broken_dictionary_listing() {
    let mut service = FakeService::new(fresh);
    service.wordsets = Err("connection reset".into());
    let mut imp = importer(service);

    let listing = imp.connect().unwrap();
    assert!(listing.dictionaries.is_empty());
    assert!(listing.notice.is_some());
}

#[test]
fn one_report_per_entry_in_source_order() {
    let imp = importer(FakeService::new(fresh));
    let words = entries(&["Cat", "dog", "cat"]);

    let mut streamed = Vec::new();
    let reports = imp.import_all(&words, &DictionaryId::from("1"), |r| streamed.push(r.to_string()));

    assert_eq!(reports.len(), 3);
    assert_eq!(streamed.len(), 3);
    assert_eq!(imp.client().transport().looked_up(), vec!["cat", "dog", "cat"]);
    assert_eq!(reports[0].raw, "Cat");
    assert_eq!(streamed[0], "Added word: cat to dict 1");
}

#[test]
fn no_candidates_means_not_found_and_no_add() {
    let imp = importer(FakeService::new(|_| Ok(json!({"translate": []}))));
    let reports = imp.import_all(&entries(&["", "zzxq"]), &DictionaryId::from("1"), |_| {});

    assert!(reports.iter().all(|r| matches!(r.outcome, Outcome::NotFound)));
    assert_eq!(reports[1].to_string(), "Translation not found for word zzxq");
    assert!(imp.client().transport().endpoint_calls("/SetWords").is_empty());
}

#[test]
fn owned_first_candidate_is_never_added() {
    let imp = importer(FakeService::new(|_| {
        Ok(json!({"translate": [
            {"value": "кот", "votes": 1, "is_user": true},
            {"value": "кошка", "votes": 9, "is_user": false}
        ]}))
    }));
    let report = imp.import_word(&WordEntry::new("Cat "), &DictionaryId::from("1"));

    assert!(matches!(report.outcome, Outcome::AlreadyExists));
    assert_eq!(report.to_string(), "Already exists: cat");
    assert!(imp.client().transport().endpoint_calls("/SetWords").is_empty());
}

#[test]
fn only_first_candidate_ownership_counts() {
    let imp = importer(FakeService::new(|_| {
        Ok(json!({"translate": [
            {"value": "кот", "votes": 1, "is_user": false},
            {"value": "кошка", "votes": 9, "is_user": true}
        ]}))
    }));
    let report = imp.import_word(&WordEntry::new("cat"), &DictionaryId::from("1"));

    assert!(report.is_added());
    let adds = imp.client().transport().endpoint_calls("/SetWords");
    assert_eq!(adds[0]["data"][0]["valueList"]["translation"]["tr"], "кошка");
}

#[test]
fn selected_dictionary_and_best_translation_are_sent() {
    let mut imp = importer(FakeService::new(fresh));
    let listing = imp.connect().unwrap();
    assert_eq!(listing.dictionaries[1].id, DictionaryId::from("2"));

    // What the user typed at the prompt.
    let selection = DictionaryId::from("2\n");
    imp.import_all(&entries(&["House"]), &selection, |_| {});

    let adds = imp.client().transport().endpoint_calls("/SetWords");
    assert_eq!(adds.len(), 1);
    let value = &adds[0]["data"][0]["valueList"];
    assert_eq!(value["wordSetId"], "2");
    assert_eq!(value["wordValue"], "house");
    assert_eq!(value["translation"]["tr"], "house-2");
    assert_eq!(adds[0]["userId"], "and-1");
}

#[test]
fn failing_word_does_not_stop_the_run() {
    let imp = importer(FakeService::new(|word| {
        if word == "bad" {
            Ok(json!({"unexpected": true}))
        } else {
            fresh(word)
        }
    }));
    let reports = imp.import_all(&entries(&["good", "bad", "fine"]), &DictionaryId::from("1"), |_| {});

    assert!(reports[0].is_added());
    assert!(matches!(reports[1].outcome, Outcome::Failed(ServiceError::Protocol { .. })));
    assert!(reports[2].is_added());
    assert!(reports[1].to_string().starts_with("Failed to import bad:"));
}

#[test]
fn failed_add_is_reported_per_word() {
    let mut service = FakeService::new(fresh);
    service.fail_add = true;
    let imp = importer(service);

    let reports = imp.import_all(&entries(&["one", "two"]), &DictionaryId::from("1"), |_| {});
    assert_eq!(reports.len(), 2);
    assert!(reports
        .iter()
        .all(|r| matches!(r.outcome, Outcome::Failed(ServiceError::Network(_)))));
}
