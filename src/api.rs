// API client module: a small blocking client for the LinguaLeo service.
// Login leaves cookies in the session jar; every later call rides on them.
// The HTTP layer sits behind `Transport` so the client logic can be driven
// without a network.

use crate::config::Config;
use crate::error::ServiceError;
use crate::models::{
    AuthCredentials, AuthRequest, AuthorizedResponse, ChosenTranslation, Dictionary, DictionaryId,
    RequestContext, SetWordsAction, SetWordsRequest, TranslateData, TranslateRequest,
    TranslateResponse, TranslationCandidate, WordSetsQuery, WordSetsRequest, WordSetsResponse,
    WordValue,
};
use reqwest::blocking::{Client, Response};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a request goes over the wire. Implementations return the raw body of
/// a successful response; status and connectivity problems become
/// `ServiceError::Network`.
pub trait Transport {
    fn post_json(&self, url: &str, body: &Value, headers: HeaderMap) -> Result<String, ServiceError>;
    fn get(&self, url: &str) -> Result<String, ServiceError>;
}

/// Cookie state shared by every request after login.
pub struct Session {
    jar: Arc<Jar>,
    authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Session {
            jar: Arc::new(Jar::default()),
            authenticated: false,
        }
    }

    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether the jar holds any cookie for `url`.
    pub fn has_cookies_for(&self, url: &str) -> bool {
        reqwest::Url::parse(url)
            .ok()
            .and_then(|u| self.jar.cookies(&u))
            .is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// reqwest-backed transport wired to a session's cookie jar.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(session: &Session, config: &Config) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .cookie_provider(session.jar())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::Unexpected(format!("failed to build HTTP client: {}", e)))?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: &Value, headers: HeaderMap) -> Result<String, ServiceError> {
        // `.json()` sets Content-Type: application/json for us.
        let res = self.client.post(url).headers(headers).json(body).send()?;
        read_body(res)
    }

    fn get(&self, url: &str) -> Result<String, ServiceError> {
        let res = self.client.get(url).send()?;
        read_body(res)
    }
}

fn read_body(res: Response) -> Result<String, ServiceError> {
    let status = res.status();
    let txt = res.text()?;
    if !status.is_success() {
        return Err(ServiceError::Network(format!("{} - {}", status, txt)));
    }
    Ok(txt)
}

/// Account used to sign in.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Result of `list_dictionaries`: never an error, but possibly a message
/// explaining why the list is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictionaryListing {
    pub dictionaries: Vec<Dictionary>,
    pub notice: Option<String>,
}

/// Client for the vocabulary service. Holds credentials, configuration and
/// the cookie session for the whole run.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    config: Config,
    credentials: Credentials,
    session: Session,
}

impl ApiClient<HttpTransport> {
    /// Build a client that talks HTTPS through reqwest.
    pub fn new(config: Config, credentials: Credentials) -> Result<Self, ServiceError> {
        let session = Session::new();
        let transport = HttpTransport::new(&session, &config)?;
        Ok(ApiClient {
            transport,
            config,
            credentials,
            session,
        })
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: Config, credentials: Credentials, transport: T) -> Self {
        ApiClient {
            transport,
            config,
            credentials,
            session: Session::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sign in. The response body is not checked; cookies set by the
    /// server end up in the session jar.
    pub fn authenticate(&mut self) -> Result<(), ServiceError> {
        let req = AuthRequest {
            kind: "mixed",
            credentials: AuthCredentials {
                email: &self.credentials.email,
                password: &self.credentials.password,
            },
        };
        let mut headers = HeaderMap::new();
        let referer = HeaderValue::from_str(&self.config.referer)
            .map_err(|e| ServiceError::Unexpected(format!("invalid referer header: {}", e)))?;
        headers.insert(REFERER, referer);

        let body = to_value(&req)?;
        self.transport.post_json(&self.config.auth_url, &body, headers)?;
        self.session.authenticated = true;
        debug!(
            email = %self.credentials.email,
            cookies = self.session.has_cookies_for(&self.config.api_url),
            "signed in"
        );
        Ok(())
    }

    /// Ask the service whether the current session is still logged in.
    pub fn is_authorized(&self) -> Result<bool, ServiceError> {
        let txt = self.transport.get(&self.config.endpoint("isauthorized"))?;
        let resp: AuthorizedResponse = parse(&txt)?;
        Ok(resp.is_authorized)
    }

    /// All of the user's word sets, or the reason there are none.
    pub fn list_dictionaries(&self) -> DictionaryListing {
        match self.fetch_dictionaries() {
            Ok(dictionaries) if dictionaries.is_empty() => DictionaryListing {
                dictionaries,
                notice: Some("No user dictionaries found".into()),
            },
            Ok(dictionaries) => DictionaryListing {
                dictionaries,
                notice: None,
            },
            Err(err) => {
                warn!(error = %err, "could not load dictionaries");
                DictionaryListing {
                    dictionaries: Vec::new(),
                    notice: Some(listing_notice(&err)),
                }
            }
        }
    }

    /// Strict variant of `list_dictionaries`. Every returned set is kept,
    /// empty ones included.
    pub fn fetch_dictionaries(&self) -> Result<Vec<Dictionary>, ServiceError> {
        let req = WordSetsRequest {
            api_version: &self.config.api_version,
            request: vec![WordSetsQuery::my_all()],
            ctx: RequestContext::default(),
        };
        let txt = self.post("GetWordSets", &req)?;
        let resp: WordSetsResponse = parse(&txt)?;

        // The service fills `error` with "" or {} on success, so only a
        // non-empty value means the request failed.
        if let Some(error) = resp.error.filter(|e| e.is_set()) {
            return Err(ServiceError::Protocol {
                message: error.message(),
            });
        }
        let page = resp
            .data
            .and_then(|pages| pages.into_iter().next())
            .ok_or_else(|| ServiceError::protocol("response has no data"))?;
        Ok(page.items)
    }

    /// Translation candidates for a single (already normalized) word.
    /// An empty list is a valid answer.
    pub fn translate(&self, word: &str) -> Result<Vec<TranslationCandidate>, ServiceError> {
        let req = TranslateRequest {
            data: TranslateData {
                text: word,
                lang_pair: &self.config.lang_pair,
            },
            api_version: &self.config.api_version,
        };
        let txt = self.post("gettranslates", &req)?;
        let resp: TranslateResponse = parse(&txt)?;
        debug!(word, candidates = resp.translate.len(), "translated");
        Ok(resp.translate)
    }

    /// Add `word` to a word set using its most voted translation.
    pub fn add_word(
        &self,
        word: &str,
        candidates: &[TranslationCandidate],
        dictionary_id: &DictionaryId,
    ) -> Result<(), ServiceError> {
        let best = best_candidate(candidates)
            .ok_or_else(|| ServiceError::Unexpected(format!("no translation to add for '{}'", word)))?;

        let req = SetWordsRequest {
            data: vec![SetWordsAction {
                action: "add",
                value_list: WordValue {
                    lang_pair: &self.config.lang_pair,
                    translation: ChosenTranslation::from(best),
                    word_set_id: dictionary_id,
                    word_value: word,
                },
            }],
            api_version: &self.config.api_version,
            user_id: &self.config.user_id,
        };
        self.post("SetWords", &req)?;
        debug!(word, translation = %best.value, dictionary = %dictionary_id, "word added");
        Ok(())
    }

    fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<String, ServiceError> {
        let url = self.config.endpoint(endpoint);
        debug!(%url, "POST");
        self.transport.post_json(&url, &to_value(body)?, HeaderMap::new())
    }
}

/// Candidate with the most votes; on a tie the earliest one wins.
pub fn best_candidate(candidates: &[TranslationCandidate]) -> Option<&TranslationCandidate> {
    let mut iter = candidates.iter();
    let mut best = iter.next()?;
    for c in iter {
        if c.votes > best.votes {
            best = c;
        }
    }
    Some(best)
}

/// Two-step parse so invalid JSON and a wrong shape are told apart.
fn parse<R: DeserializeOwned>(txt: &str) -> Result<R, ServiceError> {
    let value: Value = serde_json::from_str(txt)?;
    serde_json::from_value(value).map_err(|e| ServiceError::protocol(e.to_string()))
}

fn to_value<B: Serialize>(body: &B) -> Result<Value, ServiceError> {
    serde_json::to_value(body)
        .map_err(|e| ServiceError::Unexpected(format!("failed to encode request: {}", e)))
}

fn listing_notice(err: &ServiceError) -> String {
    match err {
        ServiceError::Network(_) => "Can't get dictionaries. Problem with internet connection.".into(),
        ServiceError::MalformedResponse(_) => {
            "Error! Possibly, invalid data was received from the service.".into()
        }
        ServiceError::Protocol { message } => {
            let mut notice =
                String::from("Incorrect data received from the service. Possibly the API was changed.");
            if let Some(m) = message.as_deref().filter(|m| !m.is_empty()) {
                notice.push(' ');
                notice.push_str(m);
            }
            notice
        }
        other => format!("There's been an unexpected error: {}", other),
    }
}
