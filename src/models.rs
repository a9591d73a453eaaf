// Request and response payloads for the LinguaLeo endpoints.
// Field names follow the wire format via serde renames.

use crate::config::LangPair;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a word set. The service sends it as a number, the user
/// types it as text, so it is kept as a string either way.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DictionaryId(pub String);

impl<'de> Deserialize<'de> for DictionaryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => DictionaryId(n.to_string()),
            RawId::Text(s) => DictionaryId(s),
        })
    }
}

impl From<&str> for DictionaryId {
    fn from(s: &str) -> Self {
        DictionaryId(s.trim().to_string())
    }
}

impl fmt::Display for DictionaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user's word set as shown in the selection table.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    pub id: DictionaryId,
    pub name: String,
}

/// One translation the service offers for a word.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TranslationCandidate {
    pub value: String,
    /// Example phrase; may be missing or null.
    #[serde(default)]
    pub ctx: Option<String>,
    #[serde(default)]
    pub pic_url: Option<String>,
    #[serde(default)]
    pub votes: i64,
    /// The service sends `true`/`false` or `1`/`0` here.
    #[serde(default, deserialize_with = "flag")]
    pub is_user: bool,
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Int(i64),
        Null(()),
    }
    Ok(match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => b,
        RawFlag::Int(n) => n != 0,
        RawFlag::Null(()) => false,
    })
}

// ---- /api/auth ----

#[derive(Serialize, Debug)]
pub struct AuthRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub credentials: AuthCredentials<'a>,
}

#[derive(Serialize, Debug)]
pub struct AuthCredentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

// ---- /GetWordSets ----

/// Attribute projection requested for every word set. Keys are our names,
/// values are the service's short attribute codes.
pub const WORDSET_ATTRIBUTES: [(&str, &str); 10] = [
    ("type", "type"),
    ("id", "id"),
    ("name", "name"),
    ("countWords", "cw"),
    ("countWordsLearned", "cl"),
    ("wordSetId", "wordSetId"),
    ("picture", "pic"),
    ("category", "cat"),
    ("status", "st"),
    ("source", "src"),
];

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WordSetsRequest<'a> {
    pub api_version: &'a str,
    pub request: Vec<WordSetsQuery>,
    pub ctx: RequestContext,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WordSetsQuery {
    pub sub_op: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub per_page: u32,
    pub attr_list: serde_json::Map<String, serde_json::Value>,
    pub sort_by: &'static str,
}

impl WordSetsQuery {
    /// All of the current user's sets, newest first, up to 999.
    pub fn my_all() -> Self {
        let attr_list = WORDSET_ATTRIBUTES
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        WordSetsQuery {
            sub_op: "myAll",
            kind: "user",
            per_page: 999,
            attr_list,
            sort_by: "created",
        }
    }
}

#[derive(Serialize, Debug)]
pub struct RequestContext {
    pub config: ContextConfig,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ContextConfig {
    pub is_check_data: bool,
    pub is_logging: bool,
}

impl Default for RequestContext {
    fn default() -> Self {
        RequestContext {
            config: ContextConfig {
                is_check_data: true,
                is_logging: true,
            },
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct WordSetsResponse {
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    #[serde(default)]
    pub data: Option<Vec<WordSetsPage>>,
}

#[derive(Deserialize, Debug)]
pub struct WordSetsPage {
    pub items: Vec<Dictionary>,
}

/// `error` as the service reports it: an object with a message, a bare
/// string, or a placeholder such as `""`, `false` or `{}` when all is well.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct ApiErrorBody(pub serde_json::Value);

impl ApiErrorBody {
    /// Whether the field actually reports an error. Null, `false`, `0` and
    /// empty strings, objects or arrays do not.
    pub fn is_set(&self) -> bool {
        use serde_json::Value;
        match &self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    pub fn message(&self) -> Option<String> {
        use serde_json::Value;
        match &self.0 {
            Value::Object(o) => o.get("message").and_then(Value::as_str).map(str::to_string),
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ---- /gettranslates ----

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest<'a> {
    pub data: TranslateData<'a>,
    pub api_version: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TranslateData<'a> {
    pub text: &'a str,
    pub lang_pair: &'a LangPair,
}

#[derive(Deserialize, Debug)]
pub struct TranslateResponse {
    pub translate: Vec<TranslationCandidate>,
}

// ---- /SetWords ----

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetWordsRequest<'a> {
    pub data: Vec<SetWordsAction<'a>>,
    pub api_version: &'a str,
    pub user_id: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetWordsAction<'a> {
    pub action: &'static str,
    pub value_list: WordValue<'a>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WordValue<'a> {
    pub lang_pair: &'a LangPair,
    pub translation: ChosenTranslation<'a>,
    pub word_set_id: &'a DictionaryId,
    pub word_value: &'a str,
}

#[derive(Serialize, Debug)]
pub struct ChosenTranslation<'a> {
    pub ctx: Option<&'a str>,
    pub pic: Option<&'a str>,
    pub tr: &'a str,
}

impl<'a> From<&'a TranslationCandidate> for ChosenTranslation<'a> {
    fn from(c: &'a TranslationCandidate) -> Self {
        ChosenTranslation {
            ctx: c.ctx.as_deref(),
            pic: c.pic_url.as_deref(),
            tr: &c.value,
        }
    }
}

// ---- /isauthorized ----

#[derive(Deserialize, Debug, Default)]
pub struct AuthorizedResponse {
    #[serde(default)]
    pub is_authorized: bool,
}
