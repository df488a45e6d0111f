//! Typed records for one student's academic history.
//!
//! Wire types mirror the GraphQL response and are validated at the fetch
//! boundary; [`normalize`] turns them into the [`Subject`] consumed by the
//! statistics engine. Nothing here is mutated after construction.

pub mod de;
pub mod normalize;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use normalize::normalize;

/// Placeholder for a missing profile attribute.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Placeholder for a missing campus.
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for a transaction or project without an object name.
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// The curriculum object a record refers to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

fn object_name(object: Option<&ObjectRef>) -> &str {
    object
        .and_then(|o| o.name.as_deref())
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_PROJECT)
}

// ---------------------------------------------------------------------------
// Transactions, progress, audits
// ---------------------------------------------------------------------------

/// An XP award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type", default, deserialize_with = "de::null_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "de::integer")]
    pub amount: i64,
    #[serde(default, deserialize_with = "de::optional_integer")]
    pub object_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub path: String,
    #[serde(default)]
    pub object: Option<ObjectRef>,
}

impl Transaction {
    pub fn object_name(&self) -> &str {
        object_name(self.object.as_ref())
    }
}

/// A finished (or graded) curriculum unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "de::optional_integer")]
    pub object_id: Option<i64>,
    /// `None` while the unit is still in progress.
    #[serde(default)]
    pub grade: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub path: String,
    #[serde(default)]
    pub object: Option<ObjectRef>,
}

impl ProgressRecord {
    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }

    pub fn object_name(&self) -> &str {
        object_name(self.object.as_ref())
    }
}

/// A peer review performed by the subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: i64,
    #[serde(default)]
    pub grade: Option<f64>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Public profile fields exposed alongside the user row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A `user` row as returned by the record query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub id: i64,
    pub login: String,
    /// Free-form attributes: a JSON object, a JSON-encoded string, or null.
    #[serde(default)]
    pub attrs: Value,
    #[serde(default)]
    pub audit_ratio: Option<f64>,
    #[serde(default, deserialize_with = "de::integer")]
    pub total_up: i64,
    #[serde(default, deserialize_with = "de::integer")]
    pub total_down: i64,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub campus: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub public: Option<PublicProfile>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub transactions: Vec<Transaction>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub progresses: Vec<ProgressRecord>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub audits: Vec<AuditRecord>,
}

/// The event a membership belongs to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventRef {
    #[serde(default, deserialize_with = "de::null_default")]
    pub path: String,
}

/// An `event_user` row carrying the official level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMembership {
    #[serde(default, deserialize_with = "de::integer")]
    pub level: i64,
    #[serde(default, deserialize_with = "de::optional_integer")]
    pub event_id: Option<i64>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub user_login: String,
    #[serde(default)]
    pub event: Option<EventRef>,
}

/// The `data` object of the record query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryData {
    #[serde(default, deserialize_with = "de::null_default")]
    pub user: Vec<RawUser>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub event_user: Vec<EventMembership>,
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// Free-form profile attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    /// Interpret the raw `attrs` value. A string is parsed as JSON; `null`
    /// yields an empty set; anything that is not an object is an error.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map.clone())),
            Value::String(text) if text.trim().is_empty() => Ok(Self::default()),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Ok(Self(map)),
                Ok(Value::Null) => Ok(Self::default()),
                Ok(other) => Err(format!("attrs decoded to {} instead of an object", kind_of(&other))),
                Err(e) => Err(format!("attrs is not valid JSON: {e}")),
            },
            other => Err(format!("attrs is {} instead of an object", kind_of(other))),
        }
    }

    /// A non-empty attribute rendered as text.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Subject
// ---------------------------------------------------------------------------

/// One student's normalized record.
#[derive(Debug, Clone)]
pub struct Subject {
    pub id: i64,
    pub login: String,
    pub attributes: Attributes,
    pub public: PublicProfile,
    pub avatar_url: Option<String>,
    pub campus: Option<String>,
    pub created_at: DateTime<Utc>,
    pub audit_ratio: f64,
    /// XP given to others through audits done.
    pub total_up: i64,
    /// XP received from others' audits.
    pub total_down: i64,
    pub transactions: Vec<Transaction>,
    pub progresses: Vec<ProgressRecord>,
    pub audits: Vec<AuditRecord>,
    /// Level from the campus event membership, 0 if none matched.
    pub official_level: i64,
}

impl Subject {
    /// "First Last" when both names are known, otherwise the login.
    pub fn full_name(&self) -> String {
        let first = non_empty(self.public.first_name.clone()).or_else(|| self.attributes.get("firstName"));
        let last = non_empty(self.public.last_name.clone()).or_else(|| self.attributes.get("lastName"));
        match (first, last) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => self.login.clone(),
        }
    }

    pub fn location(&self) -> String {
        self.attributes
            .get("country")
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    }

    pub fn phone(&self) -> String {
        self.attributes
            .get("Phone")
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    }

    pub fn date_of_birth(&self) -> String {
        self.attributes
            .get("dateOfBirth")
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    }

    pub fn campus_label(&self) -> String {
        non_empty(self.campus.clone()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
