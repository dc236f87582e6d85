//! # Domain models for identities, notes and raw documents
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Identity`] | The signed-in user as reported by a [`crate::SessionProvider`]. Read-only for the note store. |
//! | [`Document`] | A raw record delivered by a [`crate::DocumentStore`]: a store-assigned id plus a JSON object of fields. |
//! | [`NoteFields`] | The fields written when a note is created. |
//! | [`Note`] | A note decoded from a [`Document`], ready for display. |
//!
//! A note record is persisted as `{ text, owner, createdAt }`. `createdAt` is
//! written as an RFC 3339 string; an integer is accepted on read as
//! milliseconds since the Unix epoch. Anything else decodes to `None` and the
//! note sorts as if it had been created "now".

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const TEXT_FIELD: &str = "text";
pub const OWNER_FIELD: &str = "owner";
pub const CREATED_AT_FIELD: &str = "createdAt";

/// The authenticated user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique id, used as the `owner` of every note the user creates.
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    /// Name to show in the top bar, falling back to the id if the display name is blank.
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}

/// A record as stored in a document collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Whether `field` holds exactly `value`.
    pub fn field_equals(&self, field: &str, value: &Value) -> bool {
        self.fields.get(field) == Some(value)
    }
}

/// Fields of a note about to be created.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteFields {
    pub text: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

impl NoteFields {
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(TEXT_FIELD.to_string(), Value::String(self.text));
        fields.insert(OWNER_FIELD.to_string(), Value::String(self.owner));
        fields.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(self.created_at.to_rfc3339()),
        );
        fields
    }
}

/// A note owned by a single identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub owner: String,
    /// `None` when the record's `createdAt` is missing or malformed.
    pub created_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Decode a document. Returns `None` if `text` or `owner` is missing or not a string.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let text = doc.fields.get(TEXT_FIELD)?.as_str()?;
        let owner = doc.fields.get(OWNER_FIELD)?.as_str()?;
        Some(Self {
            id: doc.id.clone(),
            text: text.to_string(),
            owner: owner.to_string(),
            created_at: doc.fields.get(CREATED_AT_FIELD).and_then(parse_timestamp),
        })
    }

    /// Timestamp used for ordering; unusable timestamps count as `now`.
    pub fn sort_key(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.created_at.unwrap_or(now)
    }

    /// First `max_chars` characters of the text, with `...` appended when truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &self.text[..idx]),
            None => self.text.clone(),
        }
    }

    /// Creation time in local time, or an empty string when unknown.
    pub fn created_label(&self) -> String {
        self.created_at
            .map(|at| {
                at.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_default()
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}
