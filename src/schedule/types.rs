//! Schedule record types and store result descriptors.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::StoreError;

/// Store-assigned identifier of a schedule.
///
/// Rendered on the wire as the 24-character hex form of the underlying
/// `ObjectId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleId(ObjectId);

impl ScheduleId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// The store-native identifier.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Hex representation used in paths and responses.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for ScheduleId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for ScheduleId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ScheduleId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for ScheduleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for ScheduleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The four user-editable fields of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleFields {
    /// Class title, e.g. "Yoga".
    pub title: String,
    /// Day label, e.g. "Monday".
    pub day: String,
    /// Calendar date.
    pub date: String,
    /// Time of day.
    pub time: String,
}

/// A persisted schedule record as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Schedule {
    /// Identifier assigned at creation.
    #[serde(rename = "_id")]
    #[schema(value_type = String)]
    pub id: ScheduleId,
    pub title: String,
    pub day: String,
    pub date: String,
    pub time: String,
    /// Set once through the completion operation.
    #[serde(default)]
    pub completed: bool,
}

impl Schedule {
    /// A new, not yet completed record.
    pub fn new(id: ScheduleId, fields: ScheduleFields) -> Self {
        Self {
            id,
            title: fields.title,
            day: fields.day,
            date: fields.date,
            time: fields.time,
            completed: false,
        }
    }

    /// Replace the editable fields, leaving `completed` untouched.
    pub fn apply(&mut self, fields: ScheduleFields) {
        self.title = fields.title;
        self.day = fields.day;
        self.date = fields.date;
        self.time = fields.time;
    }

    /// Current editable fields.
    pub fn fields(&self) -> ScheduleFields {
        ScheduleFields {
            title: self.title.clone(),
            day: self.day.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
        }
    }
}

/// Body of the add and update operations.
///
/// Fields are kept as raw JSON so presence can be judged by truthiness:
/// absent, `null`, `false`, `0` and `""` all count as missing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ScheduleRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub day: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub date: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub time: Option<Value>,
}

impl ScheduleRequest {
    /// Read a request from a parsed JSON body.
    ///
    /// Only objects carry fields; arrays and scalars yield an empty request.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(map) => {
                serde_json::from_value(Value::Object(map)).unwrap_or_default()
            }
            _ => Self::default(),
        }
    }

    /// Extract the four fields, or `None` if any of them is missing.
    pub fn into_fields(self) -> Option<ScheduleFields> {
        Some(ScheduleFields {
            title: required_text(self.title)?,
            day: required_text(self.day)?,
            date: required_text(self.date)?,
            time: required_text(self.time)?,
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn required_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s),
        other if is_truthy(&other) => Some(other.to_string()),
        _ => None,
    }
}

/// Outcome of an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    #[schema(value_type = String)]
    pub inserted_id: ScheduleId,
}

/// Outcome of an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}
