//! Question payload shared by both adapters: `{"context": .., "question": ..}`.
//!
//! Any JSON object is accepted. Absent, `null`, `false`, zero and empty
//! values read as missing; other non-string values are rendered as JSON
//! text. Emptiness is checked later by [`crate::QueryGateway::answer`].

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::QueryError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QuestionInput {
    pub context: String,
    pub question: String,
}

impl QuestionInput {
    /// Reads both fields from a decoded JSON body.
    ///
    /// # Errors
    /// [`QueryError::Malformed`] when `value` is not an object.
    pub fn from_json(value: &Value) -> Result<Self, QueryError> {
        let Value::Object(fields) = value else {
            return Err(QueryError::Malformed(
                "request body must be a JSON object".to_string(),
            ));
        };
        Ok(Self {
            context: field_text(fields, "context"),
            question: field_text(fields, "question"),
        })
    }

    /// True when either field is empty.
    pub fn is_incomplete(&self) -> bool {
        self.context.is_empty() || self.question.is_empty()
    }
}

impl<'de> Deserialize<'de> for QuestionInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn field_text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(Value::Array(a)) if a.is_empty() => String::new(),
        Some(Value::Object(o)) if o.is_empty() => String::new(),
        Some(other) => other.to_string(),
    }
}
