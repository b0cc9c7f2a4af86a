//! Tagged log-call message payloads
//!
//! What a caller hands to an entry point is decided once at the call
//! boundary instead of being re-inspected throughout the pipeline: plain
//! text travels as `msg`, structured payloads and failures travel as
//! `msg_json`.

use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub enum Message {
    /// Plain text message.
    Text(String),
    /// Structured payload, indexed as a sub-document.
    Structured(Value),
    /// Error-like payload: kind + text + optional stack + extra fields.
    Failure {
        kind: String,
        text: String,
        stack: Option<String>,
        fields: Map<String, Value>,
    },
}

impl Message {
    /// Build a failure message from an error kind and text.
    pub fn failure(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Message::Failure {
            kind: kind.into(),
            text: text.into(),
            stack: None,
            fields: Map::new(),
        }
    }

    /// Build a failure message from any std error, keeping its text.
    pub fn from_error(err: &(dyn std::error::Error + '_)) -> Self {
        Message::failure("Error", err.to_string())
    }

    /// Attach stack text to a failure message; no-op for other variants.
    #[must_use]
    pub fn with_stack(mut self, stack_text: impl Into<String>) -> Self {
        if let Message::Failure { ref mut stack, .. } = self {
            *stack = Some(stack_text.into());
        }
        self
    }

    /// Attach an extra field to a failure message; no-op for other variants.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Message::Failure { ref mut fields, .. } = self {
            fields.insert(key.into(), value.into());
        }
        self
    }

    /// The structured payload for `msg_json` variants, `None` for text.
    pub(crate) fn into_payload(self) -> MessagePayload {
        match self {
            Message::Text(text) => MessagePayload::Plain(text),
            Message::Structured(value) => MessagePayload::Json(value),
            Message::Failure {
                kind,
                text,
                stack,
                fields,
            } => {
                let mut payload = Map::new();
                payload.insert("name".into(), Value::String(kind));
                payload.insert("message".into(), Value::String(text));
                if let Some(stack) = stack {
                    payload.insert("stack".into(), Value::String(stack));
                }
                for (key, value) in fields {
                    payload.insert(key, value);
                }
                MessagePayload::Json(Value::Object(payload))
            }
        }
    }
}

/// Either a `msg` string or a `msg_json` document.
pub(crate) enum MessagePayload {
    Plain(String),
    Json(Value),
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Message::Structured(value)
    }
}

impl From<Map<String, Value>> for Message {
    fn from(map: Map<String, Value>) -> Self {
        Message::Structured(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_payload() {
        let message: Message = "hello".into();
        match message.into_payload() {
            MessagePayload::Plain(text) => assert_eq!(text, "hello"),
            MessagePayload::Json(_) => panic!("text must stay plain"),
        }
    }

    #[test]
    fn test_structured_payload() {
        let message: Message = json!({"a": 1}).into();
        match message.into_payload() {
            MessagePayload::Json(value) => assert_eq!(value, json!({"a": 1})),
            MessagePayload::Plain(_) => panic!("structured must stay json"),
        }
    }

    #[test]
    fn test_failure_keeps_stack_and_extras() {
        let message = Message::failure("Error", "boom")
            .with_stack("at main.rs:1")
            .with_field("code", 42);
        match message.into_payload() {
            MessagePayload::Json(value) => {
                assert_eq!(value["name"], "Error");
                assert_eq!(value["message"], "boom");
                assert_eq!(value["stack"], "at main.rs:1");
                assert_eq!(value["code"], 42);
            }
            MessagePayload::Plain(_) => panic!("failure must be json"),
        }
    }

    #[test]
    fn test_from_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let message = Message::from_error(&io);
        match message.into_payload() {
            MessagePayload::Json(value) => assert_eq!(value["message"], "gone"),
            MessagePayload::Plain(_) => panic!("error must be json"),
        }
    }
}
