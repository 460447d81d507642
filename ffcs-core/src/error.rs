use serde::Serialize;

#[derive(thiserror::Error, Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error("field {field} holds {value:?}, expected {expected}")]
    Format {
        field: String,
        value: String,
        expected: String,
    },
    #[error("response is missing required key {key}")]
    Contract { key: String, payload: String },
    #[error("{stage} status cannot move from {from} by {attempted}")]
    Transition {
        stage: String,
        from: String,
        attempted: String,
    },
}

impl Error {
    pub(crate) fn format(field: &str, value: &str, expected: &str) -> Self {
        Self::Format {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    pub(crate) fn contract(key: &str, payload: &serde_json::Value) -> Self {
        Self::Contract {
            key: key.to_string(),
            payload: payload.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
