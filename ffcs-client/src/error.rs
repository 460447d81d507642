use serde::Serialize;

#[derive(thiserror::Error, Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error("could not reach the service: {message}")]
    Transport { message: String },
    #[error("service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response is missing required key {key}")]
    Contract { key: String, payload: String },
    #[error("field {field} holds {value:?}, expected {expected}")]
    Format {
        field: String,
        value: String,
        expected: String,
    },
    #[error("refusing to write {entity}: {message}")]
    State { entity: String, message: String },
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
    #[error("{step} failed: {message} (compensated: {compensated})")]
    Saga {
        step: String,
        message: String,
        compensated: bool,
    },
}

impl Error {
    pub(crate) fn state(entity: &str, message: impl Into<String>) -> Self {
        Self::State {
            entity: entity.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn contract(key: &str, payload: &serde_json::Value) -> Self {
        Self::Contract {
            key: key.to_string(),
            payload: payload.to_string(),
        }
    }
}

impl From<ffcs_core::error::Error> for Error {
    fn from(err: ffcs_core::error::Error) -> Self {
        use ffcs_core::error::Error as Core;

        let message = err.to_string();

        match err {
            Core::Format {
                field,
                value,
                expected,
            } => Self::Format {
                field,
                value,
                expected,
            },
            Core::Contract { key, payload } => Self::Contract { key, payload },
            Core::Transition { .. } => Self::State {
                entity: "well".to_string(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => Self::Transport {
                message: format!("{err:?}"),
            },
        }
    }
}

// A body that is not JSON at all breaks the response contract
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Contract {
            key: "<json>".to_string(),
            payload: err.to_string(),
        }
    }
}

impl From<garde::Report> for Error {
    fn from(report: garde::Report) -> Self {
        Self::InvalidRequest {
            message: report.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
