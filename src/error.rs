use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::action::Action;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{action:?}: missing path value {key}")]
    MissingPathValue { action: Action, key: &'static str },

    #[error("{0:?} does not answer with a list")]
    NotAList(Action),

    #[error("{0}: empty user ID")]
    EmptyId(&'static str),

    #[error("preAuthorization {id} failed: {message}")]
    PreAuthorizationFailed { id: String, message: String },

    #[error("{kind} {id} failed: {message}")]
    TransactionFailed {
        kind: &'static str,
        id: String,
        message: String,
    },
}

/// Error document returned by MangoPay along with a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApiErrorBody {
    pub id: Option<String>,
    #[serde(rename = "Type")]
    pub error_type: Option<String>,
    pub message: Option<String>,
    pub errors: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    pub body: String,
    pub details: Option<ApiErrorBody>,
}

impl ApiError {
    pub fn new(status: u16, body: String) -> Self {
        let details = serde_json::from_str::<ApiErrorBody>(&body).ok();
        ApiError {
            status,
            body,
            details,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.details.as_ref().and_then(|d| d.message.as_deref())
    }

    /// Per-field validation messages, keyed by field name.
    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        self.details.as_ref().and_then(|d| d.errors.as_ref())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(msg) => write!(f, "mangopay api error {}: {}", self.status, msg)?,
            None => write!(f, "mangopay api error {}: {}", self.status, self.body)?,
        }
        if let Some(errors) = self.field_errors() {
            let mut fields: Vec<_> = errors.iter().collect();
            fields.sort();
            for (field, msg) in fields {
                write!(f, "; {}: {}", field, msg)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
