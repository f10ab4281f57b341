//! Errors raised while mounting the card or parsing its configuration.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while mounting or driving the card. User clicks never produce one:
/// out-of-order or repeated actions are ignored by the state machine instead.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("dom call failed: {0}")]
    Dom(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[cfg(feature = "serde_json")]
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<JsValue> for CardError {
    fn from(value: JsValue) -> Self {
        CardError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<CardError> for JsValue {
    fn from(err: CardError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(CardError::NoWindow.to_string(), "no window");
        assert_eq!(
            CardError::InvalidConfig("x".into()).to_string(),
            "invalid config: x"
        );
    }
}
