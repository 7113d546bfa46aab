use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain acknowledgement carrying a human readable message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StringMessage {
    /// Human readable message.
    pub message: String,
}

impl StringMessage {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
