use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The body of a successful mutation. `id` is only present when a payment was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { id: None, message: message.to_string() }
    }

    pub fn created<S: Display>(id: i64, message: S) -> Self {
        Self { id: Some(id), message: message.to_string() }
    }
}
