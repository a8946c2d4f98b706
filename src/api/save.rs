use serde::Serialize;
use serde_json::Value;

use super::{ApiResponse, Status};
use crate::content::ContentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// `riddles` must be present.
    Unified,
    /// Older editor endpoints: absent `riddles` keeps the current riddles.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    fn failed(status: Status, error: impl Into<String>) -> ApiResponse<Self> {
        ApiResponse::new(
            status,
            Self {
                ok: false,
                error: Some(error.into()),
            },
        )
    }
}

/// Accepts `{ riddles: [...], landing?: {...} }`. Without a `landing` key the
/// whole payload is read as landing content (the legacy flat shape).
pub fn save_content(store: &ContentStore, payload: &Value, mode: SaveMode) -> ApiResponse<SaveResponse> {
    let current;
    let riddles = match (payload.get("riddles").filter(|r| !r.is_null()), mode) {
        (Some(riddles), _) => riddles,
        (None, SaveMode::Legacy) => {
            current = match serde_json::to_value(store.snapshot().riddles()) {
                Ok(value) => value,
                Err(e) => return SaveResponse::failed(Status::ServerError, e.to_string()),
            };
            &current
        }
        (None, SaveMode::Unified) => {
            return SaveResponse::failed(Status::ClientError, "No riddles provided")
        }
    };
    let landing = payload.get("landing").unwrap_or(payload);

    match store.save(riddles, landing) {
        Ok(_) => ApiResponse::ok(SaveResponse { ok: true, error: None }),
        Err(e) if e.is_client_error() => {
            tracing::info!("Rejected content save: {}", e);
            SaveResponse::failed(Status::ClientError, e.to_string())
        }
        Err(e) => {
            tracing::error!("Content save failed: {}", e);
            SaveResponse::failed(Status::ServerError, e.to_string())
        }
    }
}
