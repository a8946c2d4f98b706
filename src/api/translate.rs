use serde::Serialize;
use serde_json::Value;

use super::{ApiResponse, Status};
use crate::translate::TranslationGateway;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslateResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Accepts `{ texts: [...], target }`. Only a non-list `texts` is an error;
/// translation problems show up as untranslated strings.
pub fn translate_texts(
    gateway: &TranslationGateway,
    payload: &Value,
    max_texts: usize,
) -> ApiResponse<TranslateResponse> {
    let texts = match payload.get("texts") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .take(max_texts)
            .collect(),
        Some(_) => {
            return ApiResponse::new(
                Status::ClientError,
                TranslateResponse {
                    ok: false,
                    translations: None,
                    error: Some("texts must be a list".to_string()),
                },
            )
        }
    };

    let target = payload
        .get("target")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("en");

    ApiResponse::ok(TranslateResponse {
        ok: true,
        translations: Some(gateway.translate(&texts, target)),
        error: None,
    })
}
