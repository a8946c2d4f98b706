use std::time::Duration;

use serde_json::Value;

use crate::error::TranslateError;

/// One round trip to a translation service for a single batch.
///
/// Implementations report failures; the gateway decides what to do with them.
pub trait BatchTranslator: Send + Sync {
    fn translate_batch(
        &self,
        batch: &[String],
        target: &str,
        source: &str,
    ) -> Result<Vec<String>, TranslateError>;
}

/// Google Cloud Translation v2 over a blocking HTTP client.
pub struct GoogleTranslateClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTranslateClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

impl BatchTranslator for GoogleTranslateClient {
    fn translate_batch(
        &self,
        batch: &[String],
        target: &str,
        source: &str,
    ) -> Result<Vec<String>, TranslateError> {
        let mut form: Vec<(&str, &str)> = batch.iter().map(|t| ("q", t.as_str())).collect();
        form.extend([
            ("target", target),
            ("source", source),
            ("format", "text"),
            ("key", self.api_key.as_str()),
        ]);

        let response = self.http.post(&self.endpoint).form(&form).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let body = response.text()?;
        decode_translations(&body, batch)
    }
}

/// Decodes a v2 response body into exactly `batch.len()` strings.
///
/// Entries without `translatedText` and entries the service left out are
/// filled with the original text at the same position.
pub fn decode_translations(body: &str, batch: &[String]) -> Result<Vec<String>, TranslateError> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| TranslateError::Decode(e.to_string()))?;
    if !payload.is_object() {
        return Err(TranslateError::Decode("response is not an object".into()));
    }

    let entries = match payload.get("data").map(|data| data.get("translations")) {
        None | Some(None) => &[][..],
        Some(Some(Value::Array(entries))) => entries.as_slice(),
        Some(Some(other)) => {
            return Err(TranslateError::Decode(format!(
                "translations is not a list: {other}"
            )))
        }
    };

    let mut translated: Vec<String> = entries
        .iter()
        .zip(batch)
        .map(|(entry, original)| match entry.get("translatedText") {
            Some(Value::String(text)) => html_escape::decode_html_entities(text).into_owned(),
            _ => original.clone(),
        })
        .collect();
    translated.extend(batch[translated.len()..].iter().cloned());
    Ok(translated)
}
