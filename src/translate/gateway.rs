use std::time::Duration;

use super::client::{BatchTranslator, GoogleTranslateClient};
use super::credentials::Credentials;
use crate::config::TranslationConfig;

/// Best-effort translation. Never fails: anything that goes wrong degrades to
/// the original text, and the output always lines up with the input.
pub struct TranslationGateway {
    backend: Option<Box<dyn BatchTranslator>>,
    batch_size: usize,
    source_lang: String,
}

impl TranslationGateway {
    /// No credential configured: texts pass through untouched.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            batch_size: TranslationConfig::default().batch_size,
            source_lang: TranslationConfig::default().source_lang,
        }
    }

    pub fn with_backend(backend: Box<dyn BatchTranslator>, config: &TranslationConfig) -> Self {
        Self {
            backend: Some(backend),
            batch_size: config.batch_size.max(1),
            source_lang: config.source_lang.clone(),
        }
    }

    pub fn from_config(config: &TranslationConfig, credentials: &Credentials) -> Self {
        if !credentials.has_translation_key() {
            return Self::disabled();
        }

        match GoogleTranslateClient::new(
            config.endpoint.clone(),
            credentials.translation_key.clone(),
            Duration::from_secs(config.timeout_secs),
        ) {
            Ok(client) => Self::with_backend(Box::new(client), config),
            Err(e) => {
                tracing::warn!("Translation client unavailable: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Translates from the configured source language.
    pub fn translate(&self, texts: &[String], target: &str) -> Vec<String> {
        self.translate_from(texts, target, &self.source_lang)
    }

    pub fn translate_from(&self, texts: &[String], target: &str, source: &str) -> Vec<String> {
        let Some(backend) = &self.backend else {
            return texts.to_vec();
        };

        let mut translated = Vec::with_capacity(texts.len());
        for (n, batch) in texts.chunks(self.batch_size).enumerate() {
            match backend.translate_batch(batch, target, source) {
                Ok(mut out) => {
                    out.truncate(batch.len());
                    out.extend(batch[out.len()..].iter().cloned());
                    tracing::debug!("Translated batch {} ({} texts) to {}", n, batch.len(), target);
                    translated.extend(out);
                }
                Err(e) => {
                    tracing::warn!("Translation batch {} failed, keeping originals: {}", n, e);
                    translated.extend(batch.iter().cloned());
                }
            }
        }

        if translated.len() < texts.len() {
            translated.extend(texts[translated.len()..].iter().cloned());
        }
        translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Upper-cases every text, failing the batches listed in `fail`.
    struct FakeTranslator {
        calls: Arc<AtomicUsize>,
        fail: Vec<usize>,
        drop_last: bool,
    }

    impl BatchTranslator for FakeTranslator {
        fn translate_batch(
            &self,
            batch: &[String],
            _target: &str,
            _source: &str,
        ) -> Result<Vec<String>, TranslateError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.contains(&call) {
                return Err(TranslateError::Status(500));
            }
            let mut out: Vec<String> = batch.iter().map(|t| t.to_uppercase()).collect();
            if self.drop_last {
                out.pop();
            }
            Ok(out)
        }
    }

    fn fake_gateway(fail: Vec<usize>, drop_last: bool, batch_size: usize) -> (TranslationGateway, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = TranslationConfig {
            batch_size,
            ..TranslationConfig::default()
        };
        let fake = FakeTranslator {
            calls: Arc::clone(&calls),
            fail,
            drop_last,
        };
        (TranslationGateway::with_backend(Box::new(fake), &config), calls)
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("t{i}")).collect()
    }

    #[test]
    fn disabled_gateway_returns_inputs() {
        let gateway = TranslationGateway::from_config(&TranslationConfig::default(), &Credentials::default());
        assert!(!gateway.is_enabled());
        assert_eq!(gateway.translate(&texts(3), "en"), texts(3));
    }

    #[test]
    fn splits_into_fixed_batches() {
        let (gateway, calls) = fake_gateway(vec![], false, 80);
        let out = gateway.translate(&texts(170), "en");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(out.len(), 170);
        assert_eq!(out[169], "T169");
    }

    #[test]
    fn failed_batch_falls_back_to_originals() {
        let (gateway, _) = fake_gateway(vec![1], false, 2);
        let out = gateway.translate(&texts(5), "en");
        assert_eq!(out, vec!["T0", "T1", "t2", "t3", "T4"]);
    }

    #[test]
    fn short_batches_are_padded_by_position() {
        let (gateway, _) = fake_gateway(vec![], true, 3);
        let out = gateway.translate(&texts(5), "en");
        assert_eq!(out, vec!["T0", "T1", "t2", "T3", "t4"]);
    }

    #[test]
    fn length_always_matches_input() {
        for n in [0, 1, 79, 80, 81, 250] {
            for fail in [vec![], vec![0], vec![0, 1, 2, 3]] {
                for drop_last in [false, true] {
                    let (gateway, _) = fake_gateway(fail.clone(), drop_last, 80);
                    assert_eq!(gateway.translate(&texts(n), "fr").len(), n);
                }
            }
        }
    }
}
