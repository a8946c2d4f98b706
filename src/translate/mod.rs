pub mod client;
pub mod credentials;
pub mod gateway;

pub use client::{decode_translations, BatchTranslator, GoogleTranslateClient};
pub use credentials::Credentials;
pub use gateway::TranslationGateway;
