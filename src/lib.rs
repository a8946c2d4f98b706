pub mod answer;
pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod geo;
pub mod translate;

pub use answer::{AnswerEngine, Outcome};
pub use content::{ContentStore, GameContent};
pub use error::{ContentError, TranslateError};
pub use translate::TranslationGateway;
