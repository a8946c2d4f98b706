pub mod defaults;
pub mod normalize;
pub mod sounds;
pub mod store;
pub mod types;

pub use normalize::{
    normalize_landing, normalize_landing_strict, normalize_riddles_lenient,
    normalize_riddles_strict, normalize_success_messages,
};
pub use store::{load, ContentStore, ContentView};
pub use types::{GameContent, LandingContent, Riddle, SuccessMessage};
