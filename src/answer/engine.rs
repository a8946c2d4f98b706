use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::content::{ContentStore, ContentView};
use crate::geo::{is_within_tolerance, Coordinate};

/// A player's submission. Every field is optional so that missing input is an
/// outcome rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Guess {
    #[serde(default)]
    pub riddle_id: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Guess {
    pub fn new(riddle_id: i64, at: Coordinate) -> Self {
        Self {
            riddle_id: Some(riddle_id),
            lat: Some(at.lat),
            lng: Some(at.lng),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextRiddle {
    pub id: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidGuess {
    MissingInput,
    UnknownRiddle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Correct, and another riddle follows.
    Continue {
        next: NextRiddle,
        message_index: usize,
        message: String,
        sound: String,
    },
    /// Correct on the last riddle.
    Finished { treasure_message: String },
    Incorrect { distance_m: f64 },
    Invalid(InvalidGuess),
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Continue { .. } | Self::Finished { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::Continue { message, .. } => message.clone(),
            Self::Finished { treasure_message } => treasure_message.clone(),
            Self::Incorrect { distance_m } => format!(
                "Not quite... you are {} meters from the spot. Try again!",
                *distance_m as i64
            ),
            Self::Invalid(InvalidGuess::MissingInput) => "Invalid input data.".to_string(),
            Self::Invalid(InvalidGuess::UnknownRiddle) => "No such riddle.".to_string(),
        }
    }
}

/// Adjudicates guesses against the shared content.
///
/// Holds no per-player state; the caller tracks which riddle a player is on.
pub struct AnswerEngine {
    store: Arc<ContentStore>,
    rng: Mutex<StdRng>,
}

impl AnswerEngine {
    /// Seeds the message draw from the wall clock so every run differs.
    pub fn new(store: Arc<ContentStore>) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(store, nanos)
    }

    pub fn with_seed(store: Arc<ContentStore>, seed: u64) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    pub fn verify(&self, guess: &Guess) -> Outcome {
        let view = self.store.snapshot();
        let outcome = self.verify_against(&view, guess);
        tracing::debug!("Guess {:?} -> {:?}", guess, outcome);
        outcome
    }

    fn verify_against(&self, view: &ContentView, guess: &Guess) -> Outcome {
        let (Some(riddle_id), Some(lat), Some(lng)) = (guess.riddle_id, guess.lat, guess.lng) else {
            return Outcome::Invalid(InvalidGuess::MissingInput);
        };
        let Some((id, riddle)) = usize::try_from(riddle_id)
            .ok()
            .and_then(|id| view.riddle(id).map(|riddle| (id, riddle)))
        else {
            return Outcome::Invalid(InvalidGuess::UnknownRiddle);
        };

        let distance_m = Coordinate::new(lat, lng).distance_to(&riddle.target());
        if !is_within_tolerance(distance_m, riddle.tolerance_m) {
            return Outcome::Incorrect { distance_m };
        }

        match view.riddle(id + 1) {
            Some(next) => {
                let message_index = self.draw_message_index(view.success_texts.len());
                Outcome::Continue {
                    next: NextRiddle {
                        id: id + 1,
                        text: next.text.clone(),
                    },
                    message_index,
                    message: view
                        .success_texts
                        .get(message_index)
                        .cloned()
                        .unwrap_or_default(),
                    sound: view
                        .success_sounds
                        .get(message_index)
                        .cloned()
                        .unwrap_or_default(),
                }
            }
            None => Outcome::Finished {
                treasure_message: view.treasure_message().to_string(),
            },
        }
    }

    /// Uniform and independent per call. `ContentView` keeps the list non-empty.
    fn draw_message_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..len.max(1))
    }
}
