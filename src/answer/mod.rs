pub mod engine;

pub use engine::{AnswerEngine, Guess, InvalidGuess, NextRiddle, Outcome};
