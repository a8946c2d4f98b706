use serde::Serialize;
use serde_json::Value;

use super::{ApiResponse, Status};
use crate::answer::{AnswerEngine, Guess, InvalidGuess, NextRiddle, Outcome};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckAnswerResponse {
    pub correct: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    pub next_riddle: Option<NextRiddle>,
    pub finished: bool,
}

impl From<&Outcome> for CheckAnswerResponse {
    fn from(outcome: &Outcome) -> Self {
        let mut response = Self {
            correct: outcome.is_correct(),
            message: outcome.message(),
            message_index: None,
            sound: None,
            next_riddle: None,
            finished: false,
        };
        match outcome {
            Outcome::Continue {
                next,
                message_index,
                sound,
                ..
            } => {
                response.message_index = Some(*message_index);
                response.sound = Some(sound.clone());
                response.next_riddle = Some(next.clone());
            }
            Outcome::Finished { .. } => response.finished = true,
            Outcome::Incorrect { .. } | Outcome::Invalid(_) => {}
        }
        response
    }
}

/// Accepts `{ riddle_id, lat, lng }`. Missing or mistyped fields and unknown
/// riddle ids are client errors; a wrong location is a normal answer.
pub fn check_answer(engine: &AnswerEngine, payload: &Value) -> ApiResponse<CheckAnswerResponse> {
    let outcome = match serde_json::from_value::<Guess>(payload.clone()) {
        Ok(guess) => engine.verify(&guess),
        Err(e) => {
            tracing::debug!("Unreadable guess {}: {}", payload, e);
            Outcome::Invalid(InvalidGuess::MissingInput)
        }
    };

    let status = match outcome {
        Outcome::Invalid(_) => Status::ClientError,
        _ => Status::Ok,
    };
    ApiResponse::new(status, CheckAnswerResponse::from(&outcome))
}
