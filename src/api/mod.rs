//! Request/response contracts for the game's three operations.
//!
//! Each handler takes the already-parsed JSON body and returns the JSON body
//! to send back plus a [`Status`] class. Binding them to a transport is left
//! to the caller.

pub mod check;
pub mod save;
pub mod translate;

use serde::Serialize;

pub use check::{check_answer, CheckAnswerResponse};
pub use save::{save_content, SaveMode, SaveResponse};
pub use translate::{translate_texts, TranslateResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    ClientError,
    ServerError,
}

impl Status {
    pub fn http_code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::ClientError => 400,
            Self::ServerError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: Status,
    pub body: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: Status, body: T) -> Self {
        Self { status, body }
    }

    pub fn ok(body: T) -> Self {
        Self::new(Status::Ok, body)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.body).unwrap_or(serde_json::Value::Null)
    }
}
