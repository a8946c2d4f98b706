use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Riddle {
    pub id: usize, // always the riddle's position, reassigned on every save
    pub text: String,
    pub lat: f64,
    pub lng: f64,
    pub tolerance_m: f64,
}

impl Riddle {
    pub fn target(&self) -> crate::geo::Coordinate {
        crate::geo::Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub text: String,
    pub sound: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingContent {
    pub headline: String,
    pub subtitle: String,
    pub ending_title: String,
    pub treasure_message: String,
    pub success_messages: Vec<SuccessMessage>,
}

/// The single root document, persisted as `game_content.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameContent {
    pub riddles: Vec<Riddle>,
    pub landing: LandingContent,
}

