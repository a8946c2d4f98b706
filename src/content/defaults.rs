use super::types::{LandingContent, SuccessMessage};

pub const DEFAULT_TOLERANCE_M: f64 = 200.0;
pub const DEFAULT_SOUND: &str = "success1.m4a";

pub const DEFAULT_HEADLINE: &str = "The Treasure Trail";
pub const DEFAULT_SUBTITLE: &str = "Welcome to the treasure hunt!\n\
    Read each riddle, find the place on the map and send its location to unlock the next clue.\n\
    You can edit the riddles and design your own hunt at any time.";
pub const DEFAULT_ENDING_TITLE: &str = "Congratulations";
pub const DEFAULT_TREASURE_MESSAGE: &str = "You have solved every riddle and the trail ends here. \
    Look around: the treasure is hidden close by, waiting for whoever followed every clue. \
    Gather the team and enjoy it together.";

const DEFAULT_SUCCESS_MESSAGES: [(&str, &str); 9] = [
    ("Spot on, well done!", "success1.m4a"),
    ("Right on target, great answer!", "success2.m4a"),
    ("Bullseye! You found the exact place!", "success3.m4a"),
    ("Excellent! Onward to the next riddle!", "success4.m4a"),
    ("A true professional detective!", "success5.m4a"),
    ("Nailed it, keep that streak going!", "success6.m4a"),
    ("Wonderful! You reached the spot!", "success7.m4a"),
    ("Yes! Exactly right!", "success8.m4a"),
    ("Brilliant answer, you are on a roll!", "success9.m4a"),
];

pub fn default_success_messages() -> Vec<SuccessMessage> {
    DEFAULT_SUCCESS_MESSAGES
        .iter()
        .map(|(text, sound)| SuccessMessage {
            text: (*text).to_string(),
            sound: (*sound).to_string(),
        })
        .collect()
}

impl Default for LandingContent {
    fn default() -> Self {
        Self {
            headline: DEFAULT_HEADLINE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            ending_title: DEFAULT_ENDING_TITLE.to_string(),
            treasure_message: DEFAULT_TREASURE_MESSAGE.to_string(),
            success_messages: default_success_messages(),
        }
    }
}
