//! Card content and tuning
//!
//! Defaults are compiled in. A page can override any field with an inline
//! `<script type="application/json" id="card-config">` block.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Element id of the inline JSON override
pub const CONFIG_ELEMENT_ID: &str = "card-config";

/// Escape heuristic tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscapeTuning {
    pub jump_desktop: f32,
    pub jump_touch: f32,
    pub jitter: f32,
    pub padding: f32,
    pub edge_zone: f32,
    pub cooldown_ms: f64,
    /// Every Nth escape pauses the button
    pub pause_every: u32,
    pub pause_ms: f64,
}

impl Default for EscapeTuning {
    fn default() -> Self {
        Self {
            jump_desktop: ESCAPE_JUMP_DESKTOP,
            jump_touch: ESCAPE_JUMP_TOUCH,
            jitter: ESCAPE_JITTER,
            padding: AREA_PADDING,
            edge_zone: EDGE_BIAS_ZONE,
            cooldown_ms: ESCAPE_COOLDOWN_MS,
            pause_every: PAUSE_EVERY,
            pause_ms: PAUSE_DURATION_MS,
        }
    }
}

impl EscapeTuning {
    /// Jump length for the current input kind
    pub fn jump(&self, touch: bool) -> f32 {
        if touch { self.jump_touch } else { self.jump_desktop }
    }
}

/// A hint shown when the escape count reaches an exact value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub count: u32,
    pub text: String,
}

/// Everything the card says, plus tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub questions: Vec<String>,
    pub playful_hints: Vec<String>,
    pub milestones: Vec<Milestone>,
    pub no_label: String,
    /// Label and hint while the button lets itself be caught
    pub give_in_label: String,
    pub gift_file_name: String,
    /// Directory the gift is served from, relative to the page
    pub gift_base_url: String,
    pub gift_missing_text: String,
    pub tuning: EscapeTuning,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            questions: vec![
                "Are you the most wonderful girl on the planet?".to_string(),
                "Can you make my day better with a single message?".to_string(),
                "Will you accept this valentine and my heart?".to_string(),
            ],
            playful_hints: vec![
                "oops!".to_string(),
                "can't catch me 😅".to_string(),
                "I'm shy".to_string(),
            ],
            milestones: vec![
                Milestone {
                    count: 10,
                    text: "you are very persistent 😌".to_string(),
                },
                Milestone {
                    count: 30,
                    text: "almost there, but I'm embarrassed".to_string(),
                },
                Milestone {
                    count: 60,
                    text: "you're nearly a button-catching champion".to_string(),
                },
            ],
            no_label: "No".to_string(),
            give_in_label: "oh well, fine 😳".to_string(),
            gift_file_name: "gift.pdf".to_string(),
            gift_base_url: "./gift-files/".to_string(),
            gift_missing_text: "The gift was not found in the gift-files folder.".to_string(),
            tuning: EscapeTuning::default(),
        }
    }
}

impl CardConfig {
    /// Parse an override block and normalize it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Replace values the card cannot work with
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.questions.is_empty() {
            log::warn!("Config has no questions, using defaults");
            self.questions = defaults.questions;
        }
        if self.tuning.pause_every == 0 {
            self.tuning.pause_every = PAUSE_EVERY;
        }
        if self.tuning.cooldown_ms < 0.0 {
            self.tuning.cooldown_ms = 0.0;
        }
        if self.tuning.padding < 0.0 {
            self.tuning.padding = 0.0;
        }
        if self.gift_file_name.is_empty() {
            self.gift_file_name = defaults.gift_file_name;
        }
        self
    }

    /// Milestone text for an exact escape count
    pub fn milestone(&self, count: u32) -> Option<&str> {
        self.milestones
            .iter()
            .find(|m| m.count == count)
            .map(|m| m.text.as_str())
    }

    /// Question text for a 1-based question number
    pub fn question(&self, number: u8) -> &str {
        let index = usize::from(number.saturating_sub(1));
        self.questions
            .get(index)
            .or_else(|| self.questions.last())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Load the override block from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded card config from page");
                    return config;
                }
                Err(e) => log::warn!("Invalid card config, using defaults: {}", e),
            }
        }

        log::info!("Using default card config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = CardConfig::from_json(r#"{"no_label": "Nope"}"#).unwrap();
        assert_eq!(config.no_label, "Nope");
        assert_eq!(config.questions.len(), 3);
        assert_eq!(config.tuning, EscapeTuning::default());
    }

    #[test]
    fn test_tuning_override() {
        let config =
            CardConfig::from_json(r#"{"tuning": {"pause_every": 0, "cooldown_ms": 120}}"#)
                .unwrap();
        assert_eq!(config.tuning.pause_every, PAUSE_EVERY);
        assert_eq!(config.tuning.cooldown_ms, 120.0);
        assert_eq!(config.tuning.jump_desktop, ESCAPE_JUMP_DESKTOP);
    }

    #[test]
    fn test_empty_questions_fall_back() {
        let config = CardConfig::from_json(r#"{"questions": []}"#).unwrap();
        assert_eq!(config.questions, CardConfig::default().questions);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(CardConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_milestone_lookup() {
        let config = CardConfig::default();
        assert!(config.milestone(10).is_some());
        assert!(config.milestone(11).is_none());
    }

    #[test]
    fn test_question_lookup() {
        let config = CardConfig::default();
        assert_eq!(config.question(1), config.questions[0]);
        assert_eq!(config.question(3), config.questions[2]);
        // Out of range falls back to the last question
        assert_eq!(config.question(9), config.questions[2]);
    }
}
