//! Screen progression

use serde::{Deserialize, Serialize};

/// Number of yes/no questions
pub const QUESTION_COUNT: u8 = 3;

/// Current screen of the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Step {
    /// Title screen with a start button
    #[default]
    Intro,
    /// Yes/no question, numbered from 1
    Question(u8),
    /// "I knew it" screen after the last yes
    Celebration,
    /// Envelope with the letter and the gift
    Letter,
}

impl Step {
    /// Step reached by pressing Yes (None where Yes does nothing)
    pub fn after_yes(self) -> Option<Step> {
        match self {
            Step::Question(n) if n < QUESTION_COUNT => Some(Step::Question(n + 1)),
            Step::Question(_) => Some(Step::Celebration),
            _ => None,
        }
    }

    /// Step reached by the screen's primary (non-question) button
    pub fn after_continue(self) -> Option<Step> {
        match self {
            Step::Intro => Some(Step::Question(1)),
            Step::Celebration => Some(Step::Letter),
            _ => None,
        }
    }

    pub fn is_question(self) -> bool {
        matches!(self, Step::Question(_))
    }

    /// 1-based question number
    pub fn question_number(self) -> Option<u8> {
        match self {
            Step::Question(n) => Some(n),
            _ => None,
        }
    }

    /// DOM id of the screen rendered for this step
    pub fn screen_id(self) -> &'static str {
        match self {
            Step::Intro => "intro",
            Step::Question(_) => "question",
            Step::Celebration => "celebration",
            Step::Letter => "letter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_progression() {
        let mut step = Step::Intro;
        step = step.after_continue().unwrap();
        assert_eq!(step, Step::Question(1));
        step = step.after_yes().unwrap();
        assert_eq!(step, Step::Question(2));
        step = step.after_yes().unwrap();
        assert_eq!(step, Step::Question(3));
        step = step.after_yes().unwrap();
        assert_eq!(step, Step::Celebration);
        step = step.after_continue().unwrap();
        assert_eq!(step, Step::Letter);
    }

    #[test]
    fn test_yes_outside_questions_is_ignored() {
        assert_eq!(Step::Intro.after_yes(), None);
        assert_eq!(Step::Celebration.after_yes(), None);
        assert_eq!(Step::Letter.after_yes(), None);
    }

    #[test]
    fn test_continue_on_questions_is_ignored() {
        assert_eq!(Step::Question(2).after_continue(), None);
        assert_eq!(Step::Letter.after_continue(), None);
    }
}
