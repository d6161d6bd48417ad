//! The scene sequence.

use serde::{Deserialize, Serialize};

/// One scene of the experience. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Passcode gate.
    Locked,
    /// Track picker.
    SelectingMusic,
    /// Letter puzzle.
    Intro,
    /// Scrolling page with the collectible hunt.
    Main,
    /// Photo strip and checkout.
    PhotoBooth,
    /// Closing letter.
    FinalMessage,
    /// Countdown scene.
    Motivation,
    /// Credits. Terminal.
    Outro,
}

impl Stage {
    /// Every stage, in order.
    pub const ALL: [Self; 8] = [
        Self::Locked,
        Self::SelectingMusic,
        Self::Intro,
        Self::Main,
        Self::PhotoBooth,
        Self::FinalMessage,
        Self::Motivation,
        Self::Outro,
    ];

    /// The stage that follows this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Locked => Some(Self::SelectingMusic),
            Self::SelectingMusic => Some(Self::Intro),
            Self::Intro => Some(Self::Main),
            Self::Main => Some(Self::PhotoBooth),
            Self::PhotoBooth => Some(Self::FinalMessage),
            Self::FinalMessage => Some(Self::Motivation),
            Self::Motivation => Some(Self::Outro),
            Self::Outro => None,
        }
    }

    /// Whether the experience ends here.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_walks_all_in_order() {
        let mut walked = vec![Stage::Locked];
        while let Some(next) = walked.last().and_then(|s| s.next()) {
            walked.push(next);
        }

        assert_eq!(walked, Stage::ALL.to_vec());
        assert!(Stage::Outro.is_terminal());
    }
}
