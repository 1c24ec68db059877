//! Expert identity and verification.
//!
//! "Verification" here is self-asserted: a profile that satisfies the two
//! form constraints (experience length, social-profile count) is granted
//! verified status unconditionally, client-side. There is no review queue
//! and no server-side approval step.

mod profile;
mod store;

pub use profile::{
    ExpertProfile, ExpertVerification, ProfileError, SocialProfiles, MIN_EXPERIENCE_CHARS,
    MIN_SOCIAL_PROFILES,
};
pub use store::{
    ApplyError, JsonFileStorage, MemoryStorage, StoreError, VerificationStorage,
    VerificationStore,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed enumeration of expertise categories an expert can claim.
///
/// Matches the category labels the events API uses for `market_type`,
/// so the same set drives both the application form and the event filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expertise {
    Crypto,
    Finance,
    Technology,
    Politics,
    Science,
    Economics,
}

impl Expertise {
    /// Returns all selectable expertise categories.
    pub fn all() -> Vec<Expertise> {
        vec![
            Expertise::Crypto,
            Expertise::Finance,
            Expertise::Technology,
            Expertise::Politics,
            Expertise::Science,
            Expertise::Economics,
        ]
    }

    /// Returns the category's display label.
    pub fn label(&self) -> &'static str {
        match self {
            Expertise::Crypto => "Crypto",
            Expertise::Finance => "Finance",
            Expertise::Technology => "Technology",
            Expertise::Politics => "Politics",
            Expertise::Science => "Science",
            Expertise::Economics => "Economics",
        }
    }
}

impl fmt::Display for Expertise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_expertise_returns_six() {
        assert_eq!(Expertise::all().len(), 6);
    }

    #[test]
    fn test_expertise_display() {
        assert_eq!(format!("{}", Expertise::Crypto), "Crypto");
        assert_eq!(format!("{}", Expertise::Economics), "Economics");
    }
}
