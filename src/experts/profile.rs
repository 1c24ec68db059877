//! Expert profile types and form validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Expertise;

/// Minimum length of the free-text experience statement, in characters.
pub const MIN_EXPERIENCE_CHARS: usize = 300;

/// Minimum number of non-empty social profile links.
pub const MIN_SOCIAL_PROFILES: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("name is required")]
    MissingName,

    #[error("email is required")]
    MissingEmail,

    #[error("select at least one area of expertise")]
    NoExpertise,

    #[error(
        "experience statement is {len} characters; at least {MIN_EXPERIENCE_CHARS} are required"
    )]
    ExperienceTooShort { len: usize },

    #[error(
        "{count} social profile(s) provided; at least {MIN_SOCIAL_PROFILES} are required"
    )]
    NotEnoughSocialProfiles { count: usize },
}

/// Optional links to an applicant's social profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfiles {
    pub x: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl SocialProfiles {
    /// Counts the links that are present and non-blank.
    pub fn filled_count(&self) -> usize {
        [&self.x, &self.github, &self.linkedin, &self.instagram]
            .into_iter()
            .filter(|link| link.as_deref().is_some_and(|s| !s.trim().is_empty()))
            .count()
    }
}

/// A self-submitted expert profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertProfile {
    pub name: String,
    pub email: String,
    pub expertise: Vec<Expertise>,
    #[serde(default)]
    pub social_profiles: SocialProfiles,
    pub experience: String,
    #[serde(default)]
    pub is_verified: bool,
}

impl ExpertProfile {
    /// Checks the application form constraints.
    ///
    /// Required fields first, then the two gating rules: the experience
    /// statement must be at least [`MIN_EXPERIENCE_CHARS`] characters and
    /// at least [`MIN_SOCIAL_PROFILES`] social links must be filled in.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::MissingName);
        }
        if self.email.trim().is_empty() {
            return Err(ProfileError::MissingEmail);
        }
        if self.expertise.is_empty() {
            return Err(ProfileError::NoExpertise);
        }
        let len = self.experience.chars().count();
        if len < MIN_EXPERIENCE_CHARS {
            return Err(ProfileError::ExperienceTooShort { len });
        }
        let count = self.social_profiles.filled_count();
        if count < MIN_SOCIAL_PROFILES {
            return Err(ProfileError::NotEnoughSocialProfiles { count });
        }
        Ok(())
    }
}

/// The sole persisted client state: whether the current user is a
/// verified expert, and their profile if so.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredVerification", into = "StoredVerification")]
pub enum ExpertVerification {
    #[default]
    Unverified,
    Verified(ExpertProfile),
}

impl ExpertVerification {
    pub fn is_expert(&self) -> bool {
        matches!(self, ExpertVerification::Verified(_))
    }

    pub fn profile(&self) -> Option<&ExpertProfile> {
        match self {
            ExpertVerification::Verified(profile) => Some(profile),
            ExpertVerification::Unverified => None,
        }
    }
}

/// Wire/storage shape: `{"isExpert": bool, "profile": {...}?}`.
///
/// Kept separate from the enum so the stored JSON stays compatible with
/// the single-key layout described in the data model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredVerification {
    is_expert: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<ExpertProfile>,
}

impl From<StoredVerification> for ExpertVerification {
    fn from(stored: StoredVerification) -> Self {
        match (stored.is_expert, stored.profile) {
            (true, Some(profile)) => ExpertVerification::Verified(profile),
            _ => ExpertVerification::Unverified,
        }
    }
}

impl From<ExpertVerification> for StoredVerification {
    fn from(verification: ExpertVerification) -> Self {
        match verification {
            ExpertVerification::Verified(profile) => StoredVerification {
                is_expert: true,
                profile: Some(profile),
            },
            ExpertVerification::Unverified => StoredVerification {
                is_expert: false,
                profile: None,
            },
        }
    }
}
