//! Verification store: the one piece of persisted client state.
//!
//! The store owns the current [`ExpertVerification`] value and re-persists
//! it through an injected storage port on every change. Consumers read the
//! current value or subscribe to a watch channel; nothing polls.

use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use super::profile::{ExpertProfile, ExpertVerification, ProfileError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored verification is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors from [`VerificationStore::apply_profile`].
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Invalid(#[from] ProfileError),

    #[error("failed to persist verification: {0}")]
    Storage(#[from] StoreError),
}

/// Storage port for the verification value. One key, no versioning.
pub trait VerificationStorage: Send + Sync {
    /// Loads the stored value, `None` when nothing was ever stored.
    fn load(&self) -> Result<Option<ExpertVerification>, StoreError>;

    /// Replaces the stored value.
    fn save(&self, verification: &ExpertVerification) -> Result<(), StoreError>;
}

/// File-backed storage: a single JSON document at a fixed path.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VerificationStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<ExpertVerification>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, verification: &ExpertVerification) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(verification)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory storage for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Mutex<Option<ExpertVerification>>,
}

impl VerificationStorage for MemoryStorage {
    fn load(&self) -> Result<Option<ExpertVerification>, StoreError> {
        Ok(self.value.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, verification: &ExpertVerification) -> Result<(), StoreError> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(verification.clone());
        Ok(())
    }
}

/// Owns the verification state for the running session.
///
/// Single-writer: only the current session mutates the value. Reads are
/// broadcast to every subscriber through a watch channel, so the view
/// layer reacts to changes without polling.
pub struct VerificationStore {
    storage: Box<dyn VerificationStorage>,
    tx: watch::Sender<ExpertVerification>,
}

impl VerificationStore {
    /// Creates a store, seeding state from the storage port. A missing
    /// stored value means the default unverified state.
    pub fn new(storage: Box<dyn VerificationStorage>) -> Result<Self, StoreError> {
        let initial = storage.load()?.unwrap_or_default();
        debug!(is_expert = initial.is_expert(), "verification store initialized");
        let (tx, _rx) = watch::channel(initial);
        Ok(Self { storage, tx })
    }

    /// Returns the current verification value.
    pub fn current(&self) -> ExpertVerification {
        self.tx.borrow().clone()
    }

    /// Subscribes to verification changes.
    pub fn subscribe(&self) -> watch::Receiver<ExpertVerification> {
        self.tx.subscribe()
    }

    /// Validates and accepts an expert application.
    ///
    /// On a validation failure nothing is persisted and the state does not
    /// change. On success the profile is marked verified, persisted, and
    /// broadcast. Verification is granted unconditionally once the form
    /// constraints pass; there is no review step.
    pub fn apply_profile(&self, mut profile: ExpertProfile) -> Result<(), ApplyError> {
        profile.validate()?;
        profile.is_verified = true;

        let verification = ExpertVerification::Verified(profile);
        self.storage.save(&verification)?;

        info!("expert application accepted; feedback unlocked");
        self.tx.send_replace(verification);
        Ok(())
    }

    /// Resets to the default unverified state, unconditionally.
    ///
    /// Nothing remote is erased; no server-side profile store exists.
    pub fn logout(&self) -> Result<(), StoreError> {
        let verification = ExpertVerification::Unverified;
        self.storage.save(&verification)?;

        info!("logged out; verification reset");
        self.tx.send_replace(verification);
        Ok(())
    }
}

impl std::fmt::Debug for VerificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationStore")
            .field("is_expert", &self.tx.borrow().is_expert())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experts::{Expertise, SocialProfiles, MIN_EXPERIENCE_CHARS};

    fn applicant() -> ExpertProfile {
        ExpertProfile {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            expertise: vec![Expertise::Finance, Expertise::Economics],
            social_profiles: SocialProfiles {
                x: Some("https://x.com/grace".to_string()),
                github: None,
                linkedin: Some("https://linkedin.com/in/grace".to_string()),
                instagram: None,
            },
            experience: "y".repeat(MIN_EXPERIENCE_CHARS),
            is_verified: false,
        }
    }

    fn store() -> VerificationStore {
        VerificationStore::new(Box::new(MemoryStorage::default())).unwrap()
    }

    #[test]
    fn test_starts_unverified() {
        assert_eq!(store().current(), ExpertVerification::Unverified);
    }

    #[test]
    fn test_apply_marks_verified_and_persists() {
        let storage = Box::new(MemoryStorage::default());
        let store = VerificationStore::new(storage).unwrap();

        store.apply_profile(applicant()).unwrap();

        let current = store.current();
        assert!(current.is_expert());
        assert!(current.profile().unwrap().is_verified);
    }

    #[test]
    fn test_rejected_application_changes_nothing() {
        let store = store();
        let mut profile = applicant();
        profile.experience = "short".to_string();

        let err = store.apply_profile(profile).unwrap_err();
        assert!(matches!(
            err,
            ApplyError::Invalid(ProfileError::ExperienceTooShort { .. })
        ));
        assert_eq!(store.current(), ExpertVerification::Unverified);
    }

    #[test]
    fn test_logout_resets_regardless_of_prior_state() {
        let store = store();
        store.apply_profile(applicant()).unwrap();
        assert!(store.current().is_expert());

        store.logout().unwrap();
        assert_eq!(store.current(), ExpertVerification::Unverified);

        // Idempotent from the unverified state too.
        store.logout().unwrap();
        assert_eq!(store.current(), ExpertVerification::Unverified);
    }

    #[test]
    fn test_state_survives_reload_through_storage() {
        let storage = std::sync::Arc::new(MemoryStorage::default());

        struct Shared(std::sync::Arc<MemoryStorage>);
        impl VerificationStorage for Shared {
            fn load(&self) -> Result<Option<ExpertVerification>, StoreError> {
                self.0.load()
            }
            fn save(&self, v: &ExpertVerification) -> Result<(), StoreError> {
                self.0.save(v)
            }
        }

        let store = VerificationStore::new(Box::new(Shared(storage.clone()))).unwrap();
        store.apply_profile(applicant()).unwrap();
        drop(store);

        let reloaded = VerificationStore::new(Box::new(Shared(storage))).unwrap();
        assert!(reloaded.current().is_expert());
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let store = store();
        let mut rx = store.subscribe();
        assert!(!rx.borrow().is_expert());

        store.apply_profile(applicant()).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_expert());

        store.logout().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_expert());
    }

    #[test]
    fn test_json_file_storage_round_trip() {
        let dir = std::env::temp_dir().join(format!(
            "verification-store-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("expert_verification.json");
        let _ = std::fs::remove_file(&path);

        let storage = JsonFileStorage::new(&path);
        assert!(storage.load().unwrap().is_none());

        let verification = ExpertVerification::Verified(applicant());
        storage.save(&verification).unwrap();
        assert_eq!(storage.load().unwrap(), Some(verification));

        let _ = std::fs::remove_file(&path);
    }
}
