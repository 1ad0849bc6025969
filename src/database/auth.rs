//! The session/identity store. It holds at most one signed-in user, mirrors that user to
//! local storage, and stays in the loading state until [`SessionStore::hydrate`] has run.

use base64::{Engine, prelude::BASE64_STANDARD};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::{
    database::user,
    model::user_info::{ProfileUpdate, UserInfo},
    security::GuardState,
};

pub mod session;
pub mod storage;

pub use session::Session;
use storage::{LocalStorage, StorageError};

pub const USER_KEY: &str = "lms_user";
pub const SESSION_KEY: &str = "lms_session";
pub const REMEMBERED_EMAIL_KEY: &str = "lms_remembered_email";

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    session_hash: String,
    expiration: DateTime<Utc>,
}

#[derive(Debug)]
struct ActiveSession {
    user: UserInfo,
    session_hash: Vec<u8>,
    expiration: DateTime<Utc>,
}

pub struct SessionStore {
    storage: Box<dyn LocalStorage>,
    state: SessionState,
    active: Option<ActiveSession>,
    session_ttl: TimeDelta,
}

impl SessionStore {
    pub fn new(storage: Box<dyn LocalStorage>, session_ttl: TimeDelta) -> Self {
        Self {
            storage,
            state: SessionState::Loading,
            active: None,
            session_ttl,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Restores the persisted session, if any. Unreadable or expired records are discarded.
    pub fn hydrate(&mut self) {
        self.active = self.read_persisted();

        match &self.active {
            Some(active) => tracing::info!("Restored session for user {}", active.user.id()),
            None => {
                for key in [USER_KEY, SESSION_KEY] {
                    if let Err(e) = self.storage.remove(key) {
                        tracing::error!("Could not clear stale {key}: {e}");
                    }
                }
            }
        }

        self.state = SessionState::Ready;
    }

    fn read_persisted(&self) -> Option<ActiveSession> {
        let user_json = self.storage.get(USER_KEY)?;
        let session_json = self.storage.get(SESSION_KEY)?;

        let user = match serde_json::from_str::<UserInfo>(&user_json) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Discarding unreadable {USER_KEY}: {e}");
                return None;
            }
        };
        let stored = match serde_json::from_str::<StoredSession>(&session_json) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Discarding unreadable {SESSION_KEY}: {e}");
                return None;
            }
        };
        let session_hash = BASE64_STANDARD.decode(stored.session_hash).ok()?;

        if Utc::now() > stored.expiration {
            tracing::info!("Persisted session for user {} has expired", user.id());
            return None;
        }

        Some(ActiveSession {
            user,
            session_hash,
            expiration: stored.expiration,
        })
    }

    pub fn current_user(&self) -> Option<&UserInfo> {
        self.active.as_ref().map(|a| &a.user)
    }

    /// Signs in against the credential list. A failed attempt leaves the current session alone;
    /// a successful one replaces it.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Session, LoginError> {
        let Some(user) = user::find_user(email, password) else {
            tracing::warn!("Failed login attempt for {email}");
            return Err(LoginError::InvalidCredentials);
        };

        let mut session_id = [0u8; 16];
        rand::fill(&mut session_id);
        let session_hash = Sha512::digest(session_id).to_vec();
        let expiration = Utc::now() + self.session_ttl;

        self.persist(&user, &session_hash, expiration)?;

        tracing::info!("Logged in user {}", user.id());
        self.active = Some(ActiveSession {
            user,
            session_hash,
            expiration,
        });
        self.state = SessionState::Ready;

        Ok(Session::new(session_id))
    }

    pub fn logout(&mut self) -> Result<(), StorageError> {
        if let Some(active) = self.active.take() {
            tracing::info!("Logged out user {}", active.user.id());
        }
        self.storage.remove(USER_KEY)?;
        self.storage.remove(SESSION_KEY)
    }

    /// Merges the update into the current user. Returns `None` when nobody is signed in.
    pub fn update_profile(
        &mut self,
        update: ProfileUpdate,
    ) -> Result<Option<UserInfo>, StorageError> {
        let Some(active) = &self.active else {
            return Ok(None);
        };

        let mut user = active.user.clone();
        user.apply(update);
        self.storage.set(USER_KEY, user_json(&user)?)?;

        if let Some(active) = self.active.as_mut() {
            active.user = user.clone();
        }
        Ok(Some(user))
    }

    /// The signed-in user, if `token` belongs to the live session
    pub fn resolve(&self, token: &str) -> Option<&UserInfo> {
        let active = self.active.as_ref()?;
        let presented = session::token_hash(token)?;

        if presented != active.session_hash || Utc::now() > active.expiration {
            return None;
        }
        Some(&active.user)
    }

    pub fn guard_state(&self, token: Option<&str>) -> GuardState {
        if self.state == SessionState::Loading {
            return GuardState::Loading;
        }

        match token.and_then(|t| self.resolve(t)) {
            Some(user) => GuardState::Authenticated(user.role()),
            None => GuardState::Unauthenticated,
        }
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.storage.get(REMEMBERED_EMAIL_KEY)
    }

    /// Stores the e-mail for the next login form, or forgets it when `None`
    pub fn remember_email(&mut self, email: Option<&str>) -> Result<(), StorageError> {
        match email {
            Some(email) => self.storage.set(REMEMBERED_EMAIL_KEY, email.to_owned()),
            None => self.storage.remove(REMEMBERED_EMAIL_KEY),
        }
    }

    fn persist(
        &mut self,
        user: &UserInfo,
        session_hash: &[u8],
        expiration: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let user_record = user_json(user)?;
        let stored = serde_json::to_string(&StoredSession {
            session_hash: BASE64_STANDARD.encode(session_hash),
            expiration,
        })?;

        let previous = self.storage.get(SESSION_KEY);
        self.storage.set(SESSION_KEY, stored)?;

        if let Err(e) = self.storage.set(USER_KEY, user_record) {
            // The session hash must not outlive a failed user write
            let restored = match previous {
                Some(previous) => self.storage.set(SESSION_KEY, previous),
                None => self.storage.remove(SESSION_KEY),
            };
            if let Err(rollback) = restored {
                tracing::error!("Could not restore {SESSION_KEY}: {rollback}");
            }
            return Err(e);
        }
        Ok(())
    }
}

fn user_json(user: &UserInfo) -> Result<String, StorageError> {
    Ok(serde_json::to_string(user)?)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{database::user::valid_pairs, model::user_info::Role};
    use storage::MemoryStorage;

    /// Storage whose contents stay visible to the test after the store takes ownership
    #[derive(Clone, Default)]
    struct SharedStorage(Arc<Mutex<MemoryStorage>>);

    impl LocalStorage for SharedStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
            self.0.lock().unwrap().set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.0.lock().unwrap().remove(key)
        }
    }

    /// Storage that refuses to write the user record
    #[derive(Clone, Default)]
    struct UserWriteFails(SharedStorage);

    impl LocalStorage for UserWriteFails {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
            if key == USER_KEY {
                return Err(StorageError::Write {
                    path: "lms_storage.json".into(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }
    }

    fn store(storage: &SharedStorage) -> SessionStore {
        let mut store = SessionStore::new(Box::new(storage.clone()), TimeDelta::hours(1));
        store.hydrate();
        store
    }

    #[test]
    fn starts_loading_until_hydrated() {
        let storage = SharedStorage::default();
        let mut store = SessionStore::new(Box::new(storage), TimeDelta::hours(1));
        assert_eq!(store.state(), SessionState::Loading);
        assert_eq!(store.guard_state(None), GuardState::Loading);

        store.hydrate();
        assert_eq!(store.state(), SessionState::Ready);
        assert_eq!(store.guard_state(None), GuardState::Unauthenticated);
    }

    #[test]
    fn every_valid_pair_logs_in_without_password() {
        let storage = SharedStorage::default();
        let mut store = store(&storage);

        for (email, password) in valid_pairs() {
            let session = store.login(email, password).unwrap();
            let user = store.resolve(session.token()).unwrap();
            assert_eq!(user.email(), email);

            let persisted = storage.get(USER_KEY).unwrap();
            assert!(!persisted.contains("password"));
        }
    }

    #[test]
    fn failed_login_keeps_previous_session() {
        let storage = SharedStorage::default();
        let mut store = store(&storage);

        let session = store.login("student1@example.com", "password123").unwrap();
        let persisted = storage.get(USER_KEY);

        assert!(matches!(
            store.login("student1@example.com", "wrong"),
            Err(LoginError::InvalidCredentials)
        ));
        assert!(matches!(
            store.login("ghost@example.com", "password123"),
            Err(LoginError::InvalidCredentials)
        ));

        assert_eq!(store.resolve(session.token()).map(|u| u.id()), Some(1));
        assert_eq!(storage.get(USER_KEY), persisted);
    }

    #[test]
    fn failed_user_write_restores_previous_session_hash() {
        let mut storage = UserWriteFails::default();
        let mut store = SessionStore::new(Box::new(storage.clone()), TimeDelta::hours(1));
        store.hydrate();
        storage.0.set(SESSION_KEY, "old".into()).unwrap();

        assert!(matches!(
            store.login("student1@example.com", "password123"),
            Err(LoginError::Storage(StorageError::Write { .. }))
        ));
        assert_eq!(storage.get(SESSION_KEY).as_deref(), Some("old"));
        assert_eq!(storage.get(USER_KEY), None);
        assert!(store.current_user().is_none());

        storage.0.remove(SESSION_KEY).unwrap();
        assert!(store.login("student1@example.com", "password123").is_err());
        assert_eq!(storage.get(SESSION_KEY), None);
    }

    #[test]
    fn new_login_replaces_the_old_token() {
        let storage = SharedStorage::default();
        let mut store = store(&storage);

        let first = store.login("student1@example.com", "password123").unwrap();
        let second = store.login("admin@example.com", "password123").unwrap();

        assert!(store.resolve(first.token()).is_none());
        assert_eq!(
            store.guard_state(Some(second.token())),
            GuardState::Authenticated(Role::Admin)
        );
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let storage = SharedStorage::default();
        let mut store = store(&storage);
        let session = store.login("faculty@example.com", "password123").unwrap();

        store.logout().unwrap();
        assert!(store.current_user().is_none());
        assert!(store.resolve(session.token()).is_none());
        assert_eq!(storage.get(USER_KEY), None);
        assert_eq!(storage.get(SESSION_KEY), None);
    }

    #[test]
    fn update_profile_merges_and_persists() {
        let storage = SharedStorage::default();
        let mut store = store(&storage);

        assert_eq!(store.update_profile(ProfileUpdate::default()).unwrap(), None);

        store.login("student2@example.com", "password123").unwrap();
        let updated = store
            .update_profile(ProfileUpdate {
                bio: Some("Likes graphs".into()),
                ..Default::default()
            })
            .unwrap()
            .unwrap();

        assert_eq!(updated.name(), "Jane Smith");
        assert_eq!(updated.bio(), Some("Likes graphs"));
        assert!(storage.get(USER_KEY).unwrap().contains("Likes graphs"));
    }

    #[test]
    fn hydrate_restores_persisted_session() {
        let storage = SharedStorage::default();
        let session = store(&storage)
            .login("admin@example.com", "password123")
            .unwrap();

        let restored = store(&storage);
        assert_eq!(restored.resolve(session.token()).map(|u| u.id()), Some(4));
    }

    #[test]
    fn hydrate_drops_expired_and_garbled_sessions() {
        let storage = SharedStorage::default();
        let mut expired = SessionStore::new(Box::new(storage.clone()), TimeDelta::seconds(-1));
        expired.hydrate();
        let session = expired.login("admin@example.com", "password123").unwrap();
        assert!(expired.resolve(session.token()).is_none());

        let restored = store(&storage);
        assert!(restored.current_user().is_none());
        assert_eq!(storage.get(USER_KEY), None);

        let mut garbled = storage.clone();
        garbled.set(USER_KEY, "{".into()).unwrap();
        garbled.set(SESSION_KEY, "{}".into()).unwrap();
        assert!(store(&storage).current_user().is_none());
    }

    #[test]
    fn remembered_email_round_trips() {
        let storage = SharedStorage::default();
        let mut store = store(&storage);

        store.remember_email(Some("student1@example.com")).unwrap();
        assert_eq!(store.remembered_email().as_deref(), Some("student1@example.com"));
        store.logout().unwrap();
        assert_eq!(store.remembered_email().as_deref(), Some("student1@example.com"));

        store.remember_email(None).unwrap();
        assert_eq!(store.remembered_email(), None);
    }
}
