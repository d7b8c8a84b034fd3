//! OS keyring-backed session storage implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keyring::Entry;

use super::{SessionStore, StoreError};
use crate::model::Session;

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const REFRESHED_AT_KEY: &str = "refreshed_at";

/// OS keyring-backed session store.
///
/// This store uses the platform's native keyring service:
/// - macOS: Keychain
/// - Linux: Secret Service API (via libsecret)
/// - Windows: Credential Manager
///
/// The token pair is stored as separate entries under
/// `{service_name}/access_token` and `{service_name}/refresh_token`.
pub struct KeyringStore {
    service_name: String,
}

impl KeyringStore {
    /// Try to create a new keyring store.
    ///
    /// Returns an error if the keyring backend is not available on this
    /// platform.
    pub fn try_new(service_name: &str) -> Result<Self, StoreError> {
        // Validate that keyring is available by attempting to create a test entry
        let test_key = format!("{}/__test__", service_name);
        match Entry::new(&test_key, "availability_check") {
            Ok(_) => Ok(Self {
                service_name: service_name.to_string(),
            }),
            Err(e) => Err(StoreError::KeyringUnavailable {
                message: format!("keyring backend not available: {}", e),
            }),
        }
    }

    /// Create a keyring entry for the given key.
    fn create_entry(&self, key: &str) -> Result<Entry, StoreError> {
        let service = format!("{}/{}", self.service_name, key);
        Entry::new(&service, "foliogate").map_err(|e| StoreError::BackendError {
            message: format!("failed to create keyring entry: {}", e),
        })
    }

    fn get_value(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entry = self.create_entry(key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::BackendError {
                message: format!("keyring error for {}: {}", key, e),
            }),
        }
    }

    fn set_value(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let entry = self.create_entry(key)?;
        entry
            .set_password(value)
            .map_err(|e| StoreError::BackendError {
                message: format!("failed to set keyring entry {}: {}", key, e),
            })
    }

    fn delete_value(&self, key: &str) -> Result<(), StoreError> {
        let entry = self.create_entry(key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Idempotent delete
            Err(e) => Err(StoreError::BackendError {
                message: format!("failed to delete keyring entry {}: {}", key, e),
            }),
        }
    }
}

/// Parse a persisted refresh timestamp, flagging corrupt entries.
fn parse_refreshed_at(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unparseable persisted refresh timestamp");
            None
        }
    }
}

impl std::fmt::Debug for KeyringStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringStore")
            .field("service_name", &self.service_name)
            .finish()
    }
}

#[async_trait]
impl SessionStore for KeyringStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        let Some(access) = self.get_value(ACCESS_TOKEN_KEY)? else {
            return Ok(None);
        };

        let mut session = Session::new(access);

        if let Some(refresh) = self.get_value(REFRESH_TOKEN_KEY)? {
            session = session.with_refresh_token(refresh);
        }

        if let Some(refreshed_at) = self.get_value(REFRESHED_AT_KEY)? {
            if let Some(parsed) = parse_refreshed_at(&refreshed_at) {
                session.refreshed_at = parsed;
            }
        }

        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.set_value(ACCESS_TOKEN_KEY, session.access_token.expose())?;
        self.set_value(REFRESHED_AT_KEY, &session.refreshed_at.to_rfc3339())?;

        match &session.refresh_token {
            Some(refresh) => self.set_value(REFRESH_TOKEN_KEY, refresh.expose())?,
            None => self.delete_value(REFRESH_TOKEN_KEY)?,
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.delete_value(ACCESS_TOKEN_KEY)?;
        self.delete_value(REFRESH_TOKEN_KEY)?;
        self.delete_value(REFRESHED_AT_KEY)?;
        Ok(())
    }
}
