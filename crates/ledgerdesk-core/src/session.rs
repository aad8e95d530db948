//! Key/value session state: the bearer token and the cached current user.

use ledgerdesk_domain::{CurrentUser, LoginResponse};

use crate::error::{CoreError, CoreResult};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const CURRENT_USER_KEY: &str = "currentUser";

/// String key/value store that survives between runs.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        (**self).remove(key)
    }
}

/// Typed access to the well-known session keys.
pub struct Session<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token(&self) -> CoreResult<Option<String>> {
        Ok(self
            .store
            .get(AUTH_TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty()))
    }

    pub fn require_token(&self) -> CoreResult<String> {
        self.token()?.ok_or(CoreError::Unauthenticated)
    }

    /// A malformed `currentUser` entry reads as signed out.
    pub fn current_user(&self) -> CoreResult<Option<CurrentUser>> {
        let Some(raw) = self.store.get(CURRENT_USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable currentUser entry");
                Ok(None)
            }
        }
    }

    pub fn require_user(&self) -> CoreResult<CurrentUser> {
        self.current_user()?.ok_or(CoreError::Unauthenticated)
    }

    pub fn is_signed_in(&self) -> CoreResult<bool> {
        Ok(self.token()?.is_some() && self.current_user()?.is_some())
    }

    pub fn sign_in(&self, login: &LoginResponse) -> CoreResult<()> {
        let user = serde_json::to_string(&login.user)?;
        self.store.set(AUTH_TOKEN_KEY, &login.token)?;
        self.store.set(CURRENT_USER_KEY, &user)?;
        tracing::info!(user_id = login.user.id, "session started");
        Ok(())
    }

    pub fn sign_out(&self) -> CoreResult<()> {
        self.store.remove(AUTH_TOKEN_KEY)?;
        self.store.remove(CURRENT_USER_KEY)?;
        tracing::info!("session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySessionStore;

    fn login() -> LoginResponse {
        LoginResponse {
            token: "tok-123".into(),
            user: CurrentUser {
                id: 5,
                name: "Ravi".into(),
                email: None,
                companies: Vec::new(),
                voucher_types: Vec::new(),
            },
        }
    }

    #[test]
    fn sign_in_stores_both_keys() {
        let session = Session::new(MemorySessionStore::default());
        session.sign_in(&login()).unwrap();
        assert_eq!(session.token().unwrap().as_deref(), Some("tok-123"));
        assert_eq!(session.require_user().unwrap().id, 5);
        assert!(session
            .store()
            .get(CURRENT_USER_KEY)
            .unwrap()
            .unwrap()
            .contains("\"name\":\"Ravi\""));
    }

    #[test]
    fn sign_out_clears_session() {
        let session = Session::new(MemorySessionStore::default());
        session.sign_in(&login()).unwrap();
        session.sign_out().unwrap();
        assert!(!session.is_signed_in().unwrap());
        assert!(matches!(session.require_token(), Err(CoreError::Unauthenticated)));
    }

    #[test]
    fn corrupt_user_entry_reads_as_missing() {
        let store = MemorySessionStore::default();
        store.set(CURRENT_USER_KEY, "{not json").unwrap();
        let session = Session::new(store);
        assert!(session.current_user().unwrap().is_none());
    }
}
