//! Stored session credentials and the store abstraction around them.
//!
//! The store is deliberately small: the access/refresh token pair plus the
//! signed-in user, written on login/signup, replaced on renewal, wiped on
//! logout or renewal failure. Consumers that need to react to those writes
//! (the app shell routes to the login page when the session is cleared)
//! subscribe for [`SessionEvent`]s instead of polling.

use std::fmt::Debug;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Storage key for the access token in the app's persisted key-value store.
pub const STORAGE_KEY_ACCESS_TOKEN: &str = "auth.access_token";
/// Storage key for the refresh token.
pub const STORAGE_KEY_REFRESH_TOKEN: &str = "auth.refresh_token";
/// Storage key for the signed-in user, serialized as JSON.
pub const STORAGE_KEY_USER: &str = "auth.user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// What new accounts get; the server never hands out more on sign-up.
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

/// The user object returned by the auth endpoints and cached alongside the
/// token pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// One signed-in session: the token pair plus its user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

/// Notification that the stored session changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was stored or its tokens were replaced.
    Updated,
    /// The session was wiped (logout or failed renewal).
    Cleared,
}

/// Where session credentials live.
///
/// `get`/`set`/`clear` may be called from fetch callback threads, so
/// implementations must be internally synchronized. `subscribe` hands out a
/// channel that receives one event per effective change.
pub trait SessionStore: Send + Sync + Debug {
    fn get(&self) -> Option<Session>;
    fn set(&self, session: Session);
    fn clear(&self);
    fn subscribe(&self) -> flume::Receiver<SessionEvent>;
}

/// In-memory [`SessionStore`]. The UI shell mirrors it into the app's
/// persisted storage on save.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
    subscribers: Mutex<Vec<flume::Sender<SessionEvent>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn notify(&self, event: SessionEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .expect("session subscribers poisoned");
        subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.session
            .lock()
            .expect("session store poisoned")
            .clone()
    }

    fn set(&self, session: Session) {
        *self.session.lock().expect("session store poisoned") = Some(session);
        self.notify(SessionEvent::Updated);
    }

    fn clear(&self) {
        let had_session = self
            .session
            .lock()
            .expect("session store poisoned")
            .take()
            .is_some();
        // Clearing an empty store is a no-op; repeat Cleared events would
        // bounce the router back to the login page it already shows.
        if had_session {
            self.notify(SessionEvent::Cleared);
        }
    }

    fn subscribe(&self) -> flume::Receiver<SessionEvent> {
        let (tx, rx) = flume::unbounded();
        self.subscribers
            .lock()
            .expect("session subscribers poisoned")
            .push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        Session {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            user: AuthUser {
                id: 7,
                email: "user@taskdeck.dev".to_string(),
                name: "Test User".to_string(),
                role: Role::User,
            },
        }
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.get().is_none());
        store.set(sample_session());
        let session = store.get().expect("session should be stored");
        assert_eq!(session.access_token, "access-1");
        assert_eq!(session.user.email, "user@taskdeck.dev");
    }

    #[test]
    fn test_clear_removes_session() {
        let store = MemorySessionStore::with_session(sample_session());
        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_subscribe_receives_updates_and_clear() {
        let store = MemorySessionStore::new();
        let events = store.subscribe();

        store.set(sample_session());
        store.clear();

        assert_eq!(events.try_recv(), Ok(SessionEvent::Updated));
        assert_eq!(events.try_recv(), Ok(SessionEvent::Cleared));
        assert!(events.try_recv().is_err(), "no further events expected");
    }

    #[test]
    fn test_clear_on_empty_store_emits_nothing() {
        let store = MemorySessionStore::new();
        let events = store.subscribe();
        store.clear();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_role_serialization_is_screaming_case() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""ADMIN""#);
        assert_eq!(
            serde_json::from_str::<Role>(r#""USER""#).unwrap(),
            Role::User
        );
    }

    #[test]
    fn test_auth_user_json_roundtrip() {
        let json = r#"{"id":1,"email":"admin@taskdeck.dev","name":"Admin","role":"ADMIN"}"#;
        let user: AuthUser = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(user.role, Role::Admin);
        assert!(user.role.is_admin());
        let back = serde_json::to_string(&user).expect("Should serialize");
        assert!(back.contains(r#""role":"ADMIN""#));
    }
}
