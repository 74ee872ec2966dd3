//! Per-client authentication state

/// Who is logged in, if anyone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub is_authenticated: bool,
}

/// Owner of the single live [`Session`] of a client
///
/// There are no failure modes: the engine has already validated the
/// credentials by the time `login` is called.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    /// Username of the active session
    pub fn username(&self) -> Option<&str> {
        self.is_authenticated().then_some(self.session.username.as_str())
    }

    pub fn login(&mut self, username: impl Into<String>) {
        self.session = Session {
            username: username.into(),
            is_authenticated: true,
        };
        tracing::info!(user = %self.session.username, "session started");
    }

    pub fn logout(&mut self) {
        if self.session.is_authenticated {
            tracing::info!(user = %self.session.username, "session ended");
        }
        self.session = Session::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unauthenticated() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());
        assert_eq!(store.username(), None);
        assert_eq!(store.session(), &Session::default());
    }

    #[test]
    fn test_login_logout_cycle() {
        let mut store = SessionStore::new();
        store.login("root");
        assert!(store.is_authenticated());
        assert_eq!(store.username(), Some("root"));

        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(store.session().username, "");
    }
}
