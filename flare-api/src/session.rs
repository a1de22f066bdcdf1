use flare_core::{PrimaryKey, User};
use serde::Deserialize;

/// A logged in user and the bearer token that proves it.
///
/// Every authenticated request takes a session explicitly.
#[derive(Clone, Deserialize)]
pub struct Session {
    #[serde(alias = "access_token")]
    token: String,
    user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> PrimaryKey {
        self.user.id
    }

    /// Replaces the user, after a profile update for example
    pub fn set_user(&mut self, user: User) {
        self.user = user;
    }
}

// The token stays out of logs
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use flare_core::User;

    use super::Session;

    #[test]
    fn debug_hides_token() {
        let session = Session::new("secret-token", User::mock(1, "sam"));
        let debug = format!("{:?}", session);

        assert!(debug.contains("sam"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn login_response() {
        let json = r#"{
            "token": "1|abc",
            "user": { "id": 4, "name": "Sam", "username": "sam", "email": "sam@example.com" }
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();

        assert_eq!(session.token(), "1|abc");
        assert_eq!(session.user_id(), 4);
    }
}
