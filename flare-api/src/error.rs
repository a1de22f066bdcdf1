use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Everything that can go wrong talking to the backend.
/// The [Display] output of every variant is fit to be shown to a user as is.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received
    #[error("Network error while {action}")]
    Network {
        action: &'static str,
        /// The underlying transport error, for logging
        reason: String,
    },
    /// The backend responded with an error
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// The backend responded successfully but with something unexpected
    #[error("Unexpected response while {action}: {reason}")]
    Parse {
        action: &'static str,
        reason: String,
    },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The request was rejected before it was sent
    #[error("{0}")]
    Validation(String),
    #[error("Invalid photo: {0}")]
    InvalidPhoto(String),
    #[error("Could not set up the HTTP client: {0}")]
    Setup(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, message: _ } => Some(*status),
            _ => None,
        }
    }

    /// True if the session was rejected and the user should log in again
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Describes a request in words, for error messages
#[derive(Debug, Clone, Copy)]
pub struct Action {
    /// What was being done, as in "Network error while ..."
    pub doing: &'static str,
    /// Shown when the backend fails without saying why
    pub failed: &'static str,
}

impl Action {
    pub const fn new(doing: &'static str, failed: &'static str) -> Self {
        Self { doing, failed }
    }

    pub fn network(&self, error: reqwest::Error) -> ApiError {
        ApiError::Network {
            action: self.doing,
            reason: error.to_string(),
        }
    }

    pub fn parse(&self, error: impl ToString) -> ApiError {
        ApiError::Parse {
            action: self.doing,
            reason: error.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Turns an unsuccessful response into an error carrying the backend's own message
pub async fn handle_unsuccessful_request(response: Response, action: Action) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    ApiError::Backend {
        status: status.as_u16(),
        message: extract_message(&text).unwrap_or_else(|| action.failed.to_string()),
    }
}

/// Plain text bodies longer than this are not shown to the user
const MAX_TEXT_MESSAGE_LENGTH: usize = 200;

fn extract_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return serde_json::from_value::<ErrorBody>(value)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty());
    }

    // Short plain text is used as is, markup never is
    let text = body.trim();
    let is_readable =
        !text.is_empty() && !text.starts_with('<') && text.len() <= MAX_TEXT_MESSAGE_LENGTH;

    is_readable.then(|| text.to_string())
}

#[cfg(test)]
mod test {
    use super::{extract_message, Action, ApiError};

    #[test]
    fn message_from_body() {
        assert_eq!(
            extract_message(r#"{"message":"The email field is required.","errors":{}}"#),
            Some("The email field is required.".to_string())
        );
        assert_eq!(
            extract_message(r#"{"error":"Unauthenticated"}"#),
            Some("Unauthenticated".to_string())
        );
        assert_eq!(extract_message(r#"{"message":""}"#), None);
        assert_eq!(extract_message(r#"{"status":"down"}"#), None);
    }

    #[test]
    fn message_from_plain_text() {
        assert_eq!(
            extract_message("Too Many Attempts.\n"),
            Some("Too Many Attempts.".to_string())
        );
        assert_eq!(extract_message("<html>502 Bad Gateway</html>"), None);
        assert_eq!(extract_message("   "), None);
        assert_eq!(extract_message(&"x".repeat(500)), None);
    }

    #[test]
    fn errors_read_like_messages() {
        let action = Action::new("posting flare", "Failed to post flare");

        let backend = ApiError::Backend {
            status: 401,
            message: "Unauthenticated.".to_string(),
        };
        assert_eq!(backend.to_string(), "Unauthenticated.");
        assert!(backend.is_unauthorized());

        let parse = action.parse("missing field `id`");
        assert_eq!(
            parse.to_string(),
            "Unexpected response while posting flare: missing field `id`"
        );

        let network = ApiError::Network {
            action: action.doing,
            reason: "connection refused".to_string(),
        };
        assert_eq!(network.to_string(), "Network error while posting flare");
        assert!(network.is_network());
    }
}
