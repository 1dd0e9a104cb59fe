use std::fmt;

/// Maximum number of error body characters surfaced to the user.
pub const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    Config(String),
    Network(String),
    Timeout(String),
    Http {
        status: u16,
        server_message: Option<String>,
        body: String,
    },
    Application {
        code: i64,
        message: Option<String>,
    },
    Parse(String),
    Serialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(message) => write!(formatter, "Config error: {message}"),
            ApiError::Network(message) => write!(formatter, "Network error: {message}"),
            ApiError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            ApiError::Http { status, body, .. } => {
                write!(formatter, "Request failed ({status}): {body}")
            }
            ApiError::Application { code, message } => write!(
                formatter,
                "Request rejected (code {code}): {}",
                message.as_deref().unwrap_or("no message")
            ),
            ApiError::Parse(message) => write!(formatter, "Response error: {message}"),
            ApiError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// The `message` field of a structured server error, if one was sent.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { server_message, .. } => server_message.as_deref(),
            Self::Application { message, .. } => message.as_deref(),
            _ => None,
        }
        .filter(|message| !message.trim().is_empty())
    }

    /// Most specific message available: the server's own message, else the
    /// transport error text.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.server_message()
            .map_or_else(|| self.to_string(), ToString::to_string)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_decode() {
            Self::Parse(format!("Failed to decode response: {err}"))
        } else if err.is_builder() {
            Self::Serialization(format!("Failed to build request: {err}"))
        } else {
            Self::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

/// Trims an error body and caps its length for display.
#[must_use]
pub fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_message() {
        let err = ApiError::Http {
            status: 409,
            server_message: Some("이미 가입된 사용자입니다.".to_string()),
            body: "{\"message\":\"이미 가입된 사용자입니다.\"}".to_string(),
        };
        assert_eq!(err.user_message(), "이미 가입된 사용자입니다.");
    }

    #[test]
    fn user_message_falls_back_to_transport_text() {
        let err = ApiError::Network("Unable to reach the server: connection refused".to_string());
        assert_eq!(
            err.user_message(),
            "Network error: Unable to reach the server: connection refused"
        );
    }

    #[test]
    fn blank_server_message_is_ignored() {
        let err = ApiError::Http {
            status: 500,
            server_message: Some("  ".to_string()),
            body: "oops".to_string(),
        };
        assert_eq!(err.server_message(), None);
        assert!(err.user_message().starts_with("Request failed (500)"));
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body(" bad gateway \n"), "bad gateway");
        assert_eq!(sanitize_body(&"x".repeat(500)).len(), MAX_ERROR_CHARS);
    }
}
