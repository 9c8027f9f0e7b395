//! Request authentication.
//!
//! Modules only know the [`Authenticator`] trait; the concrete check is
//! injected when the server is composed.

use axum::http::HeaderMap;

use crate::ServiceError;

/// Header carrying the shared warden password.
pub const WARDEN_PASSWORD_HEADER: &str = "x-warden-password";

/// Pluggable authenticator, called by handlers that guard an action.
///
/// - `headers`: the HTTP request headers
/// - `action`: a `module:resource:action` string such as `meal:dashboard:read`
pub trait Authenticator: Send + Sync + 'static {
    fn check(&self, headers: &HeaderMap, action: &str) -> Result<(), ServiceError>;
}

/// Accepts requests that present one static shared password.
pub struct SharedPassword {
    password: String,
}

impl SharedPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl Authenticator for SharedPassword {
    fn check(&self, headers: &HeaderMap, action: &str) -> Result<(), ServiceError> {
        let presented = headers
            .get(WARDEN_PASSWORD_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ServiceError::Unauthorized(format!("{action} requires the warden password"))
            })?;

        if presented == self.password {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized("incorrect password".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(password: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(WARDEN_PASSWORD_HEADER, HeaderValue::from_str(password).unwrap());
        headers
    }

    #[test]
    fn shared_password_accepts_match() {
        let auth = SharedPassword::new("warden123");
        assert!(auth.check(&headers_with("warden123"), "meal:dashboard:read").is_ok());
    }

    #[test]
    fn shared_password_rejects_wrong_or_missing() {
        let auth = SharedPassword::new("warden123");

        let err = auth.check(&headers_with("guess"), "meal:dashboard:read").unwrap_err();
        assert_eq!(err.error_code(), "UNAUTHENTICATED");

        let err = auth.check(&HeaderMap::new(), "meal:settings:write").unwrap_err();
        assert!(err.to_string().contains("meal:settings:write"));
    }
}
