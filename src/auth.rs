//! Basic-auth access guard.
//!
//! Credential comparison is constant-time via the `subtle` crate so response
//! timing reveals nothing about how much of a guess was correct. Username and
//! password are both always compared; a wrong username does not short-circuit
//! the password check.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use subtle::ConstantTimeEq;

use crate::error::{CritiqError, Result};

/// A username/password pair presented by a client.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Parse an `Authorization: Basic <base64>` header value into [`Credentials`].
///
/// # Errors
///
/// Returns [`CritiqError::Unauthorized`] when the prefix is missing, the
/// payload is not valid base64/UTF-8, or it lacks the `user:pass` separator.
pub fn parse_basic_header(header: &str) -> Result<Credentials> {
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or_else(|| CritiqError::Unauthorized("missing Basic prefix".to_string()))?;

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| CritiqError::Unauthorized("invalid base64 payload".to_string()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| CritiqError::Unauthorized("payload is not UTF-8".to_string()))?;

    // RFC 7617: everything after the first colon is the password.
    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| CritiqError::Unauthorized("missing credential separator".to_string()))?;

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Validates presented credentials against the configured pair.
pub struct AccessGuard {
    username: String,
    password: String,
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AccessGuard {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Check `presented` against the configured pair.
    ///
    /// # Errors
    ///
    /// Returns [`CritiqError::Unauthorized`] unless both fields match.
    pub fn verify(&self, presented: &Credentials) -> Result<()> {
        let username_ok = constant_time_eq(presented.username.as_bytes(), self.username.as_bytes());
        let password_ok = constant_time_eq(presented.password.as_bytes(), self.password.as_bytes());

        // Bitwise AND so both comparisons always run.
        if username_ok & password_ok {
            Ok(())
        } else {
            Err(CritiqError::Unauthorized(
                "credential mismatch".to_string(),
            ))
        }
    }
}

/// Constant-time byte equality. Length is not secret; content is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_basic(user: &str, pass: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{user}:{pass}")))
    }

    #[test]
    fn test_parse_basic_header_roundtrip() {
        let creds = parse_basic_header(&encode_basic("admin", "password123")).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "password123");
    }

    #[test]
    fn test_parse_basic_header_password_may_contain_colons() {
        let creds = parse_basic_header(&encode_basic("admin", "pa:ss:word")).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "pa:ss:word");
    }

    #[test]
    fn test_parse_basic_header_rejects_bearer() {
        let err = parse_basic_header("Bearer some-token").unwrap_err();
        assert!(matches!(err, CritiqError::Unauthorized(_)));
    }

    #[test]
    fn test_parse_basic_header_rejects_bad_base64() {
        let err = parse_basic_header("Basic %%%not-base64%%%").unwrap_err();
        assert!(matches!(err, CritiqError::Unauthorized(_)));
    }

    #[test]
    fn test_parse_basic_header_rejects_missing_separator() {
        let header = format!("Basic {}", BASE64.encode("no-colon-here"));
        let err = parse_basic_header(&header).unwrap_err();
        assert!(matches!(err, CritiqError::Unauthorized(_)));
    }

    #[test]
    fn test_verify_accepts_matching_pair() {
        let guard = AccessGuard::new("admin", "password123");
        let creds = Credentials {
            username: "admin".into(),
            password: "password123".into(),
        };
        assert!(guard.verify(&creds).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let guard = AccessGuard::new("admin", "password123");
        let creds = Credentials {
            username: "admin".into(),
            password: "wrong".into(),
        };
        assert!(matches!(
            guard.verify(&creds),
            Err(CritiqError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_username() {
        let guard = AccessGuard::new("admin", "password123");
        let creds = Credentials {
            username: "root".into(),
            password: "password123".into(),
        };
        assert!(guard.verify(&creds).is_err());
    }

    #[test]
    fn test_verify_rejects_empty_credentials() {
        let guard = AccessGuard::new("admin", "password123");
        let creds = Credentials {
            username: String::new(),
            password: String::new(),
        };
        assert!(guard.verify(&creds).is_err());
    }

    #[test]
    fn test_constant_time_eq_handles_length_mismatch() {
        assert!(!constant_time_eq(b"short", b"much longer input"));
        assert!(constant_time_eq(b"same", b"same"));
        assert!(!constant_time_eq(b"same", b"sane"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        let printed = format!("{creds:?}");
        assert!(printed.contains("admin"));
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("hunter2"));
    }
}
