//! Credentials for tile and API requests.
//!
//! A signed-in user sends a bearer token, a public share link sends a share
//! key. The enum makes sending both impossible.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MaprError, Result};

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Credential {
    Token(String),
    ShareKey(String),
}

impl Credential {
    /// Combine optional query inputs; both present is rejected.
    pub fn from_parts(token: Option<String>, share_key: Option<String>) -> Result<Option<Self>> {
        match (token, share_key) {
            (Some(_), Some(_)) => Err(MaprError::ConflictingCredentials),
            (Some(t), None) => Ok(Some(Credential::Token(t))),
            (None, Some(k)) => Ok(Some(Credential::ShareKey(k))),
            (None, None) => Ok(None),
        }
    }

    /// Query-string parameter carrying this credential.
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            Credential::Token(t) => ("token", t),
            Credential::ShareKey(k) => ("key", k),
        }
    }

    /// Share-mode visitors cannot use the resolution override toggles.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Credential::Token(_))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Token(_) => f.write_str("Token(***)"),
            Credential::ShareKey(_) => f.write_str("ShareKey(***)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_credentials_rejected() {
        let err = Credential::from_parts(Some("t".into()), Some("k".into())).unwrap_err();
        assert!(matches!(err, MaprError::ConflictingCredentials));
        assert_eq!(Credential::from_parts(None, None).unwrap(), None);
    }

    #[test]
    fn test_query_pairs() {
        assert_eq!(Credential::Token("abc".into()).query_pair(), ("token", "abc"));
        assert_eq!(Credential::ShareKey("xyz".into()).query_pair(), ("key", "xyz"));
        assert!(!Credential::ShareKey("xyz".into()).is_logged_in());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let s = format!("{:?}", Credential::Token("secret-token".into()));
        assert!(!s.contains("secret"));
    }
}
