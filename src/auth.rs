// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! API key authentication.

use crate::credentials::CredentialStore;
use axum::http::StatusCode;
use thiserror::Error;
use tracing::debug;

/// Reason an API key was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("API key is required")]
    MissingKey,

    #[error("Invalid API key")]
    InvalidKey,
}

impl AuthRejection {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

/// Result of authenticating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    /// Key is known; carries the caller label
    Admitted { label: String },
    /// Key is missing or unknown
    Rejected(AuthRejection),
}

impl AuthResult {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AuthResult::Admitted { .. })
    }
}

/// Checks presented API keys against the credential store.
#[derive(Debug, Clone)]
pub struct Authenticator {
    store: CredentialStore,
}

impl Authenticator {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    /// Authenticate a presented key. An empty header counts as absent.
    pub fn authenticate(&self, presented: Option<&str>) -> AuthResult {
        let key = match presented {
            Some(k) if !k.is_empty() => k,
            _ => {
                debug!("Request without API key");
                return AuthResult::Rejected(AuthRejection::MissingKey);
            }
        };

        match self.store.resolve(key) {
            Some(label) => AuthResult::Admitted { label },
            None => {
                debug!("Unknown API key presented");
                AuthResult::Rejected(AuthRejection::InvalidKey)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(CredentialStore::new("secret:Scam Watch,other:Mod Team"))
    }

    #[test]
    fn test_missing_key() {
        let result = authenticator().authenticate(None);
        assert_eq!(result, AuthResult::Rejected(AuthRejection::MissingKey));

        let result = authenticator().authenticate(Some(""));
        assert_eq!(result, AuthResult::Rejected(AuthRejection::MissingKey));
    }

    #[test]
    fn test_invalid_key() {
        let result = authenticator().authenticate(Some("guess"));
        assert_eq!(result, AuthResult::Rejected(AuthRejection::InvalidKey));
    }

    #[test]
    fn test_admitted_with_label() {
        let auth = authenticator();
        assert_eq!(
            auth.authenticate(Some("secret")),
            AuthResult::Admitted {
                label: "Scam Watch".to_string()
            }
        );
        assert_eq!(
            auth.authenticate(Some("other")),
            AuthResult::Admitted {
                label: "Mod Team".to_string()
            }
        );
    }

    #[test]
    fn test_rejection_messages_and_status() {
        assert_eq!(AuthRejection::MissingKey.to_string(), "API key is required");
        assert_eq!(AuthRejection::InvalidKey.to_string(), "Invalid API key");
        assert_eq!(
            AuthRejection::InvalidKey.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_every_configured_key_admitted() {
        let configs = ["a:A", "a:A,b:B", "x:1,y:2,z:3", "k:first,k:second"];

        for source in configs {
            let store = CredentialStore::new(source);
            let auth = Authenticator::new(store.clone());
            for (key, label) in store.snapshot() {
                assert_eq!(auth.authenticate(Some(&key)), AuthResult::Admitted { label });
            }
            assert!(!auth.authenticate(Some("not-configured")).is_admitted());
        }
    }
}
