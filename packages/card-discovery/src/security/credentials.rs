//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate so API keys for the generator, geocoder and
//! image search never end up in logs.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::{DiscoveryError, Result};

/// A secret string that won't be logged or displayed.
///
/// Uses `secrecy::SecretBox` to ensure API keys and other credentials
/// are never accidentally exposed in logs, debug output, or error messages.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    /// Create a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this when actually using the secret (e.g., in an API request).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Read a secret from an environment variable.
    ///
    /// A missing or empty variable is a `Configuration` error.
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(Self::new(value)),
            _ => Err(DiscoveryError::Configuration(format!("{} not set", var))),
        }
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug() {
        let secret = SecretString::new("sk-wander-secret-key");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("sk-wander"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_secret_not_in_display() {
        let secret = SecretString::new("sk-wander-secret-key");
        let display = format!("{}", secret);
        assert!(!display.contains("sk-wander"));
        assert!(display.contains("[REDACTED]"));
    }

    #[test]
    fn test_expose_works() {
        let secret = SecretString::new("sk-wander-secret-key");
        assert_eq!(secret.expose(), "sk-wander-secret-key");
    }

    #[test]
    fn test_clone_keeps_value() {
        let secret: SecretString = "AIza-maps-key".into();
        assert_eq!(secret.clone().expose(), "AIza-maps-key");
    }

    #[test]
    fn test_from_env_var_missing() {
        let err = SecretString::from_env("CARD_DISCOVERY_TEST_UNSET_KEY").unwrap_err();
        assert!(err.to_string().contains("CARD_DISCOVERY_TEST_UNSET_KEY"));
    }
}
