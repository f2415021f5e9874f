//! Password prompt in front of the admin panel.
//!
//! This only decides whether the admin panel is shown. The digest is known to
//! whoever holds the client, and the persistence endpoint accepts saves from
//! anyone, so nothing here protects the data.

use std::env;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::try_load;
use crate::error::ConfigError;

/// Built-in digest, used when `ADMIN_DIGEST` is not set.
pub const DEFAULT_ADMIN_DIGEST: &str =
    "559aead08264d5795d3909718cdd05abd49572e84fe55590eef31a88a08fdffd";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminGate {
    digest: [u8; 32],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// The prompt was dismissed.
    Cancelled,
    Opened,
    Refused,
}

impl AdminGate {
    /// Gate for the page, from `ADMIN_DIGEST` or the built-in digest.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let digest: String = try_load(&lookup, "ADMIN_DIGEST", DEFAULT_ADMIN_DIGEST)?;
        Self::from_hex(&digest).map_err(|e| {
            warn!("Invalid ADMIN_DIGEST value: {e}");
            ConfigError::Invalid {
                key: "ADMIN_DIGEST",
                reason: e.to_string(),
            }
        })
    }

    pub fn from_hex(digest: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digest.trim(), &mut bytes)?;
        Ok(Self { digest: bytes })
    }

    pub fn from_password(password: &str) -> Self {
        Self {
            digest: sha256(password),
        }
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    pub fn check(&self, answer: Option<&str>) -> GateOutcome {
        match answer {
            None => GateOutcome::Cancelled,
            Some(password) => {
                if sha256(password) == self.digest {
                    GateOutcome::Opened
                } else {
                    GateOutcome::Refused
                }
            }
        }
    }
}

fn sha256(message: &str) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(message.as_bytes()));
    digest
}
