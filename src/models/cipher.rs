//! Negotiated cipher suite analysis types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strength tier of a cipher suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CipherStrength {
    Weak,
    Acceptable,
    Strong,
}

impl fmt::Display for CipherStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherStrength::Weak => write!(f, "Weak"),
            CipherStrength::Acceptable => write!(f, "Acceptable"),
            CipherStrength::Strong => write!(f, "Strong"),
        }
    }
}

/// Components of an IANA cipher suite identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherComponents {
    pub key_exchange: String,
    pub encryption: String,
    pub mac: String,
}

/// Whether a client platform can negotiate the cipher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCompatibility {
    pub platform: String,
    pub supported: bool,
    pub detail: String,
}

/// Decomposition of the negotiated cipher suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherAnalysis {
    /// Cipher suite name (e.g., TLS_AES_256_GCM_SHA384)
    pub name: String,
    /// Key exchange algorithm (`N/A (TLS 1.3)` for TLS 1.3 suites)
    pub key_exchange: String,
    /// Encryption algorithm
    pub encryption: String,
    /// MAC / hash algorithm
    pub mac: String,
    pub strength: CipherStrength,
    pub forward_secrecy: bool,
    pub is_tls13: bool,
    pub is_aead: bool,
    /// Verdicts in fixed platform order
    pub compatibility: Vec<PlatformCompatibility>,
}
