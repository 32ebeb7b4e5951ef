//! Check modules for certcheck
//!
//! Each stage of an inspection: the handshake, platform trust, chain and
//! hostname verification, per-certificate analysis and cipher scoring.

pub mod certificate;
pub mod chain;
pub mod cipher;
pub mod handshake;
pub mod protocol;
pub mod trust;

pub use certificate::CertificateAnalyzer;
pub use chain::{matches_hostname, verify_chain_linkage, verify_hostname};
pub use cipher::analyze_cipher_suite;
pub use handshake::{perform_handshake, Handshake};
pub use protocol::{check_chain_length, check_tls_version};
pub use trust::TrustAnchors;
