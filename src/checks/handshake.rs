//! TLS handshake capture
//!
//! Connects with SNI set to the target host and completes a handshake that
//! accepts any certificate, so invalid chains can still be inspected.

use crate::config::CheckSettings;
use crate::utils::CheckError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, ClientConnection, DigitallySignedStruct, ProtocolVersion, SignatureScheme};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// What the server presented during the handshake
#[derive(Debug, Clone)]
pub struct Handshake {
    /// Peer chain as sent, leaf first. May be empty.
    pub certificates: Vec<CertificateDer<'static>>,
    pub tls_version: String,
    pub cipher_suite: String,
}

/// Accepts every certificate; trust is evaluated separately afterwards.
#[derive(Debug)]
struct AcceptAnyCertVerifier;

impl ServerCertVerifier for AcceptAnyCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA1,
            SignatureScheme::ECDSA_SHA1_Legacy,
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}

fn client_config() -> Result<Arc<ClientConfig>, CheckError> {
    let config = ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()?
    .dangerous()
    .with_custom_certificate_verifier(Arc::new(AcceptAnyCertVerifier))
    .with_no_client_auth();

    Ok(Arc::new(config))
}

/// Connect to `hostname:port`, complete one handshake and return the
/// negotiated parameters with the peer chain. The socket is closed before
/// returning on every path.
pub fn perform_handshake(
    hostname: &str,
    port: u16,
    settings: &CheckSettings,
) -> Result<Handshake, CheckError> {
    let start = Instant::now();

    let server_name = ServerName::try_from(hostname.to_string()).map_err(|_| {
        CheckError::InvalidHostname {
            hostname: hostname.to_string(),
        }
    })?;

    let mut conn = ClientConnection::new(client_config()?, server_name)?;
    let mut sock = connect(hostname, port, settings)?;

    while conn.is_handshaking() {
        conn.complete_io(&mut sock).map_err(|e| handshake_error(&e))?;
    }

    let tls_version = conn
        .protocol_version()
        .map(protocol_name)
        .unwrap_or_else(|| "Unknown".to_string());

    let cipher_suite = conn
        .negotiated_cipher_suite()
        .map(|suite| iana_cipher_name(&format!("{:?}", suite.suite())))
        .unwrap_or_else(|| "Unknown".to_string());

    let certificates = conn
        .peer_certificates()
        .map(|certs| certs.iter().map(|c| c.clone().into_owned()).collect())
        .unwrap_or_default();

    conn.send_close_notify();
    if let Err(e) = conn.write_tls(&mut sock) {
        debug!("Failed to send close_notify to {}:{}: {}", hostname, port, e);
    }

    debug!(
        "Handshake with {}:{} completed in {} ms ({}, {})",
        hostname,
        port,
        start.elapsed().as_millis(),
        tls_version,
        cipher_suite
    );

    Ok(Handshake {
        certificates,
        tls_version,
        cipher_suite,
    })
}

/// Resolve and connect, trying each address in turn
fn connect(hostname: &str, port: u16, settings: &CheckSettings) -> Result<TcpStream, CheckError> {
    let addrs: Vec<SocketAddr> = (hostname, port)
        .to_socket_addrs()
        .map_err(|e| CheckError::connection(&e))?
        .collect();

    let mut last_error =
        io::Error::new(io::ErrorKind::NotFound, format!("No addresses found for {}", hostname));

    for addr in addrs {
        debug!("Connecting to {} ({}:{})", addr, hostname, port);
        match TcpStream::connect_timeout(&addr, settings.connect_timeout()) {
            Ok(sock) => {
                sock.set_read_timeout(Some(settings.read_timeout()))
                    .map_err(|e| CheckError::connection(&e))?;
                sock.set_write_timeout(Some(settings.read_timeout()))
                    .map_err(|e| CheckError::connection(&e))?;
                return Ok(sock);
            }
            Err(e) => {
                debug!("Connection to {} failed: {}", addr, e);
                last_error = e;
            }
        }
    }

    Err(CheckError::connection(&last_error))
}

/// TLS alerts surface from `complete_io` as `InvalidData` wrapping a
/// `rustls::Error`; everything else is a socket failure
fn handshake_error(err: &io::Error) -> CheckError {
    match err.get_ref().and_then(|inner| inner.downcast_ref::<rustls::Error>()) {
        Some(tls) => CheckError::from(tls.clone()),
        None => CheckError::connection(err),
    }
}

/// Protocol name in the `TLSv1.2` form
pub fn protocol_name(version: ProtocolVersion) -> String {
    match version {
        ProtocolVersion::SSLv3 => "SSLv3".to_string(),
        ProtocolVersion::TLSv1_0 => "TLSv1".to_string(),
        ProtocolVersion::TLSv1_1 => "TLSv1.1".to_string(),
        ProtocolVersion::TLSv1_2 => "TLSv1.2".to_string(),
        ProtocolVersion::TLSv1_3 => "TLSv1.3".to_string(),
        other => format!("{:?}", other),
    }
}

/// rustls names TLS 1.3 suites `TLS13_*`; IANA names them `TLS_*`
pub fn iana_cipher_name(rustls_name: &str) -> String {
    match rustls_name.strip_prefix("TLS13_") {
        Some(rest) => format!("TLS_{}", rest),
        None => rustls_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_names() {
        assert_eq!(protocol_name(ProtocolVersion::TLSv1_0), "TLSv1");
        assert_eq!(protocol_name(ProtocolVersion::TLSv1_1), "TLSv1.1");
        assert_eq!(protocol_name(ProtocolVersion::TLSv1_2), "TLSv1.2");
        assert_eq!(protocol_name(ProtocolVersion::TLSv1_3), "TLSv1.3");
    }

    #[test]
    fn test_iana_cipher_names() {
        assert_eq!(iana_cipher_name("TLS13_AES_256_GCM_SHA384"), "TLS_AES_256_GCM_SHA384");
        assert_eq!(
            iana_cipher_name("TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256"),
            "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256"
        );
    }

    #[test]
    fn test_tls_error_is_unwrapped() {
        let io = io::Error::new(
            io::ErrorKind::InvalidData,
            rustls::Error::AlertReceived(rustls::AlertDescription::HandshakeFailure),
        );
        assert!(matches!(handshake_error(&io), CheckError::Tls { .. }));

        let io = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(handshake_error(&io), CheckError::Connection { .. }));
    }

    #[test]
    fn test_client_config_builds() {
        assert!(client_config().is_ok());
    }

    #[test]
    #[ignore] // Requires network
    fn test_handshake_live() {
        let handshake = perform_handshake("example.com", 443, &CheckSettings::default()).unwrap();
        assert!(!handshake.certificates.is_empty());
        assert!(handshake.tls_version.starts_with("TLSv1."));
    }
}
