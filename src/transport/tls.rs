//! TLS connector for the gateway endpoint.
//!
//! The KLF 200 presents a self-signed certificate, so verification is
//! disabled entirely; instead the certificate's SHA-256 fingerprint is
//! captured and exposed so callers can pin it out of band.

use std::net::SocketAddr;
use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use sha2::{Digest, Sha256};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

use crate::error::{Error, Result};

/// An established TLS session plus the peer identity it produced.
pub struct TlsConnection {
    /// The encrypted byte stream.
    pub stream: TlsStream<TcpStream>,
    /// Resolved peer socket address.
    pub addr: SocketAddr,
    /// SHA-256 fingerprint of the peer certificate.
    pub fingerprint: String,
}

/// Certificate verifier that accepts anything and only checks the
/// handshake signatures.
#[derive(Debug)]
struct AcceptAnyCertificate(CryptoProvider);

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

/// Render a certificate digest as colon-separated hex.
fn fingerprint(cert: &CertificateDer<'_>) -> String {
    let digest = Sha256::digest(cert.as_ref());
    digest
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Open a TCP connection to `host:port` and run the TLS handshake.
pub async fn connect(host: &str, port: u16) -> Result<TlsConnection> {
    let provider = rustls::crypto::aws_lc_rs::default_provider();
    let config = ClientConfig::builder_with_provider(Arc::new(provider.clone()))
        .with_safe_default_protocol_versions()
        .map_err(Error::Tls)?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate(provider)))
        .with_no_client_auth();

    let server_name = ServerName::try_from(host.to_owned())
        .map_err(|_| Error::Address(format!("invalid server name: {host}")))?;

    let tcp = TcpStream::connect((host, port)).await?;
    let addr = tcp.peer_addr()?;

    let connector = TlsConnector::from(Arc::new(config));
    let stream = connector.connect(server_name, tcp).await?;

    let fingerprint = stream
        .get_ref()
        .1
        .peer_certificates()
        .and_then(|certs| certs.first())
        .map(fingerprint)
        .unwrap_or_default();

    Ok(TlsConnection {
        stream,
        addr,
        fingerprint,
    })
}
