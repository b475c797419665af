//! TLS Configuration for the Android TV protocol
//!
//! The TV presents a self-signed certificate, so the server chain is never
//! verified: trust comes from the pairing secret, which binds both public
//! keys to the PIN shown on screen. The client always presents its own
//! certificate.

use crate::{CertificateInfo, Result};
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use openssl::x509::X509;
use tracing::debug;

/// Create a TLS connector (client) configuration presenting our certificate
///
/// # Arguments
///
/// * `our_cert` - Client key pair and certificate chain
///
/// # Returns
///
/// Configured SslConnector that accepts any server certificate
pub fn create_client_config(our_cert: &CertificateInfo) -> Result<SslConnector> {
    debug!("Creating TLS client config");

    let mut connector_builder = SslConnector::builder(SslMethod::tls_client())?;

    // Self-signed TV certificates: no chain or hostname verification
    connector_builder.set_verify(SslVerifyMode::NONE);

    let cert = our_cert.x509()?;
    let pkey = our_cert.pkey()?;
    connector_builder.set_certificate(&cert)?;
    connector_builder.set_private_key(&pkey)?;
    connector_builder.check_private_key()?;

    for extra in our_cert.certificates.iter().skip(1) {
        connector_builder.add_extra_chain_cert(X509::from_der(extra)?)?;
    }

    let connector = connector_builder.build();

    debug!("TLS client config created successfully");
    Ok(connector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_config() {
        let cert = CertificateInfo::generate().unwrap();
        let config = create_client_config(&cert);
        assert!(config.is_ok());
    }

    #[test]
    fn test_mismatched_key_rejected() {
        let mut cert = CertificateInfo::generate().unwrap();
        let other = CertificateInfo::generate().unwrap();
        cert.private_key = other.private_key;

        assert!(create_client_config(&cert).is_err());
    }
}
