//! Host-facing projection of a presented certificate.

use openssl::x509::X509Ref;
use serde::{Deserialize, Serialize};
use x509_parser::prelude::*;

use crate::error::TLSProbeError;

/// A simplified projection of one X.509 certificate.
///
/// Records are built fresh per probe call from the raw peer chain and are
/// owned solely by the response value; nothing is cached or shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Human-readable distinguished name of the subject
    pub subject: String,
    /// Expiry instant (`NotAfter`) in milliseconds since the Unix epoch
    pub expires: i64,
    /// Whether this is a certificate-authority certificate
    #[serde(rename = "isCA")]
    pub is_ca: bool,
}

impl CertificateRecord {
    /// Projects a raw certificate into a record.
    ///
    /// Goes through DER so the fields come from a single parser: the
    /// subject is the DN display string, `expires` is `NotAfter` in epoch
    /// millis, and `is_ca` is read from the BasicConstraints extension (a
    /// certificate without the extension is not a CA).
    pub fn from_x509(cert: &X509Ref) -> Result<Self, TLSProbeError> {
        let der = cert.to_der().map_err(|e| TLSProbeError::CertificateError {
            reason: format!("failed to encode certificate: {}", e),
        })?;

        let (_, parsed) =
            X509Certificate::from_der(&der).map_err(|e| TLSProbeError::CertificateError {
                reason: format!("failed to parse certificate: {}", e),
            })?;

        let subject = parsed.subject().to_string();
        let expires = parsed.validity().not_after.timestamp() * 1000;
        let is_ca = parsed
            .basic_constraints()
            .map(|bc| bc.map(|ext| ext.value.ca).unwrap_or(false))
            .unwrap_or(false);

        Ok(CertificateRecord {
            subject,
            expires,
            is_ca,
        })
    }
}
