//! Error types for TLS peer-chain probing.
//!
//! This module defines the errors that can occur while probing a remote
//! endpoint and projecting its presented certificate chain.

use std::fmt;

/// Error type for TLS probe failures.
///
/// Every probe failure propagates unchanged to the caller's future as a
/// rejection; there is no local recovery, retry, or fallback value. In
/// particular "expired" is never inferred from an error.
#[derive(Debug)]
pub enum TLSProbeError {
    /// The supplied target was empty or otherwise unusable
    InvalidTarget {
        /// Why the target was rejected
        reason: String,
    },

    /// TCP connect or TLS handshake failed (timeout, refusal, protocol error)
    ConnectionFailed {
        /// The target the probe was attempting to reach
        target: String,
        /// The underlying cause
        details: String,
    },

    /// The handshake succeeded but the peer presented zero certificates
    EmptyChain {
        /// The target that presented the empty chain
        target: String,
    },

    /// A presented certificate could not be parsed or projected
    CertificateError {
        /// Description of what went wrong
        reason: String,
    },

    /// A generic error with a custom message
    Other {
        /// Error message
        message: String,
    },
}

impl fmt::Display for TLSProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget { reason } => {
                write!(f, "Invalid target: {}", reason)
            }
            Self::ConnectionFailed { target, details } => {
                write!(
                    f,
                    "Connection failed to {}: {}. Verify the host is running a TLS service and is reachable.",
                    target, details
                )
            }
            Self::EmptyChain { target } => {
                write!(f, "Chain of peer certificates for {} is empty", target)
            }
            Self::CertificateError { reason } => {
                write!(f, "Certificate error: {}", reason)
            }
            Self::Other { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for TLSProbeError {}

impl From<openssl::error::ErrorStack> for TLSProbeError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        Self::Other {
            message: format!("OpenSSL error: {}", e),
        }
    }
}

impl From<String> for TLSProbeError {
    fn from(s: String) -> Self {
        Self::Other { message: s }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TLSProbeError::InvalidTarget {
            reason: "target must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid target: target must not be empty");
    }

    #[test]
    fn test_empty_chain_display_names_target() {
        let err = TLSProbeError::EmptyChain {
            target: "example.com".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Chain of peer certificates for example.com is empty"
        );
    }

    #[test]
    fn test_connection_failed_display_names_target_and_cause() {
        let err = TLSProbeError::ConnectionFailed {
            target: "example.com".to_string(),
            details: "connection refused".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("example.com"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_error_from_string() {
        let err: TLSProbeError = "test error".to_string().into();
        assert_eq!(err.to_string(), "test error");
    }
}
