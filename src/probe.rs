//! Blocking TLS probe.
//!
//! Opens a TCP connection to `target:port`, performs a handshake with peer
//! verification disabled, and returns the certificate chain exactly as the
//! peer presented it (leaf first). The handshake is observational: it never
//! establishes trust and never verifies the hostname, so it can read
//! expired and untrusted chains.

use log::{debug, warn};
use openssl::ssl::{Ssl, SslContext, SslMethod, SslVerifyMode};
use openssl::x509::X509;
use std::net::{TcpStream, ToSocketAddrs};

use crate::config::ProbeConfig;
use crate::error::TLSProbeError;

/// Source of a peer certificate chain for a target.
///
/// The production implementation is [`TlsProbe`]; tests substitute canned
/// chains and simulated failures through this seam.
pub trait ChainSource: Send + Sync {
    /// Fetches the peer chain presented by `target`, leaf first.
    fn fetch_chain(&self, target: &str, config: &ProbeConfig)
        -> Result<Vec<X509>, TLSProbeError>;
}

/// The real probe: one TCP connect and TLS handshake per call, bounded by
/// the configured timeout. No retries, no connection reuse.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsProbe;

impl ChainSource for TlsProbe {
    fn fetch_chain(
        &self,
        target: &str,
        config: &ProbeConfig,
    ) -> Result<Vec<X509>, TLSProbeError> {
        let remote = format!("{}:{}", target, config.port);
        debug!("probing {}", remote);

        let mut addresses = remote
            .to_socket_addrs()
            .map_err(|e| TLSProbeError::ConnectionFailed {
                target: target.to_string(),
                details: format!("couldn't resolve address: {}", e),
            })?;
        let socket_addr = addresses
            .next()
            .ok_or_else(|| TLSProbeError::ConnectionFailed {
                target: target.to_string(),
                details: "no address resolved".to_string(),
            })?;

        let tcp_stream = TcpStream::connect_timeout(&socket_addr, config.timeout()).map_err(
            |e| TLSProbeError::ConnectionFailed {
                target: target.to_string(),
                details: e.to_string(),
            },
        )?;
        tcp_stream
            .set_read_timeout(Some(config.timeout()))
            .map_err(|e| TLSProbeError::ConnectionFailed {
                target: target.to_string(),
                details: e.to_string(),
            })?;
        tcp_stream
            .set_write_timeout(Some(config.timeout()))
            .map_err(|e| TLSProbeError::ConnectionFailed {
                target: target.to_string(),
                details: e.to_string(),
            })?;

        let mut context = SslContext::builder(SslMethod::tls())?;
        // Observation only: accept whatever the peer presents.
        context.set_verify(SslVerifyMode::NONE);
        let context = context.build();

        let mut ssl = Ssl::new(&context)?;
        // SNI so virtual hosts present the right chain; never verified.
        ssl.set_hostname(target)?;

        let stream = ssl
            .connect(tcp_stream)
            .map_err(|e| {
                warn!("TLS handshake with {} failed: {}", remote, e);
                TLSProbeError::ConnectionFailed {
                    target: target.to_string(),
                    details: format!("TLS handshake failed: {}", e),
                }
            })?;

        let chain: Vec<X509> = stream
            .ssl()
            .peer_cert_chain()
            .map(|stack| stack.iter().map(|cert| cert.to_owned()).collect())
            .unwrap_or_default();

        debug!("{} presented {} certificate(s)", remote, chain.len());
        non_empty(chain, target)
    }
}

/// Refuses an empty chain explicitly. A handshake that presents zero
/// certificates is a reportable error, never "no expired certificates".
fn non_empty(chain: Vec<X509>, target: &str) -> Result<Vec<X509>, TLSProbeError> {
    if chain.is_empty() {
        return Err(TLSProbeError::EmptyChain {
            target: target.to_string(),
        });
    }
    Ok(chain)
}
