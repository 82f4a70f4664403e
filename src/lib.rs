//! Asynchronous TLS peer-certificate chain inspector.
//!
//! `tlsprobe` answers two questions about a remote TLS endpoint without
//! ever blocking the caller's executor:
//!
//! - has any certificate in the peer's presented chain expired?
//! - what does the presented chain look like, as plain
//!   `{subject, expires, isCA}` records?
//!
//! Each call synchronously creates a one-shot settlement cell, hands the
//! blocking connect/handshake to a worker thread, and returns a future
//! that resolves when the worker settles the cell. The cell is settled
//! exactly once; concurrent calls are fully independent.
//!
//! # Observational, not authenticating
//!
//! The handshake deliberately skips trust-anchor validation and hostname
//! verification so it can read expired and untrusted chains. A successful
//! probe says nothing about whether the peer should be trusted; never use
//! this crate to establish a secure connection.
//!
//! # Example
//!
//! ```no_run
//! use tlsprobe::Checker;
//!
//! # async fn run() -> Result<(), tlsprobe::TLSProbeError> {
//! let checker = Checker::new();
//! if checker.is_expired("example.com").await? {
//!     for cert in checker.chain("example.com").await? {
//!         println!("{} expires at {}", cert.subject, cert.expires);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod probe;
pub mod record;

#[cfg(test)]
pub(crate) mod test_support;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::oneshot;

pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, ProbeConfig};
pub use error::TLSProbeError;
pub use probe::{ChainSource, TlsProbe};
pub use record::CertificateRecord;

/// A probe result that has not settled yet.
///
/// Settlement happens exactly once, from the worker thread that owns the
/// sending half of the underlying one-shot channel. Awaiting the future is
/// the caller's only suspension point; the future is not cancellable in
/// the sense that dropping it does not stop the probe, which runs to
/// completion on its worker.
pub struct PendingProbe<T> {
    rx: oneshot::Receiver<Result<T, TLSProbeError>>,
}

impl<T> PendingProbe<T> {
    fn new(rx: oneshot::Receiver<Result<T, TLSProbeError>>) -> Self {
        PendingProbe { rx }
    }
}

impl<T> Future for PendingProbe<T> {
    type Output = Result<T, TLSProbeError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().rx).poll(cx).map(|settled| {
            settled.unwrap_or_else(|_| {
                Err(TLSProbeError::Other {
                    message: "probe worker terminated without settling".to_string(),
                })
            })
        })
    }
}

/// Entry point for both probe operations.
///
/// Holds the probe configuration, the injected clock used by expiry
/// checks, and the chain source. All three are shared read-only across
/// concurrent calls; no state is mutated between calls.
pub struct Checker {
    config: ProbeConfig,
    clock: Arc<dyn Clock>,
    source: Arc<dyn ChainSource>,
}

impl Checker {
    /// Creates a checker with the default configuration, the system clock,
    /// and the real TLS probe.
    pub fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    /// Creates a checker with a custom probe configuration.
    pub fn with_config(config: ProbeConfig) -> Self {
        Checker {
            config,
            clock: Arc::new(SystemClock),
            source: Arc::new(TlsProbe),
        }
    }

    /// Creates a checker from explicit parts. This is the seam for tests,
    /// which inject fixed clocks and canned chain sources.
    pub fn with_parts(
        config: ProbeConfig,
        clock: Arc<dyn Clock>,
        source: Arc<dyn ChainSource>,
    ) -> Self {
        Checker {
            config,
            clock,
            source,
        }
    }

    /// Checks whether any certificate in the peer chain of `target` is
    /// strictly past its expiry.
    ///
    /// A certificate expiring at exactly the current instant is not
    /// expired. Rejects with [`TLSProbeError::InvalidTarget`] for an empty
    /// target (without any network I/O), [`TLSProbeError::ConnectionFailed`]
    /// when the connect or handshake fails, and
    /// [`TLSProbeError::EmptyChain`] when the peer presents no
    /// certificates.
    pub fn is_expired(&self, target: &str) -> PendingProbe<bool> {
        let (tx, rx) = oneshot::channel();
        if target.is_empty() {
            // No background work was started, so settling on the caller's
            // stack is safe.
            let _ = tx.send(Err(empty_target()));
            return PendingProbe::new(rx);
        }

        let target = target.to_string();
        let config = self.config.clone();
        let clock = Arc::clone(&self.clock);
        let source = Arc::clone(&self.source);
        thread::spawn(move || {
            let outcome = project_chain(source.as_ref(), &target, &config)
                .map(|records| chain_has_expired(&records, unix_millis(clock.now())));
            let _ = tx.send(outcome);
        });

        PendingProbe::new(rx)
    }

    /// Fetches the peer chain of `target` as plain records, leaf first,
    /// in the order the peer presented it.
    ///
    /// Rejects with the same errors as [`Checker::is_expired`]; the empty
    /// target check applies to both operations.
    pub fn chain(&self, target: &str) -> PendingProbe<Vec<CertificateRecord>> {
        let (tx, rx) = oneshot::channel();
        if target.is_empty() {
            let _ = tx.send(Err(empty_target()));
            return PendingProbe::new(rx);
        }

        let target = target.to_string();
        let config = self.config.clone();
        let source = Arc::clone(&self.source);
        thread::spawn(move || {
            let outcome = project_chain(source.as_ref(), &target, &config);
            let _ = tx.send(outcome);
        });

        PendingProbe::new(rx)
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_target() -> TLSProbeError {
    TLSProbeError::InvalidTarget {
        reason: "target must not be empty".to_string(),
    }
}

/// Fetches and projects the chain for `target`, refusing an empty chain
/// before any per-certificate work. The guard here keeps an empty chain
/// from ever folding into "no expired certificates".
fn project_chain(
    source: &dyn ChainSource,
    target: &str,
    config: &ProbeConfig,
) -> Result<Vec<CertificateRecord>, TLSProbeError> {
    let chain = source.fetch_chain(target, config)?;
    if chain.is_empty() {
        return Err(TLSProbeError::EmptyChain {
            target: target.to_string(),
        });
    }
    chain
        .iter()
        .map(|cert| CertificateRecord::from_x509(cert))
        .collect()
}

/// True iff any record's expiry is strictly before `now_millis`.
fn chain_has_expired(records: &[CertificateRecord], now_millis: i64) -> bool {
    records.iter().any(|record| now_millis > record.expires)
}

fn unix_millis(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
