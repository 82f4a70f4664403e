use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::exit;
use tlsprobe::{CertificateRecord, Checker, ProbeConfig};

/// Inspect the TLS certificate chains presented by remote hosts.
///
/// The probe is observational: it never validates the chain against a
/// trust store and never verifies hostnames, so it can report on expired
/// and untrusted endpoints.
#[derive(Parser)]
#[command(name = "tlsprobe", version, author)]
struct Cli {
    /// Hosts to probe (port 443 unless configured otherwise)
    #[arg(required = true)]
    hosts: Vec<String>,

    /// Print JSON output
    #[arg(long)]
    json: bool,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Probe timeout in seconds (overrides the configuration file)
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Serialize)]
struct HostReport {
    host: String,
    expired: bool,
    chain: Vec<CertificateRecord>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match ProbeConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Fail to load config {}: {}", path.display(), err);
                exit(1);
            }
        },
        None => ProbeConfig::default(),
    };
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    let checker = Checker::with_config(config);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let mut reports: Vec<HostReport> = Vec::with_capacity(cli.hosts.len());
    let mut failures = 0;
    runtime.block_on(async {
        for host in &cli.hosts {
            let pending_expiry = checker.is_expired(host);
            let pending_chain = checker.chain(host);
            match tokio::try_join!(pending_expiry, pending_chain) {
                Ok((expired, chain)) => reports.push(HostReport {
                    host: host.clone(),
                    expired,
                    chain,
                }),
                Err(err) => {
                    eprintln!("Fail to check host: {}  {}", host, err);
                    failures += 1;
                }
            }
        }
    });

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports).unwrap());
    } else {
        for report in &reports {
            println!("--------------------------------------");
            println!("Host: {}", report.host);
            println!("Expired: {}", report.expired);
            println!("Peer chain (leaf first):");
            for cert in &report.chain {
                println!("\tSubject: {}", cert.subject);
                println!("\tExpires (epoch ms): {}", cert.expires);
                println!("\tCA: {}", cert.is_ca);
            }
        }
    }

    exit(if failures > 0 { 1 } else { 0 });
}
