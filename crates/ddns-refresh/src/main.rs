// # ddns-refresh - single-shot dynamic DNS refresh
//
// Points the A and AAAA records of a hostname at the machine's current
// public addresses, then exits. Meant to be run from cron or a systemd
// timer; the scheduler is the retry loop.
//
// This binary is a THIN integration layer:
// - DO NOT add DNS or reconciliation logic here, it lives in ddns-core
// - Configuration is via CLI flags and environment variables ONLY
//
// The binary is responsible for:
// 1. Parsing flags and environment variables
// 2. Initializing logging
// 3. Applying the platform sandbox
// 4. Wiring the Cloudflare provider and HTTP IP sources into the engine
// 5. Mapping the outcome to an exit code
//
// ## Environment
//
// - `CLOUDFLARE_API_TOKEN`: API token (same as `--token`)
// - `DDNS_MODE`: `dry-run` behaves like `--dry-run`
// - `DDNS_IPV4_URL` / `DDNS_IPV6_URL`: address lookup endpoints
// - `DDNS_HTTP_TIMEOUT_SECS`: address lookup timeout
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_TOKEN=your_token
// ddns-refresh --hostname nas.example.com --proxy=false
// ```

mod sandbox;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use ddns_core::config::{
    DEFAULT_IPV4_URL, DEFAULT_IPV6_URL, IpSourceConfig, ProviderConfig, RefreshConfig,
    TargetConfig,
};
use ddns_core::{IpVersion, RefreshEngine, RefreshReport, SystemHostname};
use ddns_ip_http::HttpIpSource;
use ddns_provider_cloudflare::CloudflareProvider;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the scheduler
///
/// - 0: Refresh completed (including "nothing to change")
/// - 1: Configuration error (flags, token, sandbox)
/// - 2: Runtime error (resolution, zone, listing, reconciliation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<RefreshExitCode> for ExitCode {
    fn from(code: RefreshExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Update Cloudflare A/AAAA records with this machine's public addresses
#[derive(Debug, Parser)]
#[command(name = "ddns-refresh", version, about)]
struct Cli {
    /// Hostname to update (default: this machine's hostname)
    #[arg(long)]
    hostname: Option<String>,

    /// Domain (zone) of the hostname (default: registrable domain of the hostname)
    #[arg(long)]
    domain: Option<String>,

    /// Proxy created/updated records through Cloudflare
    #[arg(
        long,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    proxy: bool,

    /// Cloudflare API token
    #[arg(long, env = "CLOUDFLARE_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Read records and log intended changes without applying them
    #[arg(long)]
    dry_run: bool,

    /// URL returning the public IPv4 address as plain text
    #[arg(long, env = "DDNS_IPV4_URL", default_value = DEFAULT_IPV4_URL)]
    ipv4_url: String,

    /// URL returning the public IPv6 address as plain text
    #[arg(long, env = "DDNS_IPV6_URL", default_value = DEFAULT_IPV6_URL)]
    ipv6_url: String,

    /// Address lookup timeout in seconds
    #[arg(
        long,
        env = "DDNS_HTTP_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..=300)
    )]
    timeout: u64,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Build the refresh configuration
    ///
    /// `mode` is the value of `DDNS_MODE`, if set.
    fn into_config(self, mode: Option<&str>) -> RefreshConfig {
        let dry_run = self.dry_run || mode.is_some_and(|m| m.trim() == "dry-run");

        RefreshConfig {
            target: TargetConfig {
                hostname: self.hostname,
                domain: self.domain,
            },
            proxied: self.proxy,
            provider: ProviderConfig::Cloudflare {
                api_token: self.token.unwrap_or_default(),
                dry_run,
            },
            ip_source: IpSourceConfig {
                ipv4_url: self.ipv4_url,
                ipv6_url: self.ipv6_url,
                timeout_secs: self.timeout,
            },
        }
    }
}

/// Rewrite single-dash long flags (`-hostname`, `-proxy=true`) to their
/// `--` form so `-h...` is not read as a cluster of short flags.
///
/// Only names declared on [`Cli`] are rewritten; anything else is passed
/// through for clap to reject.
fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let command = Cli::command();
    let is_long = |name: &str| {
        name == "help"
            || name == "version"
            || command
                .get_arguments()
                .any(|arg| arg.get_long() == Some(name))
    };

    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || arg.starts_with("--") {
                return arg;
            }
            let Some(flag) = arg.strip_prefix('-') else {
                return arg;
            };
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if name.len() > 1 && is_long(name) {
                format!("-{}", arg)
            } else {
                arg
            }
        })
        .collect()
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Exit code for a failed run
fn exit_code_for(err: &anyhow::Error) -> RefreshExitCode {
    match err.downcast_ref::<ddns_core::Error>() {
        Some(e) if e.is_configuration() => RefreshExitCode::ConfigError,
        _ => RefreshExitCode::RuntimeError,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args())) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                RefreshExitCode::ConfigError.into()
            } else {
                RefreshExitCode::Success.into()
            };
        }
    };

    let Some(log_level) = parse_log_level(&cli.log_level) else {
        eprintln!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            cli.log_level
        );
        return RefreshExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RefreshExitCode::ConfigError.into();
    }

    let mode = std::env::var("DDNS_MODE").ok();

    match run(cli, mode.as_deref()) {
        Ok(report) => {
            if report.changed() {
                info!("DNS records for {} updated", report.target.hostname);
            } else {
                info!("DNS records for {} already up to date", report.target.hostname);
            }
            RefreshExitCode::Success.into()
        }
        Err(e) => {
            error!("{:#}", e);
            exit_code_for(&e).into()
        }
    }
}

/// Run one refresh
fn run(cli: Cli, mode: Option<&str>) -> Result<RefreshReport> {
    let config = cli.into_config(mode);
    config.validate()?;

    let sandbox = sandbox::platform_sandbox();
    sandbox
        .restrict()
        .with_context(|| format!("Failed to apply {} sandbox", sandbox.name()))?;
    info!("Sandbox: {}", sandbox.name());

    let provider = CloudflareProvider::from_config(&config.provider)?;
    let ipv4 = HttpIpSource::from_config(&config.ip_source, IpVersion::V4)?;
    let ipv6 = HttpIpSource::from_config(&config.ip_source, IpVersion::V6)?;

    let engine = RefreshEngine::new(Box::new(provider), Box::new(ipv4), Box::new(ipv6), config)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let report = rt.block_on(engine.run(&SystemHostname))?;
    Ok(report)
}
