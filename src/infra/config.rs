//! Centralized configuration (environment variables + defaults).

use crate::domain::artifact::resolver::DEFAULT_DEV_NETWORK_ID;
use anyhow::{anyhow, Context};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_CONTRACT_ARTIFACT: &str = "contracts/ProductRegistry.json";
pub const DEFAULT_CODES_FILE: &str = "data/codes.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
pub const DEFAULT_VERIFY_RATE_LIMIT: u32 = 30;
pub const DEFAULT_VERIFY_RATE_WINDOW_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct Settings {
    /// Ledger JSON-RPC endpoint.
    pub rpc_url: String,
    /// Explicit contract address; wins over artifact resolution when set.
    pub contract_address: Option<String>,
    pub contract_artifact: PathBuf,
    /// Network to resolve for; queried from the node when unset.
    pub network_id: Option<u64>,
    /// Development network used as fallback, only when this is `Some`.
    pub dev_network_fallback: Option<u64>,
    /// Selects the Postgres code store when set.
    pub database_url: Option<String>,
    pub codes_file: PathBuf,
    pub ledger_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    /// Guards the admin endpoints when set.
    pub admin_api_key: Option<String>,
    /// Max `POST /verify` calls per client IP per window; `0` disables the throttle.
    pub verify_rate_limit: u32,
    pub verify_rate_window: Duration,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)
        .map(|v| v.parse::<T>().with_context(|| format!("{} has invalid value `{}`", name, v)))
        .transpose()
}

fn flag(name: &str) -> anyhow::Result<bool> {
    match var(name).map(|v| v.to_lowercase()).as_deref() {
        None | Some("false") | Some("0") | Some("no") => Ok(false),
        Some("true") | Some("1") | Some("yes") => Ok(true),
        Some(other) => Err(anyhow!("{} must be true or false, got `{}`", name, other)),
    }
}

impl Settings {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let dev_network_id = parse_var::<u64>("DEV_NETWORK_ID")?.unwrap_or(DEFAULT_DEV_NETWORK_ID);
        let dev_network_fallback = if flag("ALLOW_DEV_NETWORK_FALLBACK")? {
            Some(dev_network_id)
        } else {
            None
        };

        let ledger_timeout_ms = parse_var::<u64>("LEDGER_TIMEOUT_MS")?.unwrap_or(5_000);
        if ledger_timeout_ms == 0 {
            return Err(anyhow!("LEDGER_TIMEOUT_MS must be positive"));
        }

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("BIND_ADDR has invalid value `{}`", bind_addr))?;

        let verify_rate_window_secs =
            parse_var::<u64>("VERIFY_RATE_WINDOW_SECS")?.unwrap_or(DEFAULT_VERIFY_RATE_WINDOW_SECS);
        if verify_rate_window_secs == 0 {
            return Err(anyhow!("VERIFY_RATE_WINDOW_SECS must be positive"));
        }

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            rpc_url: var("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            contract_address: var("CONTRACT_ADDRESS"),
            contract_artifact: var("CONTRACT_ARTIFACT")
                .unwrap_or_else(|| DEFAULT_CONTRACT_ARTIFACT.to_string())
                .into(),
            network_id: parse_var::<u64>("NETWORK_ID")?,
            dev_network_fallback,
            database_url: var("DATABASE_URL"),
            codes_file: var("CODES_FILE")
                .unwrap_or_else(|| DEFAULT_CODES_FILE.to_string())
                .into(),
            ledger_timeout: Duration::from_millis(ledger_timeout_ms),
            bind_addr,
            cors_origins,
            admin_api_key: var("ADMIN_API_KEY"),
            verify_rate_limit: parse_var::<u32>("VERIFY_RATE_LIMIT")?
                .unwrap_or(DEFAULT_VERIFY_RATE_LIMIT),
            verify_rate_window: Duration::from_secs(verify_rate_window_secs),
        })
    }
}
