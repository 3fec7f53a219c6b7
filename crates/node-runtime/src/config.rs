//! # Node Configuration
//!
//! Defaults overlaid with `MC_*` environment variables.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `MC_ROLE` | `authority` or `client` | `client` if `MC_AUTHORITY_ADDR` is set, else `authority` |
//! | `MC_HTTP_ADDR` | HTTP bind address | `0.0.0.0:8080` (authority), `0.0.0.0:8081` (client) |
//! | `MC_AUTHORITY_ADDR` | authority URL or `host:port` | `http://127.0.0.1:8080` |
//! | `MC_AUTHORITY_SEED` | 32-byte hex ed25519 seed | random per start |
//! | `MC_SEAL_THRESHOLD` | transactions per block | 10 |
//! | `MC_BLOCK_INTERVAL_SECS` | max seconds between blocks | 300 |
//! | `MC_CHECK_INTERVAL_SECS` | seal driver tick | 30 |
//! | `MC_SYNC_INTERVAL_SECS` | client sync tick | 10 |
//! | `MC_DATA_FILE` | chain file | `./data/chain.json` |
//! | `MC_REGISTRY_KEY` | 32-byte hex patient registry key | random per start, nothing persisted |
//! | `MC_PATIENTS_FILE` | sealed patient registry file | `./data/patients.json` |

use mc_03_authority::AuthorityConfig;
use mc_04_chain_sync::ClientSyncConfig;
use mc_06_api_gateway::GatewayConfig;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use zeroize::Zeroizing;

/// Client nodes listen here unless told otherwise.
pub const DEFAULT_CLIENT_HTTP_PORT: u16 = 8081;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("{var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    /// The combined settings are unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which half of the system this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeRole {
    #[default]
    Authority,
    Client,
}

impl FromStr for NodeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authority" => Ok(Self::Authority),
            "client" => Ok(Self::Client),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authority => f.write_str("authority"),
            Self::Client => f.write_str("client"),
        }
    }
}

/// 32 secret bytes, wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret32(Zeroizing<[u8; 32]>);

impl Secret32 {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn from_hex(text: &str) -> Result<Self, String> {
        let bytes = Zeroizing::new(hex::decode(text.trim()).map_err(|e| e.to_string())?);
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| format!("expected 32 bytes, got {}", bytes.len()))?;
        Ok(Self::new(array))
    }

    pub fn expose(&self) -> [u8; 32] {
        *self.0
    }
}

impl fmt::Debug for Secret32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret32([redacted])")
    }
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub role: NodeRole,
    pub gateway: GatewayConfig,
    pub authority: AuthorityConfig,
    pub sync: ClientSyncConfig,
    /// Where the authority persists its chain.
    pub data_file: PathBuf,
    /// Fixed authority signing seed. Without it every start signs with a
    /// new key and a persisted chain will no longer validate.
    pub authority_seed: Option<Secret32>,
    /// Key the patient registry seals profiles under. Profiles are only
    /// persisted to `patients_file` when it is set.
    pub registry_key: Option<Secret32>,
    pub patients_file: PathBuf,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            role: NodeRole::Authority,
            gateway: GatewayConfig::default(),
            authority: AuthorityConfig::default(),
            sync: ClientSyncConfig::default(),
            data_file: PathBuf::from("./data/chain.json"),
            authority_seed: None,
            registry_key: None,
            patients_file: PathBuf::from("./data/patients.json"),
        }
    }
}

fn parse<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
        })
}

fn authority_url(value: &str) -> String {
    let value = value.trim().trim_end_matches('/');
    if value.starts_with("http://") || value.starts_with("https://") {
        value.to_string()
    } else {
        format!("http://{}", value)
    }
}

impl NodeConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each `MC_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let authority_addr = lookup("MC_AUTHORITY_ADDR");
        config.role = match lookup("MC_ROLE") {
            Some(role) => parse("MC_ROLE", &role)?,
            None if authority_addr.is_some() => NodeRole::Client,
            None => NodeRole::Authority,
        };
        if config.role == NodeRole::Client {
            config
                .gateway
                .http_addr
                .set_port(DEFAULT_CLIENT_HTTP_PORT);
        }

        if let Some(addr) = lookup("MC_HTTP_ADDR") {
            config.gateway.http_addr = parse::<SocketAddr>("MC_HTTP_ADDR", &addr)?;
        }
        if let Some(addr) = authority_addr {
            config.sync.authority_url = authority_url(&addr);
        }
        if let Some(seed) = lookup("MC_AUTHORITY_SEED") {
            config.authority_seed = Some(Secret32::from_hex(&seed).map_err(|reason| {
                ConfigError::InvalidValue {
                    var: "MC_AUTHORITY_SEED",
                    reason,
                }
            })?);
        }
        if let Some(key) = lookup("MC_REGISTRY_KEY") {
            config.registry_key = Some(Secret32::from_hex(&key).map_err(|reason| {
                ConfigError::InvalidValue {
                    var: "MC_REGISTRY_KEY",
                    reason,
                }
            })?);
        }
        if let Some(v) = lookup("MC_SEAL_THRESHOLD") {
            config.authority.seal_threshold = parse("MC_SEAL_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("MC_BLOCK_INTERVAL_SECS") {
            config.authority.max_block_interval_secs = parse("MC_BLOCK_INTERVAL_SECS", &v)?;
        }
        if let Some(v) = lookup("MC_CHECK_INTERVAL_SECS") {
            config.authority.check_interval_secs = parse("MC_CHECK_INTERVAL_SECS", &v)?;
        }
        if let Some(v) = lookup("MC_SYNC_INTERVAL_SECS") {
            config.sync.sync_interval_secs = parse("MC_SYNC_INTERVAL_SECS", &v)?;
        }
        if let Some(path) = lookup("MC_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("MC_PATIENTS_FILE") {
            config.patients_file = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the node cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate().map_err(ConfigError::Invalid)?;
        match self.role {
            NodeRole::Authority => self
                .authority
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string())),
            NodeRole::Client => {
                if self.sync.sync_interval_secs == 0 {
                    return Err(ConfigError::Invalid(
                        "sync_interval_secs cannot be 0".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}
