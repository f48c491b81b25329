// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! # Runtime Configuration
//!
//! All configuration is loaded from the environment at startup. Credentials
//! (directory anon key, pinning key pair, signer key) are never compiled in.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DMAIL_RPC_URL` | EVM RPC endpoint | Sepolia public RPC |
//! | `DMAIL_CONTRACT_ADDRESS` | Mail contract deployment address | Required |
//! | `DMAIL_PRIVATE_KEY` | Hex signer key (no 0x prefix) | Optional; absent = no signing provider |
//! | `SUPABASE_URL` | Directory table base URL | Required |
//! | `SUPABASE_ANON_KEY` | Directory API key | Required |
//! | `PINATA_API_URL` | Pinning upload endpoint | `https://api.pinata.cloud/pinning/pinFileToIPFS` |
//! | `PINATA_API_KEY` | Pinning credential | Required for uploads |
//! | `PINATA_SECRET_KEY` | Pinning credential | Required for uploads |
//! | `IPFS_GATEWAY_URL` | Public gateway for rendering attachments | `https://ipfs.io/ipfs` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use crate::blockchain::SEPOLIA;

const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
const DEFAULT_IPFS_GATEWAY_URL: &str = "https://ipfs.io/ipfs";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// EVM RPC endpoint the contract gateway connects to.
    pub rpc_url: String,
    /// Fixed mail contract deployment address.
    pub contract_address: String,
    /// Hex-encoded signer private key. `None` means no signing provider is
    /// present and connecting will fail with `ProviderMissing`.
    pub private_key: Option<String>,
    /// Directory (Supabase) project base URL.
    pub supabase_url: String,
    /// Directory API key sent as `apikey` / bearer token.
    pub supabase_anon_key: String,
    /// Pinning service upload endpoint.
    pub pinata_api_url: String,
    pub pinata_api_key: Option<String>,
    pub pinata_secret_key: Option<String>,
    /// Public gateway base URL for rendering attachments by content id.
    pub ipfs_gateway_url: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Signer and pinning credentials are optional at load time; the
    /// components that need them fail with their own errors when absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            rpc_url: env_or_default("DMAIL_RPC_URL", SEPOLIA.rpc_url),
            contract_address: env_required("DMAIL_CONTRACT_ADDRESS")?,
            private_key: env_optional("DMAIL_PRIVATE_KEY"),
            supabase_url: env_required("SUPABASE_URL")?,
            supabase_anon_key: env_required("SUPABASE_ANON_KEY")?,
            pinata_api_url: env_or_default("PINATA_API_URL", DEFAULT_PINATA_API_URL),
            pinata_api_key: env_optional("PINATA_API_KEY"),
            pinata_secret_key: env_optional("PINATA_SECRET_KEY"),
            ipfs_gateway_url: env_or_default("IPFS_GATEWAY_URL", DEFAULT_IPFS_GATEWAY_URL),
        })
    }
}

fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    env_optional(name).ok_or(ConfigError::Missing(name))
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
