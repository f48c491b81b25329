// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Network constants and gateway result types.

use crate::models::{ContentId, WalletAddress};

/// EVM network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

/// Sepolia testnet, the default deployment target of the mail contract.
pub const SEPOLIA: NetworkConfig = NetworkConfig {
    name: "Sepolia Testnet",
    chain_id: 11155111,
    rpc_url: "https://rpc.sepolia.org",
    explorer_url: "https://sepolia.etherscan.io",
};

/// Acknowledgment for a submitted message.
///
/// Submission only: the transaction has been accepted by the signing
/// provider and broadcast, not finalized. Callers that need durability must
/// track the hash themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendAck {
    /// Transaction hash
    pub tx_hash: String,
    /// Explorer URL for the transaction
    pub explorer_url: String,
}

/// One raw inbox entry as reported by the contract, before sender enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEntry {
    pub sender: WalletAddress,
    pub subject: String,
    pub body: String,
    /// Unix seconds, already normalized from uint256.
    pub timestamp: i64,
    pub attachment: Option<ContentId>,
}
