// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! dmail-client - Decentralized Email Client
//!
//! Users connect a wallet, register a human-readable `@dmail.org` address
//! mapped to it, and exchange messages persisted on an EVM mail contract,
//! with optional attachments pinned to IPFS. There is no server-side core:
//! this client drives the contract and one hosted directory table directly.
//!
//! ## Modules
//!
//! - `wallet` - signing provider boundary and active-account session
//! - `directory` - wallet <-> registered-name lookups (hosted table)
//! - `blockchain` - mail contract gateway (alloy)
//! - `attachments` - pinning-service uploads and gateway URLs
//! - `client` - orchestration across the four seams
//! - `ui` - presentation-layer view state

pub mod attachments;
pub mod blockchain;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod ui;
pub mod wallet;

#[cfg(test)]
mod testutil;
