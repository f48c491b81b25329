// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! # Core Data Models
//!
//! Shared value types used across the client: wallet addresses, registered
//! identities from the directory table, inbox message snapshots, and
//! attachment content identifiers.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps Ethereum-style addresses (0x-prefixed,
//! 40 hex characters) and normalizes them to lowercase on construction.
//! Every identity lookup and every contract-reported sender is keyed on the
//! lowercase form, so normalizing at the type boundary keeps the rest of the
//! crate comparison-safe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain suffix appended to every registered local part.
pub const MAIL_DOMAIN: &str = "dmail.org";

/// Full `@`-prefixed suffix used for the recipient-field pattern check.
pub const MAIL_SUFFIX: &str = "@dmail.org";

/// Ethereum-compatible wallet address, normalized to lowercase.
///
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Wrap an address string, lowercasing it.
    pub fn new(value: impl Into<String>) -> Self {
        WalletAddress(value.into().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display form for headers: `0x1234…abcd`.
    pub fn short(&self) -> String {
        if self.0.len() <= 10 {
            return self.0.clone();
        }
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress::new(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress::new(value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

/// Compose the full mail address for a local part: `alice` -> `alice@dmail.org`.
///
/// The local part is lowercased; the directory stores and matches names in
/// lowercase form.
pub fn compose_mail_address(local_part: &str) -> String {
    format!("{}@{}", local_part.trim().to_ascii_lowercase(), MAIL_DOMAIN)
}

/// Check that a recipient field carries the fixed domain suffix.
///
/// This is the only client-side validation of names; uniqueness and
/// existence are owned by the directory table.
pub fn has_mail_suffix(name: &str) -> bool {
    name.trim().to_ascii_lowercase().ends_with(MAIL_SUFFIX)
}

/// A row of the external `user_emails` directory table.
///
/// Created once via explicit user action; never updated or deleted by this
/// client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredIdentity {
    /// Row id, generated by the directory backend.
    pub id: String,
    /// Owning wallet address (lowercase).
    pub wallet_address: WalletAddress,
    /// Unique registered name, e.g. `alice@dmail.org`.
    pub email: String,
    /// Row creation time, assigned by the backend.
    pub created_at: Option<DateTime<Utc>>,
}

/// Opaque content identifier assigned by the pinning service.
///
/// On the contract wire an empty string means "no attachment"; locally that
/// is represented as `Option<ContentId>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a non-empty identifier. Returns `None` for empty/blank input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(ContentId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A received message, enriched for display.
///
/// Immutable snapshot: existence and storage are owned by the mail contract,
/// this client only reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Sender wallet as reported by the contract.
    pub sender: WalletAddress,
    /// Sender's registered name when one resolved, otherwise the raw wallet.
    pub sender_display: String,
    pub subject: String,
    pub body: String,
    /// Unix seconds, normalized from the contract's uint256.
    pub timestamp: i64,
    pub attachment: Option<ContentId>,
}

impl MailMessage {
    /// Message timestamp as a UTC datetime, for display formatting.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}
