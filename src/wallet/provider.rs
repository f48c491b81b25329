// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Signing provider boundary.
//!
//! The browser-delivered ancestor of this client consumed a globally
//! injected wallet object; here that dependency is a trait so the session
//! can be driven by a local key in production and by a scripted fake in
//! tests.

use std::future::Future;

use alloy::signers::local::PrivateKeySigner;
use tokio::sync::watch;

use crate::models::WalletAddress;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no signing provider configured")]
    Missing,

    #[error("provider returned no accounts")]
    NoAccounts,

    #[error("provider error: {0}")]
    Other(String),
}

/// External signing provider: account access plus a passive account-change
/// notification channel.
pub trait SigningProvider {
    /// Request account access (the explicit connect prompt).
    fn request_accounts(
        &self,
    ) -> impl Future<Output = Result<Vec<WalletAddress>, ProviderError>> + Send;

    /// Silent probe: currently granted accounts, possibly empty, no prompt.
    fn accounts(&self) -> impl Future<Output = Result<Vec<WalletAddress>, ProviderError>> + Send;

    /// Account-change notifications. The latest value is the full (possibly
    /// empty) account list; the first successful change wins, there is no
    /// serialization of overlapping changes.
    fn subscribe_accounts(&self) -> watch::Receiver<Vec<WalletAddress>>;
}

/// Provider backed by one locally held private key.
///
/// A local key never changes accounts on its own, so the notification
/// channel stays at the single granted account.
#[derive(Debug)]
pub struct LocalKeyProvider {
    signer: PrivateKeySigner,
    address: WalletAddress,
    accounts_tx: watch::Sender<Vec<WalletAddress>>,
}

impl LocalKeyProvider {
    /// Build from an optional hex key (with or without `0x` prefix).
    /// `None` means no provider is configured at all.
    pub fn from_key_hex(key_hex: Option<&str>) -> Result<Self, ProviderError> {
        let key_hex = key_hex.ok_or(ProviderError::Missing)?;
        let key_bytes = alloy::hex::decode(key_hex.trim().trim_start_matches("0x"))
            .map_err(|e| ProviderError::Other(format!("invalid private key: {e}")))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| ProviderError::Other(format!("invalid private key: {e}")))?;

        let address = WalletAddress::new(format!("{:?}", signer.address()));
        let (accounts_tx, _) = watch::channel(vec![address.clone()]);

        Ok(Self {
            signer,
            address,
            accounts_tx,
        })
    }

    /// Signer handle for building the contract gateway.
    pub fn signer(&self) -> PrivateKeySigner {
        self.signer.clone()
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }
}

impl SigningProvider for LocalKeyProvider {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        Ok(vec![self.address.clone()])
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        // A configured local key counts as a previously granted session.
        Ok(vec![self.address.clone()])
    }

    fn subscribe_accounts(&self) -> watch::Receiver<Vec<WalletAddress>> {
        self.accounts_tx.subscribe()
    }
}
