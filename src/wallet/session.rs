// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Wallet session: active account lifecycle.
//!
//! The session owns the contract gateway handle and rebuilds it whenever
//! the active account changes. Identity resolution runs on every
//! (re)activation; when no registered name resolves for the account, the
//! session asks the caller to run the registration flow.

use tokio::sync::watch;

use crate::blockchain::{GatewayError, MailGateway};
use crate::directory::NameDirectory;
use crate::models::WalletAddress;

use super::provider::{ProviderError, SigningProvider};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// What a session transition produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An account is active; `email` is its registered name when one
    /// resolved. `None` also covers a directory outage, which must not be
    /// mistaken for "unregistered".
    Connected {
        account: WalletAddress,
        email: Option<String>,
    },
    /// An account is active but has no registered identity; the caller
    /// should open the registration flow.
    RegistrationRequired { account: WalletAddress },
    /// The provider revoked all accounts; session state was cleared.
    Disconnected,
}

/// Active-account session over an injected signing provider.
pub struct WalletSession<P, D, G, F>
where
    P: SigningProvider,
    D: NameDirectory,
    G: MailGateway,
    F: Fn(&WalletAddress) -> Result<G, GatewayError>,
{
    provider: P,
    directory: D,
    make_gateway: F,
    active: Option<WalletAddress>,
    email: Option<String>,
    gateway: Option<G>,
}

impl<P, D, G, F> WalletSession<P, D, G, F>
where
    P: SigningProvider,
    D: NameDirectory,
    G: MailGateway,
    F: Fn(&WalletAddress) -> Result<G, GatewayError>,
{
    pub fn new(provider: P, directory: D, make_gateway: F) -> Self {
        Self {
            provider,
            directory,
            make_gateway,
            active: None,
            email: None,
            gateway: None,
        }
    }

    /// Explicit connect: prompt the provider for account access and
    /// activate the first granted account.
    pub async fn connect(&mut self) -> Result<SessionEvent, SessionError> {
        let accounts = self.provider.request_accounts().await?;
        let first = accounts.into_iter().next().ok_or(ProviderError::NoAccounts)?;
        self.activate(first).await
    }

    /// Silent connection probe on load: restores a previously granted
    /// session without prompting. Absence of a provider or of granted
    /// accounts is not an error here.
    pub async fn try_restore(&mut self) -> Result<Option<SessionEvent>, SessionError> {
        let accounts = match self.provider.accounts().await {
            Ok(accounts) => accounts,
            Err(ProviderError::Missing) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match accounts.into_iter().next() {
            Some(first) => Ok(Some(self.activate(first).await?)),
            None => Ok(None),
        }
    }

    /// React to a provider account-change notification.
    ///
    /// Non-empty list: the new first account becomes active and its
    /// identity is re-resolved. Empty list: account, gateway handle, and
    /// resolved identity are all cleared.
    pub async fn handle_accounts_changed(
        &mut self,
        accounts: Vec<WalletAddress>,
    ) -> Result<SessionEvent, SessionError> {
        match accounts.into_iter().next() {
            Some(first) => self.activate(first).await,
            None => {
                self.active = None;
                self.email = None;
                self.gateway = None;
                Ok(SessionEvent::Disconnected)
            }
        }
    }

    async fn activate(&mut self, account: WalletAddress) -> Result<SessionEvent, SessionError> {
        // Tear down the old handle before binding the new account.
        self.gateway = None;
        self.email = None;

        let gateway = (self.make_gateway)(&account)?;
        self.gateway = Some(gateway);
        self.active = Some(account.clone());

        match self.directory.resolve_name_for_wallet(&account).await {
            Ok(Some(email)) => {
                self.email = Some(email.clone());
                Ok(SessionEvent::Connected {
                    account,
                    email: Some(email),
                })
            }
            Ok(None) => Ok(SessionEvent::RegistrationRequired { account }),
            Err(e) => {
                // Backend outage, not "unregistered": stay connected without
                // a resolved name and do not prompt for registration.
                tracing::warn!(error = %e, wallet = %account, "identity resolution failed");
                Ok(SessionEvent::Connected {
                    account,
                    email: None,
                })
            }
        }
    }

    /// Account-change notification channel of the underlying provider.
    pub fn subscribe_accounts(&self) -> watch::Receiver<Vec<WalletAddress>> {
        self.provider.subscribe_accounts()
    }

    pub fn account(&self) -> Option<&WalletAddress> {
        self.active.as_ref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Record the registered name after a successful registration flow.
    pub fn set_email(&mut self, email: String) {
        self.email = Some(email);
    }

    pub fn gateway(&self) -> Option<&G> {
        self.gateway.as_ref()
    }
}
