// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! In-memory fakes for the four remote seams, shared across test modules.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::attachments::{AttachmentStore, UploadError};
use crate::blockchain::{GatewayError, InboxEntry, MailGateway, SendAck};
use crate::directory::{DirectoryError, NameDirectory};
use crate::models::{compose_mail_address, ContentId, RegisteredIdentity, WalletAddress};
use crate::wallet::{ProviderError, SigningProvider};

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// In-memory `user_emails` table with the backend's uniqueness constraint.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    rows: Arc<Mutex<Vec<(WalletAddress, String)>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage: every operation fails.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_up(&self) -> Result<(), DirectoryError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DirectoryError::Backend("directory unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl NameDirectory for InMemoryDirectory {
    async fn resolve_name_for_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<String>, DirectoryError> {
        self.check_up()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|(w, _)| w == wallet)
            .map(|(_, email)| email.clone()))
    }

    async fn resolve_wallet_for_name(
        &self,
        name: &str,
    ) -> Result<Option<WalletAddress>, DirectoryError> {
        self.check_up()?;
        let key = name.trim().to_ascii_lowercase();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|(_, email)| *email == key)
            .map(|(wallet, _)| wallet.clone()))
    }

    async fn register(
        &self,
        wallet: &WalletAddress,
        local_part: &str,
    ) -> Result<RegisteredIdentity, DirectoryError> {
        self.check_up()?;
        let email = compose_mail_address(local_part);
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|(_, existing)| *existing == email) {
            return Err(DirectoryError::NameTaken);
        }
        rows.push((wallet.clone(), email.clone()));
        Ok(RegisteredIdentity {
            id: format!("row-{}", rows.len()),
            wallet_address: wallet.clone(),
            email,
            created_at: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Signing provider
// ---------------------------------------------------------------------------

/// Scripted provider: a mutable account list plus a change channel.
/// Clones share the account list, so a test can keep a handle for driving
/// account changes after the session takes ownership.
#[derive(Clone)]
pub struct FakeProvider {
    missing: bool,
    accounts_tx: watch::Sender<Vec<WalletAddress>>,
}

impl FakeProvider {
    pub fn with_accounts(accounts: Vec<WalletAddress>) -> Self {
        let (accounts_tx, _) = watch::channel(accounts);
        Self {
            missing: false,
            accounts_tx,
        }
    }

    pub fn missing() -> Self {
        let (accounts_tx, _) = watch::channel(vec![]);
        Self {
            missing: true,
            accounts_tx,
        }
    }

    /// Simulate the provider switching (or revoking) accounts.
    pub fn set_accounts(&self, accounts: Vec<WalletAddress>) {
        self.accounts_tx.send_replace(accounts);
    }
}

impl SigningProvider for FakeProvider {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        if self.missing {
            return Err(ProviderError::Missing);
        }
        Ok(self.accounts_tx.borrow().clone())
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        if self.missing {
            return Err(ProviderError::Missing);
        }
        Ok(self.accounts_tx.borrow().clone())
    }

    fn subscribe_accounts(&self) -> watch::Receiver<Vec<WalletAddress>> {
        self.accounts_tx.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Mail gateway
// ---------------------------------------------------------------------------

/// Shared in-memory ledger: recipient wallet -> messages in arrival order.
///
/// Call counters and failure switches live here so they survive gateway
/// rebuilds on account change.
#[derive(Clone, Default)]
pub struct Ledger {
    inboxes: Arc<Mutex<Vec<(WalletAddress, InboxEntry)>>>,
    clock: Arc<AtomicI64>,
    send_attempts: Arc<AtomicUsize>,
    reject_sends: Arc<AtomicBool>,
    fail_inbox: Arc<AtomicBool>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(AtomicI64::new(1_700_000_000)),
            ..Self::default()
        }
    }

    /// Number of contract submissions attempted against this ledger.
    pub fn send_attempts(&self) -> usize {
        self.send_attempts.load(Ordering::SeqCst)
    }

    pub fn set_reject_sends(&self, reject: bool) {
        self.reject_sends.store(reject, Ordering::SeqCst);
    }

    pub fn set_fail_inbox(&self, fail: bool) {
        self.fail_inbox.store(fail, Ordering::SeqCst);
    }
}

/// Gateway bound to one account over the shared [`Ledger`].
#[derive(Clone)]
pub struct FakeGateway {
    account: WalletAddress,
    ledger: Ledger,
}

impl FakeGateway {
    pub fn new(account: WalletAddress, ledger: Ledger) -> Self {
        Self { account, ledger }
    }
}

impl MailGateway for FakeGateway {
    fn account(&self) -> &WalletAddress {
        &self.account
    }

    async fn send_mail(
        &self,
        recipient: &WalletAddress,
        subject: &str,
        body: &str,
        attachment: Option<&ContentId>,
    ) -> Result<SendAck, GatewayError> {
        self.ledger.send_attempts.fetch_add(1, Ordering::SeqCst);
        if self.ledger.reject_sends.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected("user rejected".to_string()));
        }

        let timestamp = self.ledger.clock.fetch_add(1, Ordering::SeqCst);
        let entry = InboxEntry {
            sender: self.account.clone(),
            subject: subject.to_string(),
            body: body.to_string(),
            timestamp,
            attachment: attachment.cloned(),
        };
        self.ledger
            .inboxes
            .lock()
            .unwrap()
            .push((recipient.clone(), entry));

        let tx_hash = format!("0xfaketx{timestamp:x}");
        Ok(SendAck {
            explorer_url: format!("https://sepolia.etherscan.io/tx/{tx_hash}"),
            tx_hash,
        })
    }

    async fn fetch_inbox(&self) -> Result<Vec<InboxEntry>, GatewayError> {
        if self.ledger.fail_inbox.load(Ordering::SeqCst) {
            return Err(GatewayError::Inbox("rpc unavailable".to_string()));
        }
        let inboxes = self.ledger.inboxes.lock().unwrap();
        Ok(inboxes
            .iter()
            .filter(|(to, _)| to == &self.account)
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Attachment store
// ---------------------------------------------------------------------------

/// Uploader that assigns sequential fake content ids.
#[derive(Clone, Default)]
pub struct FakeUploader {
    uploads: Arc<AtomicUsize>,
}

impl FakeUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of network uploads performed.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

impl AttachmentStore for FakeUploader {
    async fn upload(&self, path: Option<&Path>) -> Result<ContentId, UploadError> {
        let _path = path.ok_or(UploadError::NoFileSelected)?;
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ContentId::new(format!("QmFake{n}")).unwrap())
    }

    fn gateway_url(&self, content_id: &ContentId) -> String {
        format!("https://ipfs.io/ipfs/{content_id}")
    }
}
