// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Client orchestration across the four remote seams.
//!
//! Control flow: the session publishes an active account, the directory
//! resolves names both ways, the gateway submits and fetches, and the
//! uploader supplies content identifiers consumed by the send call.
//! Every failure is scoped to the user action that triggered it.

use std::path::Path;

use futures::future::join_all;

use crate::attachments::AttachmentStore;
use crate::blockchain::{GatewayError, MailGateway, SendAck};
use crate::directory::NameDirectory;
use crate::error::DmailError;
use crate::models::{ContentId, MailMessage, WalletAddress};
use crate::wallet::{SessionEvent, SigningProvider, WalletSession};

/// The composed client.
pub struct DmailClient<P, D, G, F, U>
where
    P: SigningProvider,
    D: NameDirectory + Clone,
    G: MailGateway,
    F: Fn(&WalletAddress) -> Result<G, GatewayError>,
    U: AttachmentStore,
{
    session: WalletSession<P, D, G, F>,
    directory: D,
    uploader: U,
}

impl<P, D, G, F, U> DmailClient<P, D, G, F, U>
where
    P: SigningProvider,
    D: NameDirectory + Clone,
    G: MailGateway,
    F: Fn(&WalletAddress) -> Result<G, GatewayError>,
    U: AttachmentStore,
{
    pub fn new(provider: P, directory: D, make_gateway: F, uploader: U) -> Self {
        Self {
            session: WalletSession::new(provider, directory.clone(), make_gateway),
            directory,
            uploader,
        }
    }

    /// Explicit wallet connect.
    pub async fn connect(&mut self) -> Result<SessionEvent, DmailError> {
        Ok(self.session.connect().await?)
    }

    /// Silent session restore on startup.
    pub async fn try_restore(&mut self) -> Result<Option<SessionEvent>, DmailError> {
        Ok(self.session.try_restore().await?)
    }

    /// Apply a provider account-change notification.
    pub async fn handle_accounts_changed(
        &mut self,
        accounts: Vec<WalletAddress>,
    ) -> Result<SessionEvent, DmailError> {
        Ok(self.session.handle_accounts_changed(accounts).await?)
    }

    pub fn session(&self) -> &WalletSession<P, D, G, F> {
        &self.session
    }

    /// Register the active account under `<local_part>@dmail.org`.
    pub async fn register(&mut self, local_part: &str) -> Result<String, DmailError> {
        let account = self
            .session
            .account()
            .cloned()
            .ok_or(DmailError::NoAccounts)?;
        let identity = self
            .directory
            .register(&account, local_part)
            .await
            .map_err(DmailError::from_registration)?;
        self.session.set_email(identity.email.clone());
        Ok(identity.email)
    }

    /// Resolve the recipient name and submit the message.
    ///
    /// Fails with `RecipientUnresolved` before any contract call when the
    /// name has no wallet; directory outages surface as errors rather than
    /// being mistaken for an unknown recipient.
    pub async fn send(
        &self,
        to_name: &str,
        subject: &str,
        body: &str,
        attachment: Option<&ContentId>,
    ) -> Result<SendAck, DmailError> {
        let gateway = self.session.gateway().ok_or(DmailError::NoAccounts)?;

        let recipient = self
            .directory
            .resolve_wallet_for_name(to_name)
            .await
            .map_err(DmailError::from_lookup)?
            .ok_or(DmailError::RecipientUnresolved)?;

        let ack = gateway
            .send_mail(&recipient, subject, body, attachment)
            .await?;
        Ok(ack)
    }

    /// Fetch the inbox snapshot and enrich sender wallets into names.
    ///
    /// Per-entry lookups run concurrently (unordered) and results are
    /// reassembled in contract-reported order. An individual enrichment
    /// failure falls back to the raw wallet; it never fails the fetch.
    pub async fn fetch_inbox(&self) -> Result<Vec<MailMessage>, DmailError> {
        let gateway = self
            .session
            .gateway()
            .ok_or_else(|| DmailError::InboxUnavailable("no active account".to_string()))?;

        let entries = gateway.fetch_inbox().await?;

        let lookups = entries
            .iter()
            .map(|entry| self.directory.resolve_name_for_wallet(&entry.sender));
        let resolved = join_all(lookups).await;

        Ok(entries
            .into_iter()
            .zip(resolved)
            .map(|(entry, name)| {
                let sender_display = match name {
                    Ok(Some(name)) => name,
                    Ok(None) => entry.sender.to_string(),
                    Err(e) => {
                        tracing::debug!(error = %e, wallet = %entry.sender, "sender enrichment failed");
                        entry.sender.to_string()
                    }
                };
                MailMessage {
                    sender: entry.sender,
                    sender_display,
                    subject: entry.subject,
                    body: entry.body,
                    timestamp: entry.timestamp,
                    attachment: entry.attachment,
                }
            })
            .collect())
    }

    /// Upload a selected file to the pinning service.
    pub async fn upload_attachment(&self, path: Option<&Path>) -> Result<ContentId, DmailError> {
        Ok(self.uploader.upload(path).await?)
    }

    /// Public gateway URL for rendering an attachment.
    pub fn attachment_url(&self, content_id: &ContentId) -> String {
        self.uploader.gateway_url(content_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DirectoryError;
    use crate::testutil::{FakeGateway, FakeProvider, FakeUploader, InMemoryDirectory, Ledger};

    type TestClient = DmailClient<
        FakeProvider,
        InMemoryDirectory,
        FakeGateway,
        Box<dyn Fn(&WalletAddress) -> Result<FakeGateway, GatewayError>>,
        FakeUploader,
    >;

    fn client(wallet: &str, directory: InMemoryDirectory, ledger: Ledger) -> TestClient {
        let provider = FakeProvider::with_accounts(vec![WalletAddress::new(wallet)]);
        let make_gateway: Box<dyn Fn(&WalletAddress) -> Result<FakeGateway, GatewayError>> = {
            let ledger = ledger.clone();
            Box::new(move |account| Ok(FakeGateway::new(account.clone(), ledger.clone())))
        };
        DmailClient::new(provider, directory, make_gateway, FakeUploader::new())
    }

    const ABC: &str = "0xabc0000000000000000000000000000000000000";
    const DEF: &str = "0xdef0000000000000000000000000000000000000";

    #[tokio::test]
    async fn unknown_wallet_resolves_to_absent_not_error() {
        let directory = InMemoryDirectory::new();
        let name = directory
            .resolve_name_for_wallet(&WalletAddress::new(ABC))
            .await
            .unwrap();
        assert_eq!(name, None);
    }

    #[tokio::test]
    async fn duplicate_registration_is_name_taken_and_keeps_row() {
        let directory = InMemoryDirectory::new();
        let ledger = Ledger::new();
        let mut alice = client(ABC, directory.clone(), ledger.clone());
        alice.connect().await.unwrap();
        alice.register("alice").await.unwrap();
        assert_eq!(directory.row_count(), 1);

        // Second attempt with different casing still violates uniqueness.
        let mut imposter = client(DEF, directory.clone(), ledger);
        imposter.connect().await.unwrap();
        let err = imposter.register("ALICE").await.unwrap_err();
        assert!(matches!(err, DmailError::NameTaken));
        assert_eq!(directory.row_count(), 1);

        // The existing row is unaltered.
        let wallet = directory
            .resolve_wallet_for_name("alice@dmail.org")
            .await
            .unwrap();
        assert_eq!(wallet, Some(WalletAddress::new(ABC)));
    }

    #[tokio::test]
    async fn registration_round_trips_in_both_directions() {
        let directory = InMemoryDirectory::new();
        let mut alice = client(ABC, directory.clone(), Ledger::new());
        alice.connect().await.unwrap();
        let email = alice.register("alice").await.unwrap();
        assert_eq!(email, "alice@dmail.org");

        assert_eq!(
            directory
                .resolve_wallet_for_name("alice@dmail.org")
                .await
                .unwrap(),
            Some(WalletAddress::new(ABC))
        );
        assert_eq!(
            directory
                .resolve_name_for_wallet(&WalletAddress::new(ABC))
                .await
                .unwrap(),
            Some("alice@dmail.org".to_string())
        );
    }

    #[tokio::test]
    async fn send_to_unresolvable_name_makes_no_contract_call() {
        let ledger = Ledger::new();
        let mut sender = client(DEF, InMemoryDirectory::new(), ledger.clone());
        sender.connect().await.unwrap();

        let err = sender
            .send("ghost@dmail.org", "Hi", "Hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DmailError::RecipientUnresolved));
        assert_eq!(ledger.send_attempts(), 0);
    }

    #[tokio::test]
    async fn directory_outage_on_send_is_not_recipient_unresolved() {
        let directory = InMemoryDirectory::new();
        let mut sender = client(DEF, directory.clone(), Ledger::new());
        sender.connect().await.unwrap();

        directory.set_failing(true);
        let err = sender
            .send("bob@dmail.org", "Hi", "Hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DmailError::Unknown(_)));
    }

    #[tokio::test]
    async fn send_scenario_delivers_exactly_one_message() {
        let directory = InMemoryDirectory::new();
        let ledger = Ledger::new();

        let mut bob = client(ABC, directory.clone(), ledger.clone());
        bob.connect().await.unwrap();
        let email = bob.register("bob").await.unwrap();
        assert_eq!(email, "bob@dmail.org");

        let mut sender = client(DEF, directory.clone(), ledger.clone());
        sender.connect().await.unwrap();
        sender
            .send("bob@dmail.org", "Hi", "Hello", None)
            .await
            .unwrap();

        let inbox = bob.fetch_inbox().await.unwrap();
        assert_eq!(inbox.len(), 1);
        let msg = &inbox[0];
        assert_eq!(msg.sender, WalletAddress::new(DEF));
        // 0xdef never registered, so the raw wallet is displayed.
        assert_eq!(msg.sender_display, DEF);
        assert_eq!(msg.subject, "Hi");
        assert_eq!(msg.body, "Hello");
        assert_eq!(msg.attachment, None);
    }

    #[tokio::test]
    async fn inbox_enriches_registered_senders() {
        let directory = InMemoryDirectory::new();
        let ledger = Ledger::new();

        let mut bob = client(ABC, directory.clone(), ledger.clone());
        bob.connect().await.unwrap();
        bob.register("bob").await.unwrap();

        let mut carol = client(DEF, directory.clone(), ledger.clone());
        carol.connect().await.unwrap();
        carol.register("carol").await.unwrap();
        carol
            .send("bob@dmail.org", "Hi", "Hello", None)
            .await
            .unwrap();

        let inbox = bob.fetch_inbox().await.unwrap();
        assert_eq!(inbox[0].sender_display, "carol@dmail.org");
    }

    #[tokio::test]
    async fn enrichment_failure_falls_back_to_raw_wallet() {
        let directory = InMemoryDirectory::new();
        let ledger = Ledger::new();

        let mut bob = client(ABC, directory.clone(), ledger.clone());
        bob.connect().await.unwrap();
        bob.register("bob").await.unwrap();

        let mut sender = client(DEF, directory.clone(), ledger.clone());
        sender.connect().await.unwrap();
        sender.send("bob@dmail.org", "a", "b", None).await.unwrap();
        sender.send("bob@dmail.org", "c", "d", None).await.unwrap();

        // Directory goes down before the fetch: the gateway call still
        // succeeds, every entry falls back to the raw wallet, order intact.
        directory.set_failing(true);
        let inbox = bob.fetch_inbox().await.unwrap();
        assert_eq!(inbox.len(), 2);
        assert!(inbox.iter().all(|m| m.sender_display == DEF));
        let subjects: Vec<&str> = inbox.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, ["a", "c"]);
    }

    #[tokio::test]
    async fn inbox_preserves_contract_order() {
        let directory = InMemoryDirectory::new();
        let ledger = Ledger::new();

        let mut bob = client(ABC, directory.clone(), ledger.clone());
        bob.connect().await.unwrap();
        bob.register("bob").await.unwrap();

        let mut sender = client(DEF, directory.clone(), ledger.clone());
        sender.connect().await.unwrap();
        for subject in ["first", "second", "third"] {
            sender
                .send("bob@dmail.org", subject, "body", None)
                .await
                .unwrap();
        }

        let inbox = bob.fetch_inbox().await.unwrap();
        let subjects: Vec<&str> = inbox.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, ["first", "second", "third"]);

        // A fresh call re-fetches the same snapshot in the same order.
        let again = bob.fetch_inbox().await.unwrap();
        assert_eq!(inbox, again);
    }

    #[tokio::test]
    async fn rejected_send_surfaces_verbatim() {
        let directory = InMemoryDirectory::new();
        let ledger = Ledger::new();

        let mut bob = client(ABC, directory.clone(), ledger.clone());
        bob.connect().await.unwrap();
        bob.register("bob").await.unwrap();

        let mut sender = client(DEF, directory, ledger.clone());
        sender.connect().await.unwrap();

        ledger.set_reject_sends(true);
        let err = sender
            .send("bob@dmail.org", "Hi", "Hello", None)
            .await
            .unwrap_err();
        match err {
            DmailError::SendRejected(msg) => assert!(msg.contains("user rejected")),
            other => panic!("expected SendRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn inbox_outage_surfaces_as_unavailable() {
        let ledger = Ledger::new();
        let mut bob = client(ABC, InMemoryDirectory::new(), ledger.clone());
        bob.connect().await.unwrap();

        ledger.set_fail_inbox(true);
        let err = bob.fetch_inbox().await.unwrap_err();
        assert!(matches!(err, DmailError::InboxUnavailable(_)));
    }

    #[tokio::test]
    async fn inbox_without_session_is_unavailable() {
        let sender = client(DEF, InMemoryDirectory::new(), Ledger::new());
        // Never connected: no active account.
        let err = sender.fetch_inbox().await.unwrap_err();
        assert!(matches!(err, DmailError::InboxUnavailable(_)));
    }

    #[tokio::test]
    async fn attachment_travels_with_the_message() {
        let directory = InMemoryDirectory::new();
        let ledger = Ledger::new();

        let mut bob = client(ABC, directory.clone(), ledger.clone());
        bob.connect().await.unwrap();
        bob.register("bob").await.unwrap();

        let mut sender = client(DEF, directory, ledger);
        sender.connect().await.unwrap();

        let cid = sender
            .upload_attachment(Some(Path::new("photo.png")))
            .await
            .unwrap();
        sender
            .send("bob@dmail.org", "pic", "see attached", Some(&cid))
            .await
            .unwrap();

        let inbox = bob.fetch_inbox().await.unwrap();
        assert_eq!(inbox[0].attachment.as_ref(), Some(&cid));
        assert_eq!(
            bob.attachment_url(&cid),
            format!("https://ipfs.io/ipfs/{cid}")
        );
    }

    #[tokio::test]
    async fn upload_with_no_file_fails_without_network() {
        let uploader = FakeUploader::new();
        let provider = FakeProvider::with_accounts(vec![WalletAddress::new(DEF)]);
        let ledger = Ledger::new();
        let make_gateway: Box<dyn Fn(&WalletAddress) -> Result<FakeGateway, GatewayError>> =
            Box::new(move |account| Ok(FakeGateway::new(account.clone(), ledger.clone())));
        let sender: TestClient = DmailClient::new(
            provider,
            InMemoryDirectory::new(),
            make_gateway,
            uploader.clone(),
        );

        let err = sender.upload_attachment(None).await.unwrap_err();
        assert!(matches!(err, DmailError::NoFileSelected));
        assert_eq!(uploader.upload_count(), 0);
    }
}
