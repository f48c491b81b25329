// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Mail contract bindings and the live gateway implementation.
//!
//! The contract exposes exactly two entry points: `sendEmail` submits a
//! message and `getInbox` returns the snapshot of messages addressed to the
//! caller. Message storage is owned entirely by the contract; this client
//! never mutates or deletes.

use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, U256},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, ProviderBuilder, RootProvider,
    },
    signers::local::PrivateKeySigner,
    sol,
};

use crate::models::{ContentId, WalletAddress};

use super::gateway::{GatewayError, MailGateway};
use super::types::{InboxEntry, SendAck};

sol! {
    #[sol(rpc)]
    interface IDmail {
        struct Mail {
            address sender;
            string subject;
            string body;
            uint256 timestamp;
            string attachmentId;
        }

        function sendEmail(address recipient, string subject, string body, string attachmentId) external;
        function getInbox() external view returns (Mail[] memory);
    }
}

/// HTTP provider with gas/nonce/chain-id fillers and a wallet for signing.
type SignedProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
>;

/// Live gateway bound to one signing account.
///
/// The wallet session tears this handle down and rebuilds it whenever the
/// active account changes.
pub struct MailContract {
    account: WalletAddress,
    from: Address,
    explorer_url: String,
    contract: IDmail::IDmailInstance<SignedProvider>,
}

impl MailContract {
    /// Connect the contract at `contract_address` over `rpc_url`, signing as
    /// `signer`. Value and gas are left to the provider's fillers.
    pub fn connect(
        rpc_url: &str,
        contract_address: &str,
        explorer_url: &str,
        signer: PrivateKeySigner,
    ) -> Result<Self, GatewayError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| GatewayError::InvalidRpcUrl(e.to_string()))?;

        let from = signer.address();
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        let address = Address::from_str(contract_address)
            .map_err(|e| GatewayError::InvalidAddress(e.to_string()))?;

        Ok(Self {
            account: WalletAddress::new(format!("{from:?}")),
            from,
            explorer_url: explorer_url.trim_end_matches('/').to_string(),
            contract: IDmail::new(address, provider),
        })
    }
}

impl MailGateway for MailContract {
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
        let to = Address::from_str(recipient.as_str())
            .map_err(|e| GatewayError::InvalidAddress(e.to_string()))?;

        // Empty string on the wire means "no attachment".
        let attachment_id = attachment.map(|c| c.as_str().to_string()).unwrap_or_default();

        let pending = self
            .contract
            .sendEmail(to, subject.to_string(), body.to_string(), attachment_id)
            .from(self.from)
            .send()
            .await
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        let explorer_url = format!("{}/tx/{}", self.explorer_url, tx_hash);

        tracing::info!(%tx_hash, "message submitted");

        Ok(SendAck {
            tx_hash,
            explorer_url,
        })
    }

    async fn fetch_inbox(&self) -> Result<Vec<InboxEntry>, GatewayError> {
        let mails = self
            .contract
            .getInbox()
            .from(self.from)
            .call()
            .await
            .map_err(|e| GatewayError::Inbox(e.to_string()))?;

        Ok(mails.into_iter().map(entry_from_wire).collect())
    }
}

fn entry_from_wire(mail: IDmail::Mail) -> InboxEntry {
    InboxEntry {
        sender: WalletAddress::new(format!("{:?}", mail.sender)),
        subject: mail.subject,
        body: mail.body,
        timestamp: normalize_timestamp(mail.timestamp),
        attachment: ContentId::new(mail.attachmentId),
    }
}

/// Clamp the contract's uint256 timestamp into the i64 unix-seconds range.
pub(crate) fn normalize_timestamp(raw: U256) -> i64 {
    i64::try_from(raw).unwrap_or(i64::MAX)
}
