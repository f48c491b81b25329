// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Gateway seam over the two mail contract operations.
//!
//! The contract is an opaque external dependency; everything above the
//! gateway talks to this trait so tests can substitute an in-memory ledger.

use std::future::Future;

use crate::models::{ContentId, WalletAddress};

use super::types::{InboxEntry, SendAck};

/// Errors raised by the contract gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Submission rejected: {0}")]
    Rejected(String),

    #[error("Inbox fetch failed: {0}")]
    Inbox(String),
}

/// Thin call layer over the mail contract's two entry points.
pub trait MailGateway {
    /// Account the gateway signs and reads as.
    fn account(&self) -> &WalletAddress;

    /// Submit a message, signed by the active account. The returned ack
    /// means submitted, not finalized. Errors surface verbatim; nothing is
    /// retried.
    fn send_mail(
        &self,
        recipient: &WalletAddress,
        subject: &str,
        body: &str,
        attachment: Option<&ContentId>,
    ) -> impl Future<Output = Result<SendAck, GatewayError>> + Send;

    /// Fetch the caller's inbox as a finite snapshot in contract-reported
    /// order. A fresh call re-fetches; there is no resumption.
    fn fetch_inbox(&self) -> impl Future<Output = Result<Vec<InboxEntry>, GatewayError>> + Send;
}
