// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Crate-level error taxonomy.
//!
//! Module boundaries carry their own error enums ([`DirectoryError`],
//! [`GatewayError`], [`UploadError`], [`ProviderError`]); this type is the
//! classification every caught failure collapses into before it reaches the
//! user. Nothing here is fatal and nothing is retried automatically: each
//! error is scoped to the single user action that raised it, logged at the
//! call site, and rendered as a short notice.

use crate::attachments::UploadError;
use crate::blockchain::GatewayError;
use crate::directory::DirectoryError;
use crate::wallet::{ProviderError, SessionError};

#[derive(Debug, thiserror::Error)]
pub enum DmailError {
    #[error("no signing provider is present")]
    ProviderMissing,

    #[error("the signing provider returned no accounts")]
    NoAccounts,

    #[error("that name is already taken")]
    NameTaken,

    #[error("registration failed: {0}")]
    RegistrationFailed(String),

    #[error("recipient name does not resolve to a wallet")]
    RecipientUnresolved,

    #[error("send rejected: {0}")]
    SendRejected(String),

    #[error("inbox unavailable: {0}")]
    InboxUnavailable(String),

    #[error("no file selected")]
    NoFileSelected,

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("{0}")]
    Unknown(String),
}

impl DmailError {
    /// Short text for the user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            DmailError::ProviderMissing => "Wallet not found. Install a signing provider first.".into(),
            DmailError::NoAccounts => "Wallet not connected.".into(),
            DmailError::NameTaken => "Username already taken.".into(),
            DmailError::RegistrationFailed(_) => "Failed to register email.".into(),
            DmailError::RecipientUnresolved => "Recipient email not found.".into(),
            DmailError::SendRejected(_) => "Failed to send email.".into(),
            DmailError::InboxUnavailable(_) => "Failed to fetch emails.".into(),
            DmailError::NoFileSelected => "No file selected.".into(),
            DmailError::UploadFailed(_) => "Failed to upload attachment.".into(),
            DmailError::Unknown(_) => "Something went wrong. Please try again.".into(),
        }
    }
}

impl From<ProviderError> for DmailError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Missing => DmailError::ProviderMissing,
            ProviderError::NoAccounts => DmailError::NoAccounts,
            ProviderError::Other(msg) => DmailError::Unknown(msg),
        }
    }
}

impl From<SessionError> for DmailError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Provider(e) => e.into(),
            // Failing to build the gateway handle during (re)connect has no
            // dedicated bucket in the taxonomy.
            SessionError::Gateway(e) => DmailError::Unknown(e.to_string()),
        }
    }
}

impl From<UploadError> for DmailError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFileSelected => DmailError::NoFileSelected,
            other => DmailError::UploadFailed(other.to_string()),
        }
    }
}

impl From<GatewayError> for DmailError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Inbox(msg) => DmailError::InboxUnavailable(msg),
            other => DmailError::SendRejected(other.to_string()),
        }
    }
}

impl DmailError {
    /// Classify a directory failure raised during registration.
    pub fn from_registration(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NameTaken => DmailError::NameTaken,
            other => DmailError::RegistrationFailed(other.to_string()),
        }
    }

    /// Classify a directory failure raised during a lookup.
    ///
    /// Lookups distinguish a missing row (`Ok(None)`, not an error) from a
    /// backend failure; the latter lands in the catch-all bucket.
    pub fn from_lookup(err: DirectoryError) -> Self {
        DmailError::Unknown(err.to_string())
    }
}
