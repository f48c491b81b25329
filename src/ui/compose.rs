// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Composition form state.
//!
//! Pure view state: required-field enforcement and the domain-suffix
//! pattern check are the only rules here. The busy flag disables the send
//! control while a call is pending; there is no cancellation of an
//! in-flight call.

use crate::models::{has_mail_suffix, ContentId, MAIL_SUFFIX};

/// Why the form refuses to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeIssue {
    MissingRecipient,
    MissingSubject,
    MissingBody,
    /// Recipient does not end in the fixed domain suffix.
    BadRecipientDomain,
}

impl std::fmt::Display for ComposeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComposeIssue::MissingRecipient => write!(f, "Recipient is required."),
            ComposeIssue::MissingSubject => write!(f, "Subject is required."),
            ComposeIssue::MissingBody => write!(f, "Message body is required."),
            ComposeIssue::BadRecipientDomain => {
                write!(f, "Recipient must end in {MAIL_SUFFIX}.")
            }
        }
    }
}

/// State of the compose view.
#[derive(Debug, Clone, Default)]
pub struct ComposeForm {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<ContentId>,
    busy: bool,
}

impl ComposeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check required fields and the recipient suffix.
    pub fn validate(&self) -> Result<(), ComposeIssue> {
        if self.to.trim().is_empty() {
            return Err(ComposeIssue::MissingRecipient);
        }
        if !has_mail_suffix(&self.to) {
            return Err(ComposeIssue::BadRecipientDomain);
        }
        if self.subject.trim().is_empty() {
            return Err(ComposeIssue::MissingSubject);
        }
        if self.body.trim().is_empty() {
            return Err(ComposeIssue::MissingBody);
        }
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mark a send in flight. Returns `false` (and does nothing) when one
    /// already is; re-clicking send must not trigger a second call.
    pub fn begin_submit(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    /// Finish the in-flight send. The fields clear only on an acknowledged
    /// submission; on failure the form returns to its pre-call state.
    pub fn finish_submit(&mut self, acknowledged: bool) {
        self.busy = false;
        if acknowledged {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.to.clear();
        self.subject.clear();
        self.body.clear();
        self.attachment = None;
    }
}
