// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Registration dialog state: a single local-part field submitted through
//! the identity directory.

use crate::models::MAIL_DOMAIN;

#[derive(Debug, Clone, Default)]
pub struct RegisterDialog {
    pub open: bool,
    pub local_part: String,
    busy: bool,
}

impl RegisterDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.local_part.clear();
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Local part ready for submission: trimmed and lowercased. `None`
    /// when the field is empty or would not form a plain local part.
    pub fn normalized_local(&self) -> Option<String> {
        let local = self.local_part.trim().to_ascii_lowercase();
        if local.is_empty() || local.contains('@') || local.contains(char::is_whitespace) {
            return None;
        }
        Some(local)
    }

    /// Preview of the resulting address, for the dialog's suffix label.
    pub fn preview(&self) -> String {
        format!("{}@{}", self.local_part.trim().to_ascii_lowercase(), MAIL_DOMAIN)
    }

    pub fn begin_submit(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    /// A successful registration closes the dialog; failure keeps it open
    /// for a manual retry.
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.busy = false;
        if succeeded {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_part_is_trimmed_and_lowercased() {
        let mut dialog = RegisterDialog::new();
        dialog.local_part = "  Alice ".to_string();
        assert_eq!(dialog.normalized_local(), Some("alice".to_string()));
        assert_eq!(dialog.preview(), "alice@dmail.org");
    }

    #[test]
    fn rejects_empty_and_address_like_input() {
        let mut dialog = RegisterDialog::new();
        assert_eq!(dialog.normalized_local(), None);

        dialog.local_part = "alice@dmail.org".to_string();
        assert_eq!(dialog.normalized_local(), None);

        dialog.local_part = "al ice".to_string();
        assert_eq!(dialog.normalized_local(), None);
    }

    #[test]
    fn failure_keeps_the_dialog_open() {
        let mut dialog = RegisterDialog::new();
        dialog.open();
        dialog.local_part = "alice".to_string();

        assert!(dialog.begin_submit());
        dialog.finish_submit(false);
        assert!(dialog.open);
        assert_eq!(dialog.local_part, "alice");

        dialog.begin_submit();
        dialog.finish_submit(true);
        assert!(!dialog.open);
        assert!(dialog.local_part.is_empty());
    }
}
