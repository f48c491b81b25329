// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Wallet session: provider boundary and active-account lifecycle.

pub mod provider;
pub mod session;

pub use provider::{LocalKeyProvider, ProviderError, SigningProvider};
pub use session::{SessionError, SessionEvent, WalletSession};
