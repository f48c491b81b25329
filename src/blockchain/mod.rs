// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Mail contract integration: network constants, the gateway seam, and the
//! live alloy-backed implementation.

pub mod contract;
pub mod gateway;
pub mod types;

pub use contract::MailContract;
pub use gateway::{GatewayError, MailGateway};
pub use types::{InboxEntry, NetworkConfig, SendAck, SEPOLIA};
