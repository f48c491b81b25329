// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Presentation-layer view state, renderer-agnostic.
//!
//! These types hold form fields, table paging, and dialog flags; they make
//! no remote calls and enforce no business rules beyond required fields
//! and the recipient domain-suffix check. Any front-end (the bundled
//! terminal one included) renders from and mutates this state.

pub mod compose;
pub mod inbox;
pub mod notify;
pub mod register;

pub use compose::{ComposeForm, ComposeIssue};
pub use inbox::{InboxView, SortOrder, ROWS_PER_PAGE_OPTIONS};
pub use notify::{Notice, NoticeLevel};
pub use register::RegisterDialog;
