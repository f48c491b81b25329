// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! # Identity Directory
//!
//! Bidirectional lookup between wallet addresses and registered
//! `@dmail.org` names, backed by one externally hosted table
//! (`user_emails`, unique on `email`). This client performs only point
//! lookups and a single insert; rows are never updated or deleted.
//!
//! A missing row is `Ok(None)`, never an error. A backend failure is a
//! distinct `Err` so callers can tell an unregistered wallet apart from an
//! outage; what to show the user is decided at the call site.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::models::{compose_mail_address, RegisteredIdentity, WalletAddress};

const TABLE_PATH: &str = "/rest/v1/user_emails";
/// Postgres unique-constraint violation, as reported by PostgREST.
const UNIQUE_VIOLATION_CODE: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("name is already registered")]
    NameTaken,

    #[error("directory request failed: {0}")]
    Backend(String),

    #[error("directory response was invalid: {0}")]
    InvalidResponse(String),
}

/// Directory operations, as a seam for substituting an in-memory table in
/// tests.
pub trait NameDirectory {
    /// Registered name for a wallet, or `Ok(None)` when unregistered.
    /// Case-insensitive on the wallet.
    fn resolve_name_for_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> impl Future<Output = Result<Option<String>, DirectoryError>> + Send;

    /// Wallet owning a registered name, or `Ok(None)`. Keyed on the name's
    /// lowercase form.
    fn resolve_wallet_for_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<WalletAddress>, DirectoryError>> + Send;

    /// Insert the `(wallet, <local>@dmail.org)` row. `NameTaken` when the
    /// uniqueness constraint is violated; no retry on any failure.
    fn register(
        &self,
        wallet: &WalletAddress,
        local_part: &str,
    ) -> impl Future<Output = Result<RegisteredIdentity, DirectoryError>> + Send;
}

/// Directory client over the hosted table's REST interface.
#[derive(Debug, Clone)]
pub struct SupabaseDirectory {
    base_url: String,
    anon_key: String,
    http: Client,
}

impl SupabaseDirectory {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, DirectoryError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| DirectoryError::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            http,
        })
    }

    fn table_url(&self) -> String {
        format!("{}{}", self.base_url, TABLE_PATH)
    }

    /// Point lookup returning at most one row's `select`ed column.
    async fn select_single(
        &self,
        select: &str,
        key_column: &str,
        key_value: &str,
    ) -> Result<Option<Value>, DirectoryError> {
        let response = self
            .http
            .get(self.table_url())
            .query(&[
                ("select", select),
                (key_column, &format!("eq.{key_value}")),
                ("limit", "1"),
            ])
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .send()
            .await
            .map_err(|e| DirectoryError::Backend(format!("lookup failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Backend(format!(
                "lookup returned {status}: {body}"
            )));
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| DirectoryError::InvalidResponse(format!("lookup invalid JSON: {e}")))?;

        Ok(rows.into_iter().next())
    }
}

impl NameDirectory for SupabaseDirectory {
    async fn resolve_name_for_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<String>, DirectoryError> {
        // WalletAddress is lowercase by construction, matching stored rows.
        let row = self
            .select_single("email", "wallet_address", wallet.as_str())
            .await?;
        Ok(row.and_then(|r| extract_column(&r, "email")))
    }

    async fn resolve_wallet_for_name(
        &self,
        name: &str,
    ) -> Result<Option<WalletAddress>, DirectoryError> {
        let key = name.trim().to_ascii_lowercase();
        let row = self.select_single("wallet_address", "email", &key).await?;
        Ok(row
            .and_then(|r| extract_column(&r, "wallet_address"))
            .map(WalletAddress::new))
    }

    async fn register(
        &self,
        wallet: &WalletAddress,
        local_part: &str,
    ) -> Result<RegisteredIdentity, DirectoryError> {
        let email = compose_mail_address(local_part);
        let payload = json!([{
            "wallet_address": wallet.as_str(),
            "email": email,
        }]);

        let response = self
            .http
            .post(self.table_url())
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await
            .map_err(|e| DirectoryError::Backend(format!("insert failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_insert_failure(status, &body));
        }

        let mut rows: Vec<RegisteredIdentity> = response
            .json()
            .await
            .map_err(|e| DirectoryError::InvalidResponse(format!("insert invalid JSON: {e}")))?;

        rows.pop()
            .ok_or_else(|| DirectoryError::InvalidResponse("insert returned no row".to_string()))
    }
}

fn extract_column(row: &Value, column: &str) -> Option<String> {
    row.get(column).and_then(Value::as_str).map(str::to_string)
}

/// Map an insert failure: unique violation means the name is taken,
/// everything else is a generic backend failure.
fn classify_insert_failure(status: StatusCode, body: &str) -> DirectoryError {
    let unique_violation = status == StatusCode::CONFLICT
        || serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("code").and_then(Value::as_str).map(str::to_string))
            .is_some_and(|code| code == UNIQUE_VIOLATION_CODE);

    if unique_violation {
        DirectoryError::NameTaken
    } else {
        DirectoryError::Backend(format!("insert returned {status}: {body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_status_is_name_taken() {
        let err = classify_insert_failure(StatusCode::CONFLICT, "");
        assert!(matches!(err, DirectoryError::NameTaken));
    }

    #[test]
    fn unique_violation_code_is_name_taken() {
        let body = r#"{"code":"23505","message":"duplicate key value"}"#;
        let err = classify_insert_failure(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, DirectoryError::NameTaken));
    }

    #[test]
    fn other_failures_stay_backend_errors() {
        let err = classify_insert_failure(StatusCode::SERVICE_UNAVAILABLE, "down");
        assert!(matches!(err, DirectoryError::Backend(_)));

        let body = r#"{"code":"42501","message":"permission denied"}"#;
        let err = classify_insert_failure(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, DirectoryError::Backend(_)));
    }

    #[test]
    fn extract_column_reads_string_cells() {
        let row = serde_json::json!({"email": "alice@dmail.org", "id": 7});
        assert_eq!(
            extract_column(&row, "email"),
            Some("alice@dmail.org".to_string())
        );
        // Non-string cells and missing columns are both absent.
        assert_eq!(extract_column(&row, "id"), None);
        assert_eq!(extract_column(&row, "wallet_address"), None);
    }

    #[test]
    fn identity_row_deserializes() {
        let body = r#"[{
            "id": "0b84e6a2-8c1f-4f6a-9a41-2f9a55f0d3c1",
            "wallet_address": "0xabc0000000000000000000000000000000000001",
            "email": "alice@dmail.org",
            "created_at": "2026-01-15T12:30:00+00:00"
        }]"#;
        let rows: Vec<RegisteredIdentity> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "alice@dmail.org");
        assert!(rows[0].created_at.is_some());
    }
}
