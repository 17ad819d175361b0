//! Google Sheets v4 `values` client implementing [`SheetStore`].

use futures::future::BoxFuture;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::types::SheetRow;
use crate::io::auth::ServiceAccount;
use crate::io::config::{RsvpConfig, SheetCredentials};
use crate::io::store::{SheetStore, StoreError};

/// Base URL of the Sheets API.
pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// Where the guest sheet lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocation {
    pub sheet_id: String,
    pub page_name: String,
    /// A1 range read on fetch, e.g. `A1:J137`.
    pub read_range: String,
    /// A1 range replaced on submit, e.g. `A1:K137`.
    pub write_range: String,
}

impl SheetLocation {
    fn qualified(&self, range: &str) -> String {
        format!("{}!{}", self.page_name, range)
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: &'a [SheetRow],
}

/// Store backed by one page of a Google spreadsheet.
#[derive(Debug)]
pub struct GoogleSheetsStore {
    http: reqwest::Client,
    auth: ServiceAccount,
    location: SheetLocation,
    base_url: String,
}

impl GoogleSheetsStore {
    pub fn new(http: reqwest::Client, auth: ServiceAccount, location: SheetLocation) -> Self {
        Self {
            http,
            auth,
            location,
            base_url: SHEETS_API_URL.to_string(),
        }
    }

    /// Build a store for the configured page using service-account
    /// credentials.
    pub fn from_config(
        credentials: &SheetCredentials,
        config: &RsvpConfig,
    ) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rsvp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let auth = ServiceAccount::new(
            credentials.client_email.clone(),
            &credentials.private_key,
            http.clone(),
        )?;
        let location = SheetLocation {
            sheet_id: credentials.sheet_id.clone(),
            page_name: credentials.page_name.clone(),
            read_range: config.read_range.clone(),
            write_range: config.write_range.clone(),
        };
        Ok(Self::new(http, auth, location))
    }

    async fn read_rows(&self) -> Result<Vec<SheetRow>, StoreError> {
        let range = self.location.qualified(&self.location.read_range);
        let url = values_url(&self.base_url, &self.location.sheet_id, &range)?;
        let token = self.auth.access_token().await?;

        debug!(range = %range, "reading sheet range");
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = check_status(response).await?;
        let body: ValueRange = response
            .json()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))?;

        let rows: Vec<SheetRow> = body
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        info!(range = %range, rows = rows.len(), "read sheet range");
        Ok(rows)
    }

    async fn write_rows(&self, rows: Vec<SheetRow>) -> Result<(), StoreError> {
        let range = self.location.qualified(&self.location.write_range);
        let mut url = values_url(&self.base_url, &self.location.sheet_id, &range)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        let token = self.auth.access_token().await?;

        debug!(range = %range, rows = rows.len(), "writing sheet range");
        let body = ValueRangeBody {
            range: &range,
            major_dimension: "ROWS",
            values: &rows,
        };
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;
        info!(range = %range, rows = rows.len(), "wrote sheet range");
        Ok(())
    }
}

impl SheetStore for GoogleSheetsStore {
    fn read(&self) -> BoxFuture<'_, Result<Vec<SheetRow>, StoreError>> {
        Box::pin(self.read_rows())
    }

    fn write(&self, rows: Vec<SheetRow>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(self.write_rows(rows))
    }
}

/// `{base}/v4/spreadsheets/{sheet_id}/values/{range}` with each segment
/// percent-encoded.
fn values_url(base: &str, sheet_id: &str, range: &str) -> Result<Url, StoreError> {
    let mut url =
        Url::parse(base).map_err(|err| StoreError::Decode(format!("invalid base url: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| StoreError::Decode(format!("base url cannot have a path: {base}")))?
        .pop_if_empty()
        .extend(["v4", "spreadsheets", sheet_id, "values", range]);
    Ok(url)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Formatted values arrive as strings; anything else is rendered as text.
fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
