//! Export of the fundraising report to Google Sheets.
//!
//! [`export_report`] drives any [`SpreadsheetService`]; [`GoogleSheetsClient`]
//! is the implementation backed by the Google REST APIs.

use std::future::Future;

use serde::Serialize;
use serde_json::Value;

pub use client::{GoogleSheetsClient, ServiceAccount};
pub use error::SheetsError;
pub use template::{ReportRow, ReportTemplate, format_elapsed};

mod client;
mod error;
mod template;

const SPREADSHEET_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Drive permission granted on a new spreadsheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(rename = "type")]
    pub kind: String,
    pub role: String,
    pub email_address: String,
}

impl Permission {
    /// Write access for a single user.
    pub fn writer(email_address: impl Into<String>) -> Self {
        Self {
            kind: "user".to_string(),
            role: "writer".to_string(),
            email_address: email_address.into(),
        }
    }
}

/// The spreadsheet operations the report export needs.
pub trait SpreadsheetService {
    /// Creates a spreadsheet and returns its id.
    fn create_spreadsheet(
        &self,
        body: &Value,
    ) -> impl Future<Output = Result<String, SheetsError>> + Send;

    fn set_permissions(
        &self,
        spreadsheet_id: &str,
        permission: &Permission,
    ) -> impl Future<Output = Result<(), SheetsError>> + Send;

    fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        body: &Value,
    ) -> impl Future<Output = Result<(), SheetsError>> + Send;
}

/// Creates the report spreadsheet, shares it and fills it with `rows`.
///
/// Returns the URL of the new spreadsheet.
pub async fn export_report<S: SpreadsheetService>(
    service: &S,
    template: &ReportTemplate,
    rows: &[ReportRow],
    share_with: Option<&str>,
) -> Result<String, SheetsError> {
    debug_assert_eq!(template.data_rows(), rows.len());

    let spreadsheet_id = service
        .create_spreadsheet(&template.spreadsheet_body())
        .await?;
    tracing::info!("created report spreadsheet {spreadsheet_id}");

    if let Some(email) = share_with {
        service
            .set_permissions(&spreadsheet_id, &Permission::writer(email))
            .await?;
        tracing::debug!("shared spreadsheet {spreadsheet_id} with {email}");
    }

    service
        .update_values(
            &spreadsheet_id,
            &template.table_range(),
            &template.update_body(rows),
        )
        .await?;
    tracing::info!(
        "report spreadsheet {spreadsheet_id} filled with {} projects",
        rows.len()
    );

    Ok(format!("{SPREADSHEET_URL}/{spreadsheet_id}"))
}
