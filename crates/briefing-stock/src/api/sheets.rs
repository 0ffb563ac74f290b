//! Google Sheets tab export

use crate::config::SheetCredentials;
use crate::error::{BriefingError, Result};
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// OAuth scope requested for service-account tokens
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

enum SheetAuth {
    Anonymous,
    AccessToken(String),
    ServiceAccount(Box<CustomServiceAccount>),
}

/// Downloads one tab of a spreadsheet as CSV
///
/// Sheets shared by link need no credentials. Private sheets need either
/// an access token or a service-account key the sheet is shared with.
pub struct SheetsClient {
    client: Client,
    auth: SheetAuth,
}

impl SheetsClient {
    pub fn new(credentials: &SheetCredentials, timeout: Duration) -> Result<Self> {
        let auth = match credentials {
            SheetCredentials::Anonymous => SheetAuth::Anonymous,
            SheetCredentials::AccessToken(token) => SheetAuth::AccessToken(token.clone()),
            SheetCredentials::ServiceAccount(json) => {
                let account = CustomServiceAccount::from_json(json).map_err(|e| {
                    BriefingError::ConfigError(format!("invalid service-account key: {e}"))
                })?;
                SheetAuth::ServiceAccount(Box::new(account))
            }
        };

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            auth,
        })
    }

    /// CSV export URL for a tab
    pub fn export_url(sheet_id: &str, tab: &str) -> Result<Url> {
        let base = format!("{SHEETS_BASE}/{sheet_id}/gviz/tq");
        Url::parse_with_params(&base, &[("tqx", "out:csv"), ("sheet", tab)])
            .map_err(|e| BriefingError::WatchlistError(format!("invalid sheet id {sheet_id:?}: {e}")))
    }

    async fn bearer(&self) -> Result<Option<String>> {
        match &self.auth {
            SheetAuth::Anonymous => Ok(None),
            SheetAuth::AccessToken(token) => Ok(Some(token.clone())),
            SheetAuth::ServiceAccount(account) => {
                let token = account.token(&[SHEETS_READONLY_SCOPE]).await.map_err(|e| {
                    BriefingError::WatchlistError(format!("service-account token request failed: {e}"))
                })?;
                debug!("minted service-account token");
                Ok(Some(token.as_str().to_string()))
            }
        }
    }

    /// Fetch the tab's contents as CSV text
    #[instrument(skip(self))]
    pub async fn fetch_csv(&self, sheet_id: &str, tab: &str) -> Result<String> {
        let mut request = self.client.get(Self::export_url(sheet_id, tab)?);
        if let Some(token) = self.bearer().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BriefingError::WatchlistError(format!(
                "sheet export returned {status}"
            )));
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("text/html"));
        let body = response.text().await?;

        // A sign-in page instead of CSV means the sheet is not shared
        if is_html {
            return Err(BriefingError::WatchlistError(
                "sheet is not readable; share it with the service account or set SERVICE_ACCOUNT_JSON"
                    .to_string(),
            ));
        }

        debug!(bytes = body.len(), "downloaded sheet export");
        Ok(body)
    }
}
