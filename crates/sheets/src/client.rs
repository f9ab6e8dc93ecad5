use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{Permission, SheetsError, SpreadsheetService};

const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_URL: &str = "https://www.googleapis.com/drive/v3/files";
const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
// Refresh a bit before Google would reject the token.
const TOKEN_MARGIN_SECS: i64 = 60;

/// Google service account credentials.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    pub token_uri: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetCreated {
    #[serde(rename = "spreadsheetId")]
    spreadsheet_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Sheets v4 and Drive v3 client authenticated as a service account.
pub struct GoogleSheetsClient {
    client: Client,
    account: ServiceAccount,
    key: EncodingKey,
    token: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("client_email", &self.account.client_email)
            .finish_non_exhaustive()
    }
}

impl GoogleSheetsClient {
    pub fn new(account: ServiceAccount) -> Result<Self, SheetsError> {
        // Keys coming from env variables usually carry escaped newlines.
        let pem = account.private_key.replace("\\n", "\n");
        let key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|err| SheetsError::Credentials(err.to_string()))?;

        Ok(Self {
            client: Client::new(),
            account,
            key,
            token: Mutex::new(None),
        })
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, SheetsError> {
        let claims = Claims {
            iss: &self.account.client_email,
            scope: self.account.scopes.join(" "),
            aud: &self.account.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.account.private_key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.key)
            .map_err(|err| SheetsError::Credentials(err.to_string()))
    }

    async fn access_token(&self) -> Result<String, SheetsError> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref()
            && token.expires_at > now
        {
            return Ok(token.value.clone());
        }

        let assertion = self.assertion(now)?;
        let resp = self
            .client
            .post(&self.account.token_uri)
            .form(&[("grant_type", JWT_GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Token(format!("{status}: {message}")));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|err| SheetsError::Token(err.to_string()))?;
        let lifetime = token.expires_in.unwrap_or(TOKEN_LIFETIME_SECS) - TOKEN_MARGIN_SECS;
        tracing::debug!("fetched google access token for {}", self.account.client_email);

        *cached = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: now + Duration::seconds(lifetime),
        });
        Ok(token.access_token)
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, SheetsError> {
        let token = self.access_token().await?;
        let resp = req.bearer_auth(token).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("google api error")
                .to_string(),
        };
        Err(SheetsError::Api { status, message })
    }
}

impl SpreadsheetService for GoogleSheetsClient {
    async fn create_spreadsheet(&self, body: &Value) -> Result<String, SheetsError> {
        let resp = self.send(self.client.post(SHEETS_URL).json(body)).await?;
        let created: SpreadsheetCreated = resp.json().await.map_err(|err| SheetsError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: format!("unexpected spreadsheets.create reply: {err}"),
        })?;
        Ok(created.spreadsheet_id)
    }

    async fn set_permissions(
        &self,
        spreadsheet_id: &str,
        permission: &Permission,
    ) -> Result<(), SheetsError> {
        let url = format!("{DRIVE_URL}/{spreadsheet_id}/permissions");
        self.send(
            self.client
                .post(url)
                .query(&[("fields", "id")])
                .json(permission),
        )
        .await?;
        Ok(())
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        body: &Value,
    ) -> Result<(), SheetsError> {
        let url = format!("{SHEETS_URL}/{spreadsheet_id}/values/{range}");
        self.send(
            self.client
                .put(url)
                .query(&[("valueInputOption", "USER_ENTERED")])
                .json(body),
        )
        .await?;
        Ok(())
    }
}
