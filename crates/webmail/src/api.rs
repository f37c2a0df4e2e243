use crate::types::{accounts_from_directory, Account, AuthResult};
use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

const USERNAMES_PATH: &str = "/oauth/usernames/";
const AUTHENTICATE_PATH: &str = "/oauth/authenticate/";
const DEAUTHENTICATE_PATH: &str = "/oauth/deauthenticate/";
const AUTHORIZE_PATH: &str = "/oauth/authorize/";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{map_anyhow_error, ApiError};
    use anyhow::anyhow;

    #[test]
    fn endpoints_join_without_duplicate_slashes() {
        let api = WebmailApi::new("https://webmail.mailcapsule.io/");
        assert_eq!(
            api.endpoint(USERNAMES_PATH),
            "https://webmail.mailcapsule.io/oauth/usernames/"
        );
    }

    #[test]
    fn endpoints_keep_the_configured_host() {
        let api = WebmailApi::new("http://localhost:8025");
        assert_eq!(
            api.endpoint(AUTHORIZE_PATH),
            "http://localhost:8025/oauth/authorize/"
        );
    }

    #[test]
    fn timeouts_classify_as_timeout() {
        let err = anyhow!("operation timed out after 20s");
        assert!(matches!(map_anyhow_error(&err), ApiError::Timeout(_)));
    }

    #[test]
    fn decode_contexts_classify_as_decode() {
        let err = anyhow!("expected value at line 1").context("Failed to decode the account list");
        assert!(matches!(map_anyhow_error(&err), ApiError::Decode(_)));
    }

    #[test]
    fn unreachable_host_contexts_classify_as_network() {
        let err = anyhow!("dns failure").context("Failed to reach the webmail backend");
        assert!(matches!(map_anyhow_error(&err), ApiError::Network(_)));
    }

    #[test]
    fn backend_verdicts_classify_as_service() {
        let err = anyhow!("account is already linked");
        assert!(matches!(map_anyhow_error(&err), ApiError::Service(_)));
    }
}

/// Client for the webmail backend's OAuth linking endpoints. Single-shot
/// calls: failures surface as errors for the caller to render, never retried.
#[derive(Clone)]
pub struct WebmailApi {
    client: Client,
    host: String,
}

impl WebmailApi {
    pub fn new(host: &str) -> Self {
        let client = Client::builder()
            .user_agent("capsule-link/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    /// Accounts eligible for Gmail linking, keyed local name -> gmail
    /// address (empty when unlinked). May legitimately be empty.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let response = self
            .client
            .get(self.endpoint(USERNAMES_PATH))
            .send()
            .await
            .context("Failed to reach the webmail backend")?;

        let directory: BTreeMap<String, String> = response
            .json()
            .await
            .context("Failed to decode the account list")?;

        tracing::debug!(count = directory.len(), "Fetched eligible accounts");
        Ok(accounts_from_directory(directory))
    }

    /// Asks the backend to start the Google consent flow for one account.
    /// A successful verdict carries the consent URI to open next.
    pub async fn start_authentication(&self, account: &Account) -> Result<AuthResult> {
        let response = self
            .client
            .post(self.endpoint(AUTHENTICATE_PATH))
            .json(&serde_json::json!({
                "local": account.local_name,
                "gmail": account.gmail_address,
            }))
            .send()
            .await
            .context("Failed to send the authentication request")?;

        let result: AuthResult = response
            .json()
            .await
            .context("Failed to decode the authentication verdict")?;

        tracing::debug!(
            local = %account.local_name,
            success = result.success,
            "Authentication request answered"
        );
        Ok(result)
    }

    /// Revokes an existing Gmail link. Terminal: any URI in the verdict is
    /// ignored.
    pub async fn revoke_authentication(&self, account: &Account) -> Result<AuthResult> {
        let response = self
            .client
            .post(self.endpoint(DEAUTHENTICATE_PATH))
            .json(&serde_json::json!({
                "local": account.local_name,
                "gmail": account.gmail_address,
            }))
            .send()
            .await
            .context("Failed to send the deauthentication request")?;

        let result: AuthResult = response
            .json()
            .await
            .context("Failed to decode the deauthentication verdict")?;

        tracing::debug!(
            local = %account.local_name,
            success = result.success,
            "Deauthentication request answered"
        );
        Ok(result)
    }

    /// Finishes a pending two-step handshake by quoting the state token
    /// from the redirect. Terminal whatever the verdict says.
    pub async fn exchange_authorization(&self, state: &str) -> Result<AuthResult> {
        let response = self
            .client
            .post(self.endpoint(AUTHORIZE_PATH))
            .json(&serde_json::json!({ "state": state }))
            .send()
            .await
            .context("Failed to send the authorization exchange")?;

        let result: AuthResult = response
            .json()
            .await
            .context("Failed to decode the authorization verdict")?;

        tracing::debug!(success = result.success, "Authorization exchange answered");
        Ok(result)
    }
}
