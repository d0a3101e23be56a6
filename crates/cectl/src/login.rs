//! Username/password login that exchanges credentials for API secrets.

use std::fmt;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::CliError;

/// Known platform environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Snapshot builds.
    Snapshot,
    /// Staging.
    Staging,
    /// Production (US).
    Production,
    /// Production (UK).
    Uk,
}

impl Environment {
    /// All environments in prompt order.
    pub const ALL: [Self; 4] = [Self::Snapshot, Self::Staging, Self::Production, Self::Uk];

    /// API base URL of the environment.
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Snapshot => "https://snapshot.cloud-elements.com/elements/api-v2",
            Self::Staging => "https://staging.cloud-elements.com/elements/api-v2",
            Self::Production => "https://api.cloud-elements.com/elements/api-v2",
            Self::Uk => "https://console.cloud-elements.co.uk/elements/api-v2",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Snapshot => "snapshot",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Uk => "uk",
        };
        f.write_str(name)
    }
}

/// User and organization secrets of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Secrets {
    /// User secret.
    pub user_secret: String,
    /// Organization secret.
    pub organization_secret: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Log in and fetch the account secrets.
///
/// Posts the credentials to `{base}/authentication`, then reads
/// `{base}/authentication/secrets` with the returned bearer token.
///
/// # Errors
///
/// Returns [`CliError::Login`] if no token is returned.
pub async fn obtain_tokens(base: &str, username: &str, password: &str) -> Result<Secrets, CliError> {
    let client = ApiClient::new(base, "")?;
    let url = client.url("/authentication");
    let body = serde_json::to_vec(&Credentials { username, password })?;
    let response = client.send_redacted(Method::POST, &url, "", body).await?;

    let token = response
        .json::<TokenResponse>()
        .ok()
        .and_then(|r| r.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CliError::Login(format!("empty token received for {username} @ {url}")))?;
    tracing::debug!(user = username, "obtained login token");

    let secrets = client
        .send(
            Method::GET,
            &client.url("/authentication/secrets"),
            &format!("Bearer {token}"),
            None,
        )
        .await?
        .ensure_ok()?
        .json()?;
    Ok(secrets)
}

/// Interactively ask for username, password and environment.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails.
pub fn prompt_login() -> Result<(String, String, Environment), CliError> {
    let theme = ColorfulTheme::default();
    let username: String = Input::with_theme(&theme)
        .with_prompt("Username")
        .interact_text()?;
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()?;
    let choices: Vec<String> = Environment::ALL.iter().map(ToString::to_string).collect();
    let selection = Select::with_theme(&theme)
        .with_prompt("Environment")
        .items(&choices)
        .default(2)
        .interact()?;
    Ok((username, password, Environment::ALL[selection]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;

    #[test]
    fn environments_map_to_base_urls() {
        assert_eq!(
            Environment::Production.base_url(),
            "https://api.cloud-elements.com/elements/api-v2"
        );
        assert_eq!(Environment::Uk.to_string(), "uk");
        assert_eq!(Environment::ALL.len(), 4);
    }

    #[tokio::test]
    async fn login_exchanges_token_for_secrets() {
        let server = MockServer::start();
        let auth = server.mock(|when, then| {
            when.method("POST")
                .path("/authentication")
                .json_body_includes(r#"{"username":"me@example.com","password":"pw"}"#);
            then.status(200).body(r#"{"token":"t0k"}"#);
        });
        let secrets = server.mock(|when, then| {
            when.method("GET")
                .path("/authentication/secrets")
                .header("authorization", "Bearer t0k");
            then.status(200)
                .body(r#"{"userSecret":"us","organizationSecret":"os"}"#);
        });

        let result = obtain_tokens(&server.base_url(), "me@example.com", "pw")
            .await
            .expect("login");
        auth.assert();
        secrets.assert();
        assert_eq!(result.user_secret, "us");
        assert_eq!(result.organization_secret, "os");
    }

    #[tokio::test]
    async fn login_without_token_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/authentication");
            then.status(401).body(r#"{"message":"bad credentials"}"#);
        });

        let err = obtain_tokens(&server.base_url(), "me", "pw")
            .await
            .expect_err("no token");
        let expected = format!(
            "login failed: empty token received for me @ {}/authentication",
            server.base_url()
        );
        assert_eq!(err.to_string(), expected);
    }
}
