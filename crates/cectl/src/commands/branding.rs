//! Account branding command implementation.

use std::io::Write;

use reqwest::StatusCode;
use serde_json::{Map, Value};

use super::{passthrough, read_input};
use crate::cli::BrandingCommands;
use crate::client::{ApiClient, ApiResponse};
use crate::error::CliError;
use crate::output::{pretty_json, OutputFormat};

const BRANDING: &str = "/customers/branding";

/// Branding command executor.
pub struct BrandingCommand {
    client: ApiClient,
}

impl BrandingCommand {
    /// Create a new branding command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute a branding subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object or a request fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &BrandingCommands,
    ) -> Result<(), CliError> {
        let response = match command {
            BrandingCommands::Get => self.client.get(BRANDING).await?,
            BrandingCommands::Set {
                file,
                attribute,
                value,
            } => {
                let body = match (file, attribute, value) {
                    (Some(file), _, _) => {
                        let body = read_input(file)?;
                        serde_json::from_slice::<Map<String, Value>>(&body)?;
                        body
                    }
                    (None, Some(attribute), Some(value)) => {
                        let mut branding = self.current().await?;
                        branding.insert(attribute.clone(), Value::String(value.clone()));
                        serde_json::to_vec(&branding)?
                    }
                    _ => {
                        return Err(CliError::invalid(
                            "provide --file or an attribute and a value",
                        ))
                    }
                };
                self.client.put(BRANDING, Some(body)).await?
            }
            BrandingCommands::Reset => self.client.delete(BRANDING).await?,
        };
        if passthrough(writer, format, &response)? {
            return Ok(());
        }
        write_branding(writer, response)
    }

    /// The current branding, empty when none is set.
    async fn current(&self) -> Result<Map<String, Value>, CliError> {
        let response = self.client.get(BRANDING).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Map::new());
        }
        response.ensure_ok()?.json()
    }
}

fn write_branding<W: Write>(writer: &mut W, response: ApiResponse) -> Result<(), CliError> {
    if response.status() == StatusCode::NOT_FOUND {
        writeln!(writer, "No branding on this account.")?;
        return Ok(());
    }
    let response = response.ensure_ok()?;
    if !response.body().iter().all(u8::is_ascii_whitespace) {
        writeln!(writer, "{}", pretty_json(response.body(), 2)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{client, json, table, text};
    use httpmock::MockServer;

    fn command(server: &MockServer) -> BrandingCommand {
        BrandingCommand::new(client(server))
    }

    #[tokio::test]
    async fn get_pretty_prints_two_spaces() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/customers/branding");
            then.status(200).body(r##"{"headerColor":"#fff","logo":"x.png"}"##);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &BrandingCommands::Get)
            .await
            .expect("get");
        assert_eq!(
            text(buf),
            "{\n  \"headerColor\": \"#fff\",\n  \"logo\": \"x.png\"\n}\n"
        );
    }

    #[tokio::test]
    async fn get_json_is_raw() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/customers/branding");
            then.status(200).body(r#"{"logo":"x.png"}"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &json(), &BrandingCommands::Get)
            .await
            .expect("get");
        assert_eq!(text(buf), "{\"logo\":\"x.png\"}\n");
    }

    #[tokio::test]
    async fn missing_branding() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("DELETE").path("/customers/branding");
            then.status(404).body(r#"{"message":"not found"}"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &BrandingCommands::Reset)
            .await
            .expect("reset");
        assert_eq!(text(buf), "No branding on this account.\n");
    }

    #[tokio::test]
    async fn set_attribute_merges_into_current() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/customers/branding");
            then.status(200).body(r#"{"logo":"x.png"}"#);
        });
        let put = server.mock(|when, then| {
            when.method("PUT")
                .path("/customers/branding")
                .json_body_includes(r##"{"logo": "x.png", "headerColor": "#000"}"##);
            then.status(200).body(r##"{"logo":"x.png","headerColor":"#000"}"##);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(
                &mut buf,
                &table(),
                &BrandingCommands::Set {
                    file: None,
                    attribute: Some("headerColor".into()),
                    value: Some("#000".into()),
                },
            )
            .await
            .expect("set");
        put.assert();
        assert!(text(buf).contains("\"headerColor\": \"#000\""));
    }

    #[tokio::test]
    async fn set_from_file() {
        let server = MockServer::start();
        let put = server.mock(|when, then| {
            when.method("PUT")
                .path("/customers/branding")
                .json_body_includes(r#"{"logo": "y.png"}"#);
            then.status(200).body(r#"{"logo":"y.png"}"#);
        });

        let file = tempfile::NamedTempFile::new().expect("tempfile");
        std::fs::write(file.path(), r#"{"logo": "y.png"}"#).expect("write");

        let mut buf = Vec::new();
        command(&server)
            .execute(
                &mut buf,
                &table(),
                &BrandingCommands::Set {
                    file: Some(file.path().to_path_buf()),
                    attribute: None,
                    value: None,
                },
            )
            .await
            .expect("set");
        put.assert();
    }

    #[tokio::test]
    async fn set_needs_input() {
        let server = MockServer::start();
        let mut buf = Vec::new();
        let err = command(&server)
            .execute(
                &mut buf,
                &table(),
                &BrandingCommands::Set {
                    file: None,
                    attribute: None,
                    value: None,
                },
            )
            .await
            .expect_err("nothing to set");
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
