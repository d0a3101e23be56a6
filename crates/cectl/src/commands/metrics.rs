//! API metrics command implementation.

use std::io::Write;

use crate::cli::MetricsCommands;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::output::write_raw;

const ONE_SCOPE: &str = r#"must have one of either "--accounts", "--orgs", or "--customers" flag"#;

/// Metrics command executor.
pub struct MetricsCommand {
    client: ApiClient,
}

impl MetricsCommand {
    /// Create a new metrics command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute a metrics subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one id list is given, or if the
    /// request fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        command: &MetricsCommands,
    ) -> Result<(), CliError> {
        match command {
            MetricsCommands::Api {
                accounts,
                orgs,
                customers,
            } => {
                let query = api_query(accounts, orgs, customers)?;
                let response = self.client.get_with_query("/metrics/api", &query).await?;
                write_raw(writer, response.ensure_ok()?.body())
            }
        }
    }
}

/// Build `accountIds[]=…`, `orgIds[]=…` or `customerIds[]=…` pairs.
///
/// # Errors
///
/// Returns [`CliError::InvalidArgument`] unless exactly one list is non-empty.
pub fn api_query(
    accounts: &[String],
    orgs: &[String],
    customers: &[String],
) -> Result<Vec<(String, String)>, CliError> {
    let scopes: Vec<(&str, &[String])> = [
        ("accountIds[]", accounts),
        ("orgIds[]", orgs),
        ("customerIds[]", customers),
    ]
    .into_iter()
    .filter(|(_, ids)| !ids.is_empty())
    .collect();

    match scopes.as_slice() {
        [(param, ids)] => Ok(ids
            .iter()
            .map(|id| ((*param).to_string(), id.clone()))
            .collect()),
        _ => Err(CliError::invalid(ONE_SCOPE)),
    }
}
