//! Account users and their roles.

use std::io::Write;

use serde::Serialize;
use tracing::debug;

use super::passthrough;
use crate::cli::UserCommands;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::{Role, User};
use crate::output::{OutputFormat, Table, TableDisplay};

/// User command executor.
pub struct UserCommand {
    client: ApiClient,
}

impl UserCommand {
    /// Create a new user command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute a user subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if listing the users fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &UserCommands,
    ) -> Result<(), CliError> {
        match command {
            UserCommands::List => {
                let response = self.client.get("/users").await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let users: Vec<User> = response.ensure_ok()?.json()?;
                let users = with_roles(&self.client, users).await?;
                format.write(writer, &UserList(users))?;
            }
        }
        Ok(())
    }
}

/// List users and look up the roles of each.
///
/// # Errors
///
/// Returns an error if the user listing fails. Failed role lookups leave
/// the user without roles.
pub async fn load_users(client: &ApiClient) -> Result<Vec<User>, CliError> {
    let users: Vec<User> = client.get("/users").await?.ensure_ok()?.json()?;
    with_roles(client, users).await
}

async fn with_roles(client: &ApiClient, mut users: Vec<User>) -> Result<Vec<User>, CliError> {
    for user in &mut users {
        let response = client.get(&format!("/users/{}/roles", user.id)).await?;
        if !response.is_ok() {
            debug!(user_id = user.id, status = %response.status(), "no roles");
            continue;
        }
        match response.json::<Vec<Role>>() {
            Ok(roles) => user.roles = roles,
            Err(e) => debug!(user_id = user.id, error = %e, "undecodable roles"),
        }
    }
    Ok(users)
}

/// Users as a table; the roles column only appears when some user has roles.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct UserList(pub Vec<User>);

impl UserList {
    fn table(&self) -> Table {
        let with_roles = self.0.iter().any(|u| !u.roles.is_empty());
        let mut headers = vec!["ID", "Name", "EMail", "Last Login", "Active"];
        if with_roles {
            headers.push("Roles");
        }
        let mut table = Table::new(headers);
        for user in &self.0 {
            let name = if user.full_name.is_empty() {
                format!("{} {}", user.first_name, user.last_name).trim().to_string()
            } else {
                user.full_name.clone()
            };
            let mut row = vec![
                user.id.to_string(),
                name,
                user.email.clone(),
                user.last_login_date.clone(),
                user.active.to_string(),
            ];
            if with_roles {
                row.push(user.role_keys());
            }
            table.push(row);
        }
        table
    }
}

impl TableDisplay for UserList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}
