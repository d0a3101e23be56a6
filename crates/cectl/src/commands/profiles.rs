//! Profile command implementation.
//!
//! Profiles are managed offline; only `add --login` talks to the platform.

use std::io::Write;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use serde::Serialize;

use crate::cli::ProfileCommands;
use crate::config::{Profile, ProfileStore};
use crate::error::CliError;
use crate::login::{obtain_tokens, prompt_login};
use crate::output::{Message, OutputFormat, Table, TableDisplay};

/// Profile command executor.
pub struct ProfileCommand {
    store: ProfileStore,
    current: String,
}

impl ProfileCommand {
    /// Create a new profile command over a loaded store.
    #[must_use]
    pub fn new(store: ProfileStore, current: impl Into<String>) -> Self {
        Self {
            store,
            current: current.into(),
        }
    }

    /// Execute a profile subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if a profile is missing or already exists, a prompt
    /// fails or the config file cannot be written.
    pub async fn execute<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ProfileCommands,
    ) -> Result<(), CliError> {
        match command {
            ProfileCommands::Add { name, login } => {
                writeln!(writer, "profile: {name}")?;
                if self.store.contains(name) {
                    return Err(CliError::ProfileExists(name.clone()));
                }
                let profile = if *login {
                    let (username, password, environment) = prompt_login()?;
                    let base = environment.base_url();
                    let secrets = obtain_tokens(base, &username, &password).await?;
                    Profile::new(base, secrets.user_secret, secrets.organization_secret)
                } else {
                    prompt_profile()?
                };
                self.add(writer, format, name, profile)
            }
            ProfileCommands::List { long } => self.list(writer, format, *long),
            ProfileCommands::Set { name } => self.set(writer, format, name),
            ProfileCommands::Env => {
                let profile = self.store.get(&self.current)?;
                write_env(writer, profile)
            }
        }
    }

    /// Store a new profile and save the config file.
    fn add<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        name: &str,
        profile: Profile,
    ) -> Result<(), CliError> {
        self.store.add(name, profile)?;
        self.store.save()?;
        format.write(writer, &Message::info(format!("Added profile {name}")))
    }

    fn list<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        long: bool,
    ) -> Result<(), CliError> {
        let current = self.store.get(&self.current).ok();
        let listing = ProfileList {
            current: self.current.clone(),
            label: current.and_then(|p| p.label.clone()),
            base: current.map(|p| p.base.clone()),
            long,
            profiles: self
                .store
                .iter()
                .map(|(name, profile)| ProfileRow {
                    name: name.to_string(),
                    base: profile.base.clone(),
                })
                .collect(),
        };
        format.write(writer, &listing)
    }

    fn set<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        name: &str,
    ) -> Result<(), CliError> {
        if !self.store.contains(name) {
            let missing = CliError::ProfileNotFound {
                name: name.to_string(),
                path: self.store.path().to_path_buf(),
            };
            writeln!(writer, "{missing}")?;
            writeln!(writer, "Valid profiles: {}", self.store.names().join(", "))?;
            return Err(CliError::invalid(format!(
                "Cannot set {name} as default profile."
            )));
        }
        let profile = self.store.set_default(name)?.clone();
        self.store.save()?;
        format.write(
            writer,
            &Message::info(format!(
                "Default profile set to {name}\nbase: {}\nlabel: {}",
                profile.base,
                profile.label.unwrap_or_default()
            )),
        )
    }
}

/// Ask for base URI and both secrets.
fn prompt_profile() -> Result<Profile, CliError> {
    let theme = ColorfulTheme::default();
    let base: String = Input::with_theme(&theme)
        .with_prompt("base URI")
        .interact_text()?;
    let user: String = Input::with_theme(&theme)
        .with_prompt("user token")
        .interact_text()?;
    let org: String = Input::with_theme(&theme)
        .with_prompt("org token")
        .interact_text()?;
    Ok(Profile::new(base.trim(), user.trim(), org.trim()))
}

fn write_env<W: Write>(writer: &mut W, profile: &Profile) -> Result<(), CliError> {
    writeln!(writer, "export CE_AUTH=\"{}\"", profile.auth())?;
    writeln!(writer, "export CE_BASE={}", profile.base)?;
    writeln!(writer, "export CE_ORG=\"{}\"", profile.org)?;
    writeln!(writer, "export CE_USER=\"{}\"", profile.user)?;
    Ok(())
}

/// One configured profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRow {
    /// Profile name.
    pub name: String,
    /// Base URL.
    pub base: String,
}

/// The current profile and all configured ones.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileList {
    /// Name of the profile in use.
    pub current: String,
    /// Label of the profile in use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Base URL of the profile in use, if it exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip)]
    long: bool,
    /// All profiles, sorted by name.
    pub profiles: Vec<ProfileRow>,
}

impl ProfileList {
    fn table(&self) -> Table {
        let mut table = Table::new(["Profile", "Base URL"]);
        for row in &self.profiles {
            table.push([row.name.clone(), row.base.clone()]);
        }
        table
    }
}

impl TableDisplay for ProfileList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        match &self.label {
            Some(label) => writeln!(writer, "profile: {} ({label})", self.current)?,
            None => writeln!(writer, "profile: {}", self.current)?,
        }
        writeln!(writer, "base: {}", self.base.as_deref().unwrap_or_default())?;
        if self.long {
            writeln!(writer, "{} profiles", self.profiles.len())?;
            self.table().write(writer)
        } else {
            let names: Vec<&str> = self.profiles.iter().map(|p| p.name.as_str()).collect();
            writeln!(writer, "Valid profiles: {}", names.join(", "))?;
            Ok(())
        }
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}
