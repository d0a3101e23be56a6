//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::fanout::DEFAULT_WORKERS;

/// cectl - command-line client for the Cloud Elements platform.
#[derive(Parser, Debug, Clone)]
#[command(name = "cectl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Profile to use.
    #[arg(long, global = true, env = "CECTL_PROFILE", default_value = "default")]
    pub profile: String,

    /// Print the raw JSON response.
    #[arg(short = 'j', long, global = true, conflicts_with = "csv")]
    pub json: bool,

    /// Log the equivalent curl command of every request.
    #[arg(short = 'c', long, global = true)]
    pub curl: bool,

    /// Output as CSV.
    #[arg(long, global = true)]
    pub csv: bool,

    /// Config file, defaults to `$HOME/.config/ce/cectl.toml`.
    #[arg(long, global = true, env = "CECTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format selected by the global flags.
    pub const fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else if self.csv {
            Format::Csv
        } else {
            Format::Table
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// Raw JSON.
    Json,
    /// Comma separated values.
    Csv,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage profiles.
    Profiles {
        /// Profile subcommand to execute.
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Manage Elements on the platform.
    Elements {
        /// Element subcommand to execute.
        #[command(subcommand)]
        command: ElementCommands,
    },

    /// Manage Element Instances.
    Instances {
        /// Instance subcommand to execute.
        #[command(subcommand)]
        command: InstanceCommands,
    },

    /// Manage Formula templates.
    Formulas {
        /// Formula subcommand to execute.
        #[command(subcommand)]
        command: FormulaCommands,
    },

    /// Manage Formula Instances.
    #[command(name = "formula-instances")]
    FormulaInstances {
        /// Formula instance subcommand to execute.
        #[command(subcommand)]
        command: FormulaInstanceCommands,
    },

    /// Manage Formula Instance executions.
    Executions {
        /// Execution subcommand to execute.
        #[command(subcommand)]
        command: ExecutionCommands,
    },

    /// Manage scheduled jobs.
    Jobs {
        /// Job subcommand to execute.
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Manage Common Resources.
    Resources {
        /// Resource subcommand to execute.
        #[command(subcommand)]
        command: ResourceCommands,
    },

    /// Manage Transformations.
    Transformations {
        /// Transformation subcommand to execute.
        #[command(subcommand)]
        command: TransformationCommands,
    },

    /// List Hubs.
    Hubs {
        /// Hub subcommand to execute.
        #[command(subcommand)]
        command: HubCommands,
    },

    /// List account users.
    Users {
        /// User subcommand to execute.
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Summarize this account.
    Info {
        /// Include the full formulas table.
        #[arg(value_enum)]
        scope: Option<InfoScope>,
    },

    /// Query API metrics.
    Metrics {
        /// Metrics subcommand to execute.
        #[command(subcommand)]
        command: MetricsCommands,
    },

    /// Manage account branding.
    Branding {
        /// Branding subcommand to execute.
        #[command(subcommand)]
        command: BrandingCommands,
    },

    /// Metadata about Elements on the platform.
    Intelligence {
        /// Only show elements with this key (case-insensitive).
        key: Option<String>,

        /// Sort order.
        #[arg(long, value_enum)]
        order: Option<IntelligenceOrder>,
    },

    /// Export integration assets.
    Molecules {
        /// Molecules subcommand to execute.
        #[command(subcommand)]
        command: MoleculeCommands,
    },

    /// Print the version.
    Version,
}

/// Profile subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommands {
    /// Add a new profile.
    Add {
        /// Profile name.
        name: String,

        /// Log in with username and password to obtain the tokens.
        #[arg(short, long)]
        login: bool,
    },

    /// List profiles.
    List {
        /// Show a table of profiles and base URLs.
        #[arg(short, long)]
        long: bool,
    },

    /// Make a profile the default.
    Set {
        /// Profile name.
        name: String,
    },

    /// Print shell exports for the current profile.
    Env,
}

/// Element subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ElementCommands {
    /// List Elements.
    List {
        /// Only show the Element with this key.
        key: Option<String>,

        /// Sort order; defaults to ID.
        #[arg(long, value_enum)]
        order: Option<ElementOrder>,

        /// Output JSON for the ROI calculator.
        #[arg(long)]
        roi: bool,
    },

    /// Output the OpenAPI documentation of an Element.
    Docs {
        /// Element ID or key.
        element: String,
    },

    /// Display the metadata of an Element.
    Metadata {
        /// Element ID or key.
        element: String,
    },

    /// Export the Element JSON.
    Export {
        /// Element ID or key.
        element: String,
    },

    /// List the Instances of an Element.
    Instances {
        /// Element key; all Instances when omitted.
        key: Option<String>,
    },

    /// Import an Element JSON file.
    Import {
        /// Path to the Element JSON.
        file: PathBuf,
    },

    /// Show the Transformations of an Element.
    Transformations {
        /// Element ID or key.
        element: String,
    },

    /// Validate the models of an Element.
    Validate {
        /// Element ID or key.
        element: String,
    },

    /// Delete an Element.
    Delete {
        /// Element ID.
        id: String,
    },
}

/// Element list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ElementOrder {
    /// Case-insensitive name.
    Name,
    /// Hub.
    Hub,
}

/// Instance subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum InstanceCommands {
    /// List Element Instances.
    List,

    /// Show details of an Instance.
    Details {
        /// Instance ID.
        id: String,
    },

    /// Output the OpenAPI documentation of an Instance.
    Docs {
        /// Instance ID.
        id: String,
    },

    /// Show the Transformations mapped to an Instance.
    Transformations {
        /// Instance ID.
        id: String,
    },

    /// Show the object definitions of an Instance.
    Definitions {
        /// Instance ID.
        id: String,
    },

    /// Show the documentation of one operation of an Instance.
    Operation {
        /// Instance ID.
        id: String,
        /// Operation name.
        name: String,
    },

    /// Delete an Instance.
    Delete {
        /// Instance ID.
        id: String,
    },

    /// Ping every Instance and report failures.
    Test {
        /// Delete the Instances that fail.
        #[arg(long)]
        delete: bool,
    },
}

/// Formula subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum FormulaCommands {
    /// List Formulas.
    List,

    /// Show details of a Formula.
    Details {
        /// Formula ID.
        id: String,
    },

    /// Activate a Formula.
    Activate {
        /// Formula ID.
        id: String,
    },

    /// Delete a Formula.
    Delete {
        /// Formula ID.
        id: String,
    },

    /// Import a Formula JSON file.
    Import {
        /// Path to the Formula JSON.
        file: PathBuf,
    },

    /// List the Instances of a Formula.
    Instances {
        /// Formula ID.
        id: String,
    },
}

/// Formula instance subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum FormulaInstanceCommands {
    /// List all Formula Instances.
    List,

    /// Create a Formula Instance.
    Create {
        /// Formula ID.
        formula_id: String,

        /// Instance name.
        name: Option<String>,

        /// Configuration as a JSON object.
        #[arg(long)]
        configuration: Option<String>,
    },

    /// Trigger a Formula Instance.
    Trigger {
        /// Formula Instance ID.
        id: String,

        /// Trigger payload as JSON.
        #[arg(short, long)]
        data: Option<String>,

        /// Print only the execution ID.
        #[arg(short, long)]
        text: bool,
    },

    /// Delete a Formula Instance.
    Delete {
        /// Formula Instance ID.
        id: String,
    },
}

/// Execution subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ExecutionCommands {
    /// List the executions of a Formula Instance.
    List {
        /// Formula Instance ID.
        instance_id: String,

        /// Only show the first N executions.
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        top: Option<u32>,
    },

    /// Cancel an execution.
    Cancel {
        /// Execution ID.
        id: String,
    },

    /// Retry an execution.
    Retry {
        /// Execution ID.
        id: String,
    },
}

/// Job subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum JobCommands {
    /// List jobs.
    List,

    /// Create a job from a JSON file.
    Create {
        /// Job JSON file.
        #[arg(long)]
        file: PathBuf,
    },

    /// Delete a job, or all jobs.
    Delete {
        /// Job ID.
        #[arg(required_unless_present = "all")]
        id: Option<String>,

        /// Delete every job.
        #[arg(long, conflicts_with = "id")]
        all: bool,

        /// Concurrent deletes when using `--all`.
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
}

/// Common resource subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ResourceCommands {
    /// List Common Resources.
    List,

    /// Show the definition of a Common Resource.
    Definition {
        /// Resource name.
        name: String,
    },

    /// Add a Common Resource from a JSON file.
    Add {
        /// Resource name.
        name: String,
        /// Path to the resource JSON.
        file: PathBuf,
    },
}

/// Transformation subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TransformationCommands {
    /// List Transformations.
    List {
        /// Include the associated Elements.
        #[arg(long)]
        with_elements: bool,
    },

    /// Associate a Transformation with an Element.
    Associate {
        /// Element ID or key.
        element: String,
        /// Path to the Transformation JSON.
        file: PathBuf,
        /// Resource name, overriding `objectName` in the file.
        name: Option<String>,
    },

    /// Remove a Transformation association from an Element.
    Delete {
        /// Resource name.
        resource: String,
        /// Element ID or key.
        element: String,
    },
}

/// Hub subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum HubCommands {
    /// List Hubs.
    List,
}

/// User subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum UserCommands {
    /// List users and their roles.
    List,
}

/// Scope of the `info` summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InfoScope {
    /// Include the formulas table.
    All,
}

/// Metrics subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum MetricsCommands {
    /// API call metrics for accounts, organizations or customers.
    Api {
        /// Account IDs.
        #[arg(long, value_delimiter = ',')]
        accounts: Vec<String>,

        /// Organization IDs.
        #[arg(long, value_delimiter = ',')]
        orgs: Vec<String>,

        /// Customer IDs.
        #[arg(long, value_delimiter = ',')]
        customers: Vec<String>,
    },
}

/// Branding subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum BrandingCommands {
    /// Show the branding.
    Get,

    /// Set the branding from a file or one attribute.
    Set {
        /// Branding JSON file.
        #[arg(long, conflicts_with_all = ["attribute", "value"])]
        file: Option<PathBuf>,

        /// Attribute name.
        #[arg(requires = "value")]
        attribute: Option<String>,

        /// Attribute value.
        value: Option<String>,
    },

    /// Reset the branding to the defaults.
    Reset,
}

/// Intelligence ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IntelligenceOrder {
    /// Customer count, highest first.
    Customers,
    /// Hub.
    Hub,
    /// Name.
    Name,
    /// Instance count, highest first.
    Instances,
    /// Traffic, highest first.
    Traffic,
    /// API type.
    Api,
    /// Authentication types.
    Authn,
}

/// Molecules subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum MoleculeCommands {
    /// Export assets to files.
    Export {
        /// Asset kind; all kinds when omitted.
        #[arg(value_enum)]
        kind: Option<MoleculeKind>,

        /// Write resources and transformations as one combined file.
        #[arg(long)]
        combined: bool,

        /// Target directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

/// Exportable asset kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MoleculeKind {
    /// Formula templates.
    Formulas,
    /// Common resources.
    Resources,
    /// Transformations.
    Transformations,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["cectl", "hubs", "list"]);
        assert_eq!(cli.profile, "default");
        assert_eq!(cli.format(), Format::Table);
        assert!(!cli.curl);
        assert!(matches!(
            cli.command,
            Commands::Hubs {
                command: HubCommands::List
            }
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["cectl", "elements", "list", "--profile", "staging", "-j", "-c"]);
        assert_eq!(cli.profile, "staging");
        assert_eq!(cli.format(), Format::Json);
        assert!(cli.curl);
    }

    #[test]
    fn json_and_csv_conflict() {
        let result = Cli::try_parse_from(["cectl", "--json", "--csv", "hubs", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn csv_format() {
        let cli = Cli::parse_from(["cectl", "--csv", "intelligence", "sfdc", "--order", "traffic"]);
        assert_eq!(cli.format(), Format::Csv);
        match cli.command {
            Commands::Intelligence { key, order } => {
                assert_eq!(key.as_deref(), Some("sfdc"));
                assert_eq!(order, Some(IntelligenceOrder::Traffic));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn jobs_delete_all_defaults_to_eight_workers() {
        let cli = Cli::parse_from(["cectl", "jobs", "delete", "--all"]);
        match cli.command {
            Commands::Jobs {
                command: JobCommands::Delete { id, all, workers },
            } => {
                assert!(id.is_none());
                assert!(all);
                assert_eq!(workers, 8);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn jobs_delete_requires_id_or_all() {
        assert!(Cli::try_parse_from(["cectl", "jobs", "delete"]).is_err());
        assert!(Cli::try_parse_from(["cectl", "jobs", "delete", "x", "--all"]).is_err());
    }

    #[test]
    fn executions_top_must_be_positive() {
        assert!(Cli::try_parse_from(["cectl", "executions", "list", "5", "--top", "0"]).is_err());
        let cli = Cli::parse_from(["cectl", "executions", "list", "5", "-t", "3"]);
        assert!(matches!(
            cli.command,
            Commands::Executions {
                command: ExecutionCommands::List { top: Some(3), .. }
            }
        ));
    }

    #[test]
    fn metrics_accepts_comma_lists() {
        let cli = Cli::parse_from(["cectl", "metrics", "api", "--accounts", "1,2"]);
        match cli.command {
            Commands::Metrics {
                command: MetricsCommands::Api { accounts, orgs, .. },
            } => {
                assert_eq!(accounts, vec!["1", "2"]);
                assert!(orgs.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn formula_instances_name() {
        let cli = Cli::parse_from(["cectl", "formula-instances", "trigger", "9", "-t"]);
        assert!(matches!(
            cli.command,
            Commands::FormulaInstances {
                command: FormulaInstanceCommands::Trigger { text: true, .. }
            }
        ));
    }
}
