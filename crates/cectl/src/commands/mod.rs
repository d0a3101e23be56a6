//! CLI command implementations.
//!
//! Each submodule implements one command noun:
//! - [`profiles`] - Profile management, offline
//! - [`elements`], [`instances`] - Elements and their instances
//! - [`formulas`], [`formula_instances`], [`executions`] - Workflows
//! - [`jobs`] - Scheduled jobs
//! - [`resources`], [`transformations`] - Canonical data models
//! - [`hubs`], [`users`], [`info`] - Account overview
//! - [`metrics`], [`branding`], [`intelligence`], [`molecules`] - Extras

pub mod branding;
pub mod elements;
pub mod executions;
pub mod formula_instances;
pub mod formulas;
pub mod hubs;
pub mod info;
pub mod instances;
pub mod intelligence;
pub mod jobs;
pub mod metrics;
pub mod molecules;
pub mod profiles;
pub mod resources;
pub mod transformations;
pub mod users;
pub mod version;

pub use branding::BrandingCommand;
pub use elements::ElementCommand;
pub use executions::ExecutionCommand;
pub use formula_instances::FormulaInstanceCommand;
pub use formulas::FormulaCommand;
pub use hubs::HubCommand;
pub use info::InfoCommand;
pub use instances::InstanceCommand;
pub use intelligence::IntelligenceCommand;
pub use jobs::JobCommand;
pub use metrics::MetricsCommand;
pub use molecules::MoleculeCommand;
pub use profiles::ProfileCommand;
pub use resources::ResourceCommand;
pub use transformations::TransformationCommand;
pub use users::UserCommand;
pub use version::VersionCommand;

use std::io::Write;
use std::path::Path;

use crate::client::ApiResponse;
use crate::error::CliError;
use crate::output::{write_raw, OutputFormat};

/// In JSON mode, print the raw body and report that the response is handled.
pub(crate) fn passthrough<W: Write>(
    writer: &mut W,
    format: &OutputFormat,
    response: &ApiResponse,
) -> Result<bool, CliError> {
    if format.is_json() {
        write_raw(writer, response.body())?;
        return Ok(true);
    }
    Ok(false)
}

/// Read a user supplied file.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::InputFile {
        path: path.display().to_string(),
        source,
    })
}

/// Print `<message>`, `ID: <id> (<requestId>)` and the status of a failed call.
pub(crate) fn write_failure<W: Write>(
    writer: &mut W,
    id: &str,
    response: &ApiResponse,
) -> Result<(), CliError> {
    let envelope = response.error_envelope().unwrap_or_default();
    writeln!(writer, "{}", envelope.message)?;
    writeln!(writer, "ID: {id} ({})", envelope.request_id)?;
    writeln!(writer, "{}", response.status())?;
    Ok(())
}
