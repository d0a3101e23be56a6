//! Version command implementation.

use std::io::Write;

use crate::error::CliError;

/// Release codename.
pub const CODENAME: &str = "stratocumulus";

/// Version command executor.
pub struct VersionCommand;

impl VersionCommand {
    /// Print `cectl version <semver> <codename>`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn execute<W: Write>(writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "cectl version {} {CODENAME}",
            env!("CARGO_PKG_VERSION")
        )?;
        Ok(())
    }
}
