//! Formula template command implementation.

use std::io::Write;

use serde::Serialize;
use tracing::debug;

use super::{passthrough, read_input};
use crate::cli::FormulaCommands;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::{Formula, FormulaInstance};
use crate::output::{bracketed, OutputFormat, Table, TableDisplay};

/// Formula command executor.
pub struct FormulaCommand {
    client: ApiClient,
}

impl FormulaCommand {
    /// Create a new formula command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute a formula subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails or an input file is not a formula.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &FormulaCommands,
    ) -> Result<(), CliError> {
        match command {
            FormulaCommands::List => {
                let response = self.client.get("/formulas").await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let formulas: Vec<Formula> = response.ensure_ok()?.json()?;
                let list = FormulaList(with_counts(&self.client, formulas).await);
                list.write_malformed(writer)?;
                format.write(writer, &list)
            }
            FormulaCommands::Details { id } => {
                let response = self.client.get(&format!("/formulas/{id}")).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let formula: Formula = response.ensure_ok()?.json()?;
                FormulaDetail(formula).write_table(writer)
            }
            FormulaCommands::Activate { id } => {
                let path = format!("/formulas/{id}");
                let mut formula: Formula = self.client.get(&path).await?.ensure_ok()?.json()?;
                formula.active = true;
                let response = self.client.patch_json(&path, &formula).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                response.ensure_ok()?;

                let formula: Formula = self.client.get(&path).await?.ensure_ok()?.json()?;
                let instances = instance_count(&self.client, formula.id).await;
                let mut table = Table::new([
                    "ID", "Name", "Active", "Steps", "Trigger", "Instances", "API",
                ]);
                table.push([
                    formula.id.to_string(),
                    formula.name.clone(),
                    formula.active.to_string(),
                    formula.steps.len().to_string(),
                    formula.trigger_type().unwrap_or_default().to_string(),
                    instances,
                    formula.manual_api().to_string(),
                ]);
                table.write(writer)
            }
            FormulaCommands::Delete { id } => {
                let response = self.client.delete(&format!("/formulas/{id}")).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                response.ensure_ok()?;
                writeln!(writer, "Formula {id} deleted.")?;
                Ok(())
            }
            FormulaCommands::Import { file } => {
                let body = read_input(file)?;
                serde_json::from_slice::<Formula>(&body)?;
                let response = self.client.post("/formulas", body).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let formula: Formula = response.ensure_ok()?.json()?;
                writeln!(writer, "Formula template added to Platform.")?;
                FormulaDetail(formula).write_table(writer)
            }
            FormulaCommands::Instances { id } => {
                let response = self.client.get(&format!("/formulas/{id}/instances")).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let instances: Vec<FormulaInstance> = response.ensure_ok()?.json()?;
                format.write(writer, &FormulaInstanceTable(instances))
            }
        }
    }
}

/// A formula together with its instance count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaSummary {
    /// The formula.
    #[serde(flatten)]
    pub formula: Formula,
    /// Instance count, or `N/A` when it could not be fetched.
    pub instance_count: String,
}

/// Number of instances of a formula, `N/A` if the lookup fails.
pub async fn instance_count(client: &ApiClient, id: i64) -> String {
    let instances = match client.get(&format!("/formulas/{id}/instances")).await {
        Ok(response) if response.is_ok() => response.json::<Vec<FormulaInstance>>(),
        Ok(response) => Err(response.into_error()),
        Err(e) => Err(e),
    };
    match instances {
        Ok(instances) => instances.len().to_string(),
        Err(e) => {
            debug!(formula_id = id, error = %e, "instance count unavailable");
            "N/A".to_string()
        }
    }
}

/// Attach instance counts to formulas, one lookup per formula.
pub async fn with_counts(client: &ApiClient, formulas: Vec<Formula>) -> Vec<FormulaSummary> {
    let mut summaries = Vec::with_capacity(formulas.len());
    for formula in formulas {
        let instance_count = instance_count(client, formula.id).await;
        summaries.push(FormulaSummary {
            formula,
            instance_count,
        });
    }
    summaries
}

/// Formulas with one row per trigger.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FormulaList(pub Vec<FormulaSummary>);

impl FormulaList {
    /// Report formulas that have no trigger; they are left out of the table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_malformed<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        for summary in self.0.iter().filter(|s| s.formula.triggers.is_empty()) {
            writeln!(
                writer,
                "Formula {} is malformed, no trigger present",
                summary.formula.id
            )?;
        }
        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new([
            "ID",
            "Name",
            "Active",
            "Steps",
            "Instances",
            "Trigger",
            "Trigger ID",
            "Success",
            "API",
        ]);
        for summary in &self.0 {
            let formula = &summary.formula;
            for trigger in &formula.triggers {
                table.push([
                    formula.id.to_string(),
                    formula.name.clone(),
                    formula.active.to_string(),
                    formula.steps.len().to_string(),
                    summary.instance_count.clone(),
                    trigger.kind.clone(),
                    trigger.id.to_string(),
                    bracketed(&trigger.on_success),
                    formula.manual_api().to_string(),
                ]);
            }
        }
        table
    }
}

impl TableDisplay for FormulaList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}

/// The full breakdown of one formula.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FormulaDetail(pub Formula);

impl TableDisplay for FormulaDetail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let formula = &self.0;

        let mut summary = Table::new(["ID", "Name", "Active", "Steps", "Trigger"]);
        summary.push([
            formula.id.to_string(),
            formula.name.clone(),
            formula.active.to_string(),
            formula.steps.len().to_string(),
            formula.trigger_type().unwrap_or_default().to_string(),
        ]);
        summary.write(writer)?;
        writeln!(writer)?;

        let mut triggers = Table::new(["ID", "Name", "Type", "Async", "Success"]);
        for trigger in &formula.triggers {
            triggers.push([
                trigger.id.to_string(),
                trigger.name.clone(),
                trigger.kind.clone(),
                trigger.is_async.to_string(),
                bracketed(&trigger.on_success),
            ]);
        }
        triggers.write(writer)?;

        writeln!(writer, "\nSteps")?;
        let mut steps = Table::new(["ID", "Name", "Type", "Success", "Failure"]);
        for step in &formula.steps {
            steps.push([
                step.id.to_string(),
                step.name.clone(),
                step.kind.clone(),
                bracketed(&step.on_success),
                bracketed(&step.on_failure),
            ]);
        }
        steps.write(writer)?;

        writeln!(writer, "\nConfiguration")?;
        if formula.configuration.is_empty() {
            writeln!(writer, "No configuration parameters needed.")?;
        } else {
            let mut configuration = Table::new(["ID", "Name", "Key", "Type", "Required"]);
            for config in &formula.configuration {
                configuration.push([
                    config.id.to_string(),
                    config.name.clone(),
                    config.key.clone(),
                    config.kind.clone(),
                    config.required.to_string(),
                ]);
            }
            configuration.write(writer)?;
        }

        if !formula.api.is_empty() {
            writeln!(writer, "\n{} -H 'Elements-Formula-Instance-Id: '", formula.api)?;
        }
        Ok(())
    }
}

/// Instances of one formula.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FormulaInstanceTable(pub Vec<FormulaInstance>);

impl FormulaInstanceTable {
    fn table(&self) -> Table {
        let mut table = Table::new([
            "ID",
            "Instance",
            "Active",
            "Formula",
            "Configuration",
            "Created",
        ]);
        for instance in &self.0 {
            table.push([
                instance.id.to_string(),
                instance.name.clone(),
                instance.active.to_string(),
                format!("{} {}", instance.formula.id, instance.formula.name),
                instance.configuration_pairs(),
                instance.created_date.clone(),
            ]);
        }
        table
    }
}

impl TableDisplay for FormulaInstanceTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}
