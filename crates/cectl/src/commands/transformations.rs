//! Transformation command implementation.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{passthrough, read_input};
use crate::cli::TransformationCommands;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::{AccountElement, Transformation, Transformations};
use crate::output::{bracketed, pretty_json, write_raw, OutputFormat, Table, TableDisplay};

/// Transformation command executor.
pub struct TransformationCommand {
    client: ApiClient,
}

impl TransformationCommand {
    /// Create a new transformation command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute a transformation subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if an element cannot be resolved, a request fails or
    /// the association to delete does not exist.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &TransformationCommands,
    ) -> Result<(), CliError> {
        match command {
            TransformationCommands::List { with_elements } => {
                let response = self.client.get("/transformations").await?;
                let response = response.ensure_ok()?;
                if format.is_json() {
                    writeln!(writer, "{}", pretty_json(response.body(), 4)?)?;
                    return Ok(());
                }
                let transformations: Transformations = response.json()?;
                let elements = if *with_elements {
                    Some(associated_elements(&self.client, transformations.keys()).await?)
                } else {
                    None
                };
                format.write(
                    writer,
                    &TransformationList {
                        transformations,
                        elements,
                    },
                )
            }
            TransformationCommands::Associate {
                element,
                file,
                name,
            } => {
                let id = self.client.element_id(element).await?;
                let mut body: Value = serde_json::from_slice(&read_input(file)?)?;
                let transformation: Transformation = serde_json::from_value(body.clone())?;
                let Some(fields) = body.as_object_mut() else {
                    return Err(CliError::invalid("Transformation file must hold a JSON object"));
                };
                let object_name = match name {
                    Some(name) => {
                        fields.insert("objectName".into(), Value::String(name.clone()));
                        name.clone()
                    }
                    None => transformation.object_name,
                };
                if object_name.is_empty() {
                    return Err(CliError::invalid(
                        "Transformation has no objectName; provide a resource name",
                    ));
                }
                let response = self
                    .client
                    .post_json(
                        &format!("/elements/{id}/transformations/{object_name}"),
                        &body,
                    )
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                if !response.is_ok() {
                    writeln!(writer, "{}", response.status())?;
                }
                write_raw(writer, response.body())
            }
            TransformationCommands::Delete { resource, element } => {
                let id = self.client.element_id(element).await?;
                let path = format!("/elements/{id}/transformations");
                let existing: Transformations = self.client.get(&path).await?.ensure_ok()?.json()?;
                if !existing.contains_key(resource) {
                    return Err(CliError::invalid(format!(
                        "Cannot find Transformation associated with Resource {resource} on Element {element}"
                    )));
                }
                let response = self.client.delete(&format!("{path}/{resource}")).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                response.ensure_ok()?;
                writeln!(
                    writer,
                    "{resource} Transformation association from {element} deleted"
                )?;
                Ok(())
            }
        }
    }
}

/// Look up the elements associated with each transformation.
///
/// A failed lookup leaves the transformation without elements.
///
/// # Errors
///
/// Returns an error only if the platform cannot be reached.
pub async fn associated_elements<'a, I>(
    client: &ApiClient,
    names: I,
) -> Result<BTreeMap<String, Vec<AccountElement>>, CliError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut associated = BTreeMap::new();
    for name in names {
        let response = client.get(&format!("/transformations/{name}/elements")).await?;
        let elements = if response.is_ok() {
            response.json::<Vec<AccountElement>>().unwrap_or_else(|e| {
                debug!(resource = %name, error = %e, "undecodable elements");
                Vec::new()
            })
        } else {
            debug!(resource = %name, status = %response.status(), "no elements");
            Vec::new()
        };
        associated.insert(name.clone(), elements);
    }
    Ok(associated)
}

/// Transformations, optionally with the elements each is associated with.
#[derive(Debug, Clone, Serialize)]
pub struct TransformationList {
    /// Transformations keyed by resource name.
    pub transformations: Transformations,
    /// Elements per resource, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<BTreeMap<String, Vec<AccountElement>>>,
}

impl TransformationList {
    fn table(&self) -> Table {
        let mut headers = vec!["Resource", "Level", "#", "Fields"];
        if self.elements.is_some() {
            headers.extend(["#", "Elements"]);
        }
        let mut table = Table::new(headers);
        for (name, transformation) in &self.transformations {
            let paths: Vec<&str> = transformation
                .fields
                .iter()
                .map(|f| f.path.as_str())
                .collect();
            let mut row = vec![
                name.clone(),
                transformation.level.clone(),
                transformation.fields.len().to_string(),
                bracketed(&paths),
            ];
            if let Some(elements) = &self.elements {
                let keys: Vec<&str> = elements
                    .get(name)
                    .map(|list| list.iter().map(|a| a.element.key.as_str()).collect())
                    .unwrap_or_default();
                row.push(keys.len().to_string());
                row.push(bracketed(&keys));
            }
            table.push(row);
        }
        table
    }
}

impl TableDisplay for TransformationList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}
