//! Export of integration assets ("molecules") to files.
//!
//! Formulas, common resources and transformations are written as individual
//! JSON files under kind-specific directories. With `--combined`, resources
//! and transformations are bundled into a single `.combined.vdr.json`
//! document instead.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::transformations::associated_elements;
use crate::cli::{MoleculeCommands, MoleculeKind};
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::{AccountElement, Transformations};

/// Molecule command executor.
pub struct MoleculeCommand {
    client: ApiClient,
    profile: String,
}

/// Resources and transformations bundled into one document.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct VdrBundle {
    object_definitions: BTreeMap<String, Value>,
    transformations: BTreeMap<String, Value>,
}

impl MoleculeCommand {
    /// Create a new molecule command for the named profile.
    #[must_use]
    pub fn new(client: ApiClient, profile: impl Into<String>) -> Self {
        Self {
            client,
            profile: profile.into(),
        }
    }

    /// Execute a molecules subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails or a file cannot be written.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        command: &MoleculeCommands,
    ) -> Result<(), CliError> {
        match command {
            MoleculeCommands::Export {
                kind,
                combined,
                dir,
            } => {
                let kinds = match kind {
                    Some(kind) => vec![*kind],
                    None => vec![
                        MoleculeKind::Formulas,
                        MoleculeKind::Resources,
                        MoleculeKind::Transformations,
                    ],
                };
                if kinds.contains(&MoleculeKind::Formulas) {
                    self.export_formulas(writer, dir).await?;
                }
                let resources = kinds.contains(&MoleculeKind::Resources);
                let transformations = kinds.contains(&MoleculeKind::Transformations);
                if *combined && (resources || transformations) {
                    return self
                        .export_combined(writer, dir, resources, transformations)
                        .await;
                }
                if resources {
                    self.export_resources(writer, dir).await?;
                }
                if transformations {
                    self.export_transformations(writer, dir).await?;
                }
                Ok(())
            }
        }
    }

    async fn export_formulas<W: Write>(&self, writer: &mut W, dir: &Path) -> Result<(), CliError> {
        let formulas: Vec<Value> = self.client.get("/formulas").await?.ensure_ok()?.json()?;
        let target = dir.join("formulas");
        for formula in &formulas {
            let name = name_of(formula);
            let file = format!("{}.formula.json", file_stem(&name.replace(' ', "")));
            write_asset(writer, &name, &target, &file, formula)?;
        }
        Ok(())
    }

    async fn export_resources<W: Write>(&self, writer: &mut W, dir: &Path) -> Result<(), CliError> {
        let resources: Vec<Value> = self
            .client
            .get("/common-resources")
            .await?
            .ensure_ok()?
            .json()?;
        let target = dir.join("resources");
        for resource in &resources {
            let name = name_of(resource);
            let file = format!("{}.obj.json", file_stem(&name));
            write_asset(writer, &name, &target, &file, resource)?;
        }
        Ok(())
    }

    async fn export_transformations<W: Write>(
        &self,
        writer: &mut W,
        dir: &Path,
    ) -> Result<(), CliError> {
        let listing: Transformations = self
            .client
            .get("/transformations")
            .await?
            .ensure_ok()?
            .json()?;
        let associated = associated_elements(&self.client, listing.keys()).await?;
        let target = dir.join("transformations");
        for (name, elements) in &associated {
            for AccountElement { element } in elements {
                let defined = self.element_transformations(element.id).await?;
                let Some(transformation) = defined.get(name) else {
                    debug!(resource = %name, element = %element.key, "not defined on element");
                    continue;
                };
                let file = format!(
                    "{}_{}.transformation.json",
                    file_stem(&element.key),
                    file_stem(name)
                );
                write_asset(writer, name, &target, &file, transformation)?;
            }
        }
        Ok(())
    }

    async fn export_combined<W: Write>(
        &self,
        writer: &mut W,
        dir: &Path,
        resources: bool,
        transformations: bool,
    ) -> Result<(), CliError> {
        let mut bundle = VdrBundle::default();

        if resources {
            let listing: Vec<Value> = self
                .client
                .get("/common-resources")
                .await?
                .ensure_ok()?
                .json()?;
            for resource in &listing {
                let name = name_of(resource);
                let definition: Value = self
                    .client
                    .get(&format!("/common-resources/{name}"))
                    .await?
                    .ensure_ok()?
                    .json()?;
                bundle.object_definitions.insert(name, definition);
            }
        }

        if transformations {
            let listing: Transformations = self
                .client
                .get("/transformations")
                .await?
                .ensure_ok()?
                .json()?;
            let associated = associated_elements(&self.client, listing.keys()).await?;
            let elements: BTreeSet<(i64, String)> = associated
                .values()
                .flatten()
                .map(|a| (a.element.id, a.element.key.clone()))
                .collect();
            for (id, key) in elements {
                let defined = self.element_transformations(id).await?;
                bundle
                    .transformations
                    .insert(key, Value::Object(defined.into_iter().collect()));
            }
        }

        let name = file_stem(&self.profile.replace(' ', ""));
        write_asset(
            writer,
            &name,
            dir,
            &format!("{name}.combined.vdr.json"),
            &bundle,
        )
    }

    async fn element_transformations(&self, id: i64) -> Result<BTreeMap<String, Value>, CliError> {
        self.client
            .get(&format!("/elements/{id}/transformations"))
            .await?
            .ensure_ok()?
            .json()
    }
}

fn name_of(asset: &Value) -> String {
    asset
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// A server-provided name with path separators replaced.
fn file_stem(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

fn write_asset<W: Write, T: Serialize>(
    writer: &mut W,
    name: &str,
    dir: &Path,
    file: &str,
    asset: &T,
) -> Result<(), CliError> {
    fs::create_dir_all(dir)?;
    let path: PathBuf = dir.join(file);
    writeln!(writer, "Exporting '{name}' to {}", path.display())?;
    let mut body = serde_json::to_vec_pretty(asset)
        .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
    body.push(b'\n');
    fs::write(&path, body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{client, text};
    use httpmock::MockServer;

    fn export(kind: Option<MoleculeKind>, combined: bool, dir: &Path) -> MoleculeCommands {
        MoleculeCommands::Export {
            kind,
            combined,
            dir: dir.to_path_buf(),
        }
    }

    fn read(path: PathBuf) -> Value {
        serde_json::from_slice(&fs::read(path).expect("exported file")).expect("json")
    }

    fn mock_transformations(server: &MockServer) {
        server.mock(|when, then| {
            when.method("GET").path("/transformations");
            then.status(200).body(r#"{"contact": {"level": "organization"}}"#);
        });
        server.mock(|when, then| {
            when.method("GET").path("/transformations/contact/elements");
            then.status(200).body(r#"[{"element": {"id": 39, "key": "sfdc"}}]"#);
        });
        server.mock(|when, then| {
            when.method("GET").path("/elements/39/transformations");
            then.status(200)
                .body(r#"{"contact": {"vendorName": "Contact", "fields": []}}"#);
        });
    }

    #[tokio::test]
    async fn formulas_are_written_without_spaces() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/formulas");
            then.status(200).body(r#"[{"id": 7, "name": "Nightly Sync", "steps": []}]"#);
        });
        let dir = tempfile::tempdir().expect("tempdir");

        let mut buf = Vec::new();
        MoleculeCommand::new(client(&server), "default")
            .execute(&mut buf, &export(Some(MoleculeKind::Formulas), false, dir.path()))
            .await
            .expect("export");

        let path = dir.path().join("formulas").join("NightlySync.formula.json");
        assert_eq!(read(path.clone())["id"], 7);
        assert_eq!(
            text(buf),
            format!("Exporting 'Nightly Sync' to {}\n", path.display())
        );
    }

    #[tokio::test]
    async fn resources_and_transformations_individually() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/common-resources");
            then.status(200)
                .body(r#"[{"name": "Contact", "fields": [{"type": "string", "path": "email"}]}]"#);
        });
        mock_transformations(&server);
        let dir = tempfile::tempdir().expect("tempdir");

        let client = client(&server);
        let command = MoleculeCommand::new(client, "default");
        let mut buf = Vec::new();
        command
            .execute(&mut buf, &export(Some(MoleculeKind::Resources), false, dir.path()))
            .await
            .expect("resources");
        command
            .execute(
                &mut buf,
                &export(Some(MoleculeKind::Transformations), false, dir.path()),
            )
            .await
            .expect("transformations");

        let resource = read(dir.path().join("resources").join("Contact.obj.json"));
        assert_eq!(resource["fields"][0]["path"], "email");
        let transformation = read(
            dir.path()
                .join("transformations")
                .join("sfdc_contact.transformation.json"),
        );
        assert_eq!(transformation["vendorName"], "Contact");
    }

    #[tokio::test]
    async fn combined_bundle() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/common-resources");
            then.status(200).body(r#"[{"name": "Contact"}]"#);
        });
        let definition = server.mock(|when, then| {
            when.method("GET").path("/common-resources/Contact");
            then.status(200)
                .body(r#"{"name": "Contact", "fields": [{"type": "string", "path": "email"}]}"#);
        });
        mock_transformations(&server);
        server.mock(|when, then| {
            when.method("GET").path("/formulas");
            then.status(200).body(r#"[{"id": 7, "name": "Nightly Sync"}]"#);
        });
        let dir = tempfile::tempdir().expect("tempdir");

        let mut buf = Vec::new();
        MoleculeCommand::new(client(&server), "my staging")
            .execute(&mut buf, &export(None, true, dir.path()))
            .await
            .expect("export");
        definition.assert();

        let bundle = read(dir.path().join("mystaging.combined.vdr.json"));
        assert_eq!(bundle["objectDefinitions"]["Contact"]["fields"][0]["path"], "email");
        assert_eq!(bundle["transformations"]["sfdc"]["contact"]["vendorName"], "Contact");
        assert!(!dir.path().join("resources").exists());
        assert!(!dir.path().join("transformations").exists());
        assert!(dir
            .path()
            .join("formulas")
            .join("NightlySync.formula.json")
            .is_file());
    }

    #[tokio::test]
    async fn separators_in_names_stay_inside_the_target() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/common-resources");
            then.status(200).body(r#"[{"name": "../Contact"}, {"name": "a\\b"}]"#);
        });
        let dir = tempfile::tempdir().expect("tempdir");

        let mut buf = Vec::new();
        MoleculeCommand::new(client(&server), "default")
            .execute(&mut buf, &export(Some(MoleculeKind::Resources), false, dir.path()))
            .await
            .expect("export");

        let resources = dir.path().join("resources");
        assert_eq!(read(resources.join(".._Contact.obj.json"))["name"], "../Contact");
        assert_eq!(read(resources.join("a_b.obj.json"))["name"], "a\\b");
        assert!(!dir.path().join("Contact.obj.json").exists());
    }

    #[test]
    fn file_stem_replaces_separators() {
        assert_eq!(file_stem("sfdc"), "sfdc");
        assert_eq!(file_stem("a/b\\c"), "a_b_c");
    }
}
