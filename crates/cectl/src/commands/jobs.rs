//! Scheduled job command implementation.

use std::io::Write;

use futures::StreamExt;
use serde::Serialize;

use super::{passthrough, read_input};
use crate::cli::JobCommands;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::fanout::{delete_jobs, Tally};
use crate::model::Job;
use crate::output::{write_raw, OutputFormat, Table, TableDisplay};

/// Job command executor.
pub struct JobCommand {
    client: ApiClient,
}

impl JobCommand {
    /// Create a new job command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute a job subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &JobCommands,
    ) -> Result<(), CliError> {
        match command {
            JobCommands::List => {
                let response = self.client.get("/jobs").await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let jobs: Vec<Job> = response.ensure_ok()?.json()?;
                format.write(writer, &JobList(jobs))
            }
            JobCommands::Create { file } => {
                let body = read_input(file)?;
                let response = self.client.post("/jobs", body).await?;
                write_raw(writer, response.body())
            }
            JobCommands::Delete { id, all, workers } => {
                if *all {
                    return self.delete_all(writer, *workers).await;
                }
                let Some(id) = id else {
                    return Err(CliError::invalid("provide a job ID or --all"));
                };
                let response = self.client.delete(&format!("/jobs/{id}")).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                response.ensure_ok()?;
                writeln!(writer, "{id} deleted")?;
                Ok(())
            }
        }
    }

    /// Delete every job, `workers` at a time.
    async fn delete_all<W: Write>(&self, writer: &mut W, workers: usize) -> Result<(), CliError> {
        let jobs: Vec<Job> = self.client.get("/jobs").await?.ensure_ok()?.json()?;
        if jobs.is_empty() {
            writeln!(writer, "No jobs to delete")?;
            return Ok(());
        }

        let ids = jobs.into_iter().map(|job| job.id).collect();
        let mut tally = Tally::default();
        let mut outcomes = Box::pin(delete_jobs(&self.client, ids, workers));
        while let Some(outcome) = outcomes.next().await {
            tally.record(outcome.is_ok());
            if !outcome.is_ok() {
                writeln!(writer, "{outcome}")?;
            }
        }
        writeln!(writer, "{tally}")?;
        Ok(())
    }
}

/// Jobs as a table.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct JobList(pub Vec<Job>);

impl JobList {
    fn table(&self) -> Table {
        let mut table = Table::new(["ID", "Name", "Description"]);
        for job in &self.0 {
            table.push([job.id.clone(), job.name.clone(), job.description.clone()]);
        }
        table
    }
}

impl TableDisplay for JobList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{client, csv, table, text};
    use httpmock::MockServer;

    fn command(server: &MockServer) -> JobCommand {
        JobCommand::new(client(server))
    }

    fn delete_all(workers: usize) -> JobCommands {
        JobCommands::Delete {
            id: None,
            all: true,
            workers,
        }
    }

    #[tokio::test]
    async fn list_csv() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/jobs");
            then.status(200).body(
                r#"[{"id": "j-1", "name": "poll", "description": "Polls sfdc", "data": {"id": 4}}]"#,
            );
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &csv(), &JobCommands::List)
            .await
            .expect("list");
        assert_eq!(text(buf), "j-1,poll,Polls sfdc\n");
    }

    #[tokio::test]
    async fn create_prints_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/jobs")
                .json_body_includes(r#"{"name": "poll"}"#);
            then.status(200).body(r#"{"id":"j-2","name":"poll"}"#);
        });

        let file = tempfile::NamedTempFile::new().expect("tempfile");
        std::fs::write(file.path(), r#"{"name": "poll"}"#).expect("write");

        let mut buf = Vec::new();
        command(&server)
            .execute(
                &mut buf,
                &table(),
                &JobCommands::Create {
                    file: file.path().to_path_buf(),
                },
            )
            .await
            .expect("create");
        mock.assert();
        assert_eq!(text(buf), "{\"id\":\"j-2\",\"name\":\"poll\"}\n");
    }

    #[tokio::test]
    async fn delete_one() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("DELETE").path("/jobs/j-1");
            then.status(200);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(
                &mut buf,
                &table(),
                &JobCommands::Delete {
                    id: Some("j-1".into()),
                    all: false,
                    workers: 8,
                },
            )
            .await
            .expect("delete");
        mock.assert();
        assert_eq!(text(buf), "j-1 deleted\n");
    }

    #[tokio::test]
    async fn delete_all_without_jobs() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/jobs");
            then.status(200).body("[]");
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &delete_all(8))
            .await
            .expect("delete all");
        assert_eq!(text(buf), "No jobs to delete\n");
    }

    #[tokio::test]
    async fn delete_all_reports_failures_and_tally() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/jobs");
            then.status(200)
                .body(r#"[{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}, {"id": "e"}]"#);
        });
        for id in ["a", "b", "c", "d"] {
            server.mock(|when, then| {
                when.method("DELETE").path(format!("/jobs/{id}"));
                then.status(200);
            });
        }
        server.mock(|when, then| {
            when.method("DELETE").path("/jobs/e");
            then.status(404).body(r#"{"message":"no job"}"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &delete_all(2))
            .await
            .expect("delete all");
        assert_eq!(text(buf), "404: unable to delete e\n4/5 200\n");
    }
}
