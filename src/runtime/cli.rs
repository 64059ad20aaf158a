//! Snapshot source backed by the runtime's command-line tool

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::core::{ContainerRecord, ImageRecord, Result, RuntimeError};
use crate::runtime::parse::{container_template, image_template, parse_containers, parse_images};
use crate::runtime::{Mutation, OutputFormat, SnapshotSource};

/// Runs `docker`/`podman` (or anything CLI-compatible) as a subprocess per operation
#[derive(Debug, Clone)]
pub struct CliRuntime {
    program: String,
    format: OutputFormat,
    timeout: Duration,
}

impl CliRuntime {
    pub fn new(program: impl Into<String>, format: OutputFormat, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            format,
            timeout,
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.output_format,
            Duration::from_secs(config.command_timeout_seconds),
        )
    }

    /// Program name or path
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check the tool is callable; returns its version output
    pub async fn ping(&self) -> Result<String> {
        debug!("Probing {}", self.program);
        let out = self.run(&["version".to_string()]).await?;
        Ok(out.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Run the tool with `args`, returning stdout on a zero exit
    async fn run(&self, args: &[String]) -> Result<String> {
        let command = args.join(" ");
        debug!("Running: {} {}", self.program, command);

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| RuntimeError::Timeout {
                program: self.program.clone(),
                command: command.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| RuntimeError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            warn!("{} {} failed ({}): {}", self.program, command, output.status, message);
            return Err(RuntimeError::ExternalTool {
                program: self.program.clone(),
                command,
                status: output.status.to_string(),
                message,
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn list_args(&self, subcommand: &[&str], template: &str) -> Vec<String> {
        subcommand
            .iter()
            .map(|s| s.to_string())
            .chain(["--format".to_string(), template.to_string()])
            .collect()
    }
}

#[async_trait]
impl SnapshotSource for CliRuntime {
    async fn list_containers(&self) -> Result<Vec<ContainerRecord>> {
        let args = self.list_args(&["ps", "-a", "--no-trunc"], container_template(self.format));
        let output = self.run(&args).await?;
        let containers = parse_containers(&output, self.format, &format!("{} ps", self.program))?;
        debug!("Found {} containers", containers.len());
        Ok(containers)
    }

    async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let args = self.list_args(&["images"], image_template(self.format));
        let output = self.run(&args).await?;
        let images = parse_images(&output, self.format, &format!("{} images", self.program))?;
        debug!("Found {} images", images.len());
        Ok(images)
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<()> {
        info!("Applying: {}", mutation);
        self.run(&mutation.args()).await?;
        info!("Applied: {}", mutation);
        Ok(())
    }
}
