//! Dependency installation
//!
//! Installation is fire-and-forget from the pipeline's point of view: the
//! installer starts `bower install` in the background and hands back an
//! `InstallHandle` the caller may wait on once the pipeline has finished.

use super::check::{check_bower, check_node};
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::task::JoinHandle;

/// Flags passed through unchanged from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Don't install dependencies
    pub skip_install: bool,
    /// Don't print which commands are (or should be) run
    pub skip_message: bool,
}

/// Background installation started by an `Installer`
#[derive(Debug)]
pub struct InstallHandle {
    task: Option<JoinHandle<Result<()>>>,
}

impl InstallHandle {
    /// Nothing was started
    pub fn skipped() -> Self {
        Self { task: None }
    }

    pub fn spawned(task: JoinHandle<Result<()>>) -> Self {
        Self { task: Some(task) }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Wait for the background installation to finish
    pub async fn wait(self) -> Result<()> {
        match self.task {
            Some(task) => task.await.context("Installer task panicked")?,
            None => Ok(()),
        }
    }
}

/// Installs a generated project's dependencies
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, dir: &Path, options: InstallOptions) -> Result<InstallHandle>;
}

/// Runs `bower install` in the project directory
#[derive(Debug, Clone)]
pub struct BowerInstaller {
    program: String,
}

impl Default for BowerInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl BowerInstaller {
    pub fn new() -> Self {
        Self {
            program: "bower".to_string(),
        }
    }

    /// Use a different executable (e.g. a wrapper script)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The command a user would type
    pub fn install_command(&self) -> String {
        format!("{} install", self.program)
    }

    fn ensure_available(&self) -> Result<()> {
        if self.program != "bower" {
            return Ok(());
        }
        if check_bower().available {
            return Ok(());
        }

        let hint = if check_node().available {
            "Install it with: npm install -g bower"
        } else {
            "Install Node.js from https://nodejs.org, then: npm install -g bower"
        };
        anyhow::bail!("Bower is not installed. {}", hint)
    }
}

#[async_trait]
impl Installer for BowerInstaller {
    async fn install(&self, dir: &Path, options: InstallOptions) -> Result<InstallHandle> {
        let cmd = self.install_command();

        if options.skip_install {
            if !options.skip_message {
                println!();
                println!(
                    "I'm all done. Just run {} to install the required dependencies.",
                    cmd.yellow()
                );
            }
            return Ok(InstallHandle::skipped());
        }

        if !options.skip_message {
            println!();
            println!(
                "I'm all done. Running {} for you to install the required dependencies. \
                 If this fails, try running the command yourself.",
                cmd.yellow()
            );
            println!();
        }

        self.ensure_available()?;

        let child = TokioCommand::new(&self.program)
            .arg("install")
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start `{}` in {}", cmd, dir.display()))?;

        tracing::debug!(dir = %dir.display(), command = %cmd, "spawned installer");
        Ok(InstallHandle::spawned(tokio::spawn(stream_output(
            child,
            cmd,
            dir.to_path_buf(),
        ))))
    }
}

/// Relay the installer's output and report a failing exit status
async fn stream_output(mut child: tokio::process::Child, cmd: String, dir: PathBuf) -> Result<()> {
    let stdout = child.stdout.take().context("Failed to capture stdout")?;
    let stderr = child.stderr.take().context("Failed to capture stderr")?;

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();
    let mut stderr_open = true;

    loop {
        tokio::select! {
            line = stdout_reader.next_line() => {
                match line {
                    Ok(Some(line)) => println!("  {}", line),
                    Ok(None) => break,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stdout:".red(), e);
                        break;
                    }
                }
            }
            line = stderr_reader.next_line(), if stderr_open => {
                match line {
                    Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                    Ok(None) => stderr_open = false,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stderr:".red(), e);
                        stderr_open = false;
                    }
                }
            }
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("Failed to wait for `{}`", cmd))?;

    if !status.success() {
        anyhow::bail!(
            "`{}` failed in {} with exit code {}. Please try running it manually.",
            cmd,
            dir.display(),
            status.code().unwrap_or(-1)
        );
    }

    Ok(())
}
