//! Image pull action.
//!
//! Pulling runs `az acr login -n <registry>` and then
//! `docker pull <registry>.azurecr.io/<repository>:<tag>`. Both commands are
//! spawned with `tokio::process` so the TUI keeps rendering while they run.

use std::env;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::error::{BrowserError, Result};

/// Time allowed for each of the two commands
const COMMAND_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// The image a pull action targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub registry: String,
    pub repository: String,
    pub tag: String,
}

impl PullRequest {
    pub fn new(
        registry: impl Into<String>,
        repository: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            registry: registry.into(),
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// Fully qualified image reference
    pub fn image_reference(&self) -> String {
        format!(
            "{}.azurecr.io/{}:{}",
            self.registry, self.repository, self.tag
        )
    }

    fn login_args(&self) -> [&str; 4] {
        ["acr", "login", "-n", &self.registry]
    }
}

/// Whether an executable named `program` is on `PATH`
pub fn command_available(program: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|dir| is_executable(&dir.join(program)))
}

/// Whether the pull action can be offered
pub fn docker_available() -> bool {
    command_available("docker")
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Log in to the registry and pull the image. Returns the image reference.
pub async fn pull_image(request: &PullRequest) -> Result<String> {
    let image = request.image_reference();
    tracing::info!("pulling {image}");

    run("az", &request.login_args()).await?;
    run("docker", &["pull", &image]).await?;

    tracing::info!("pulled {image}");
    Ok(image)
}

async fn run(program: &str, args: &[&str]) -> Result<()> {
    let mut cmd = TokioCommand::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match timeout(COMMAND_TIMEOUT, cmd.output()).await {
        Ok(output) => output.map_err(|e| BrowserError::Pull(format!("failed to run {program}: {e}")))?,
        Err(_) => {
            return Err(BrowserError::Pull(format!(
                "{program} timed out after {} seconds",
                COMMAND_TIMEOUT.as_secs()
            )));
        }
    };
    check_output(&output, program)
}

/// Turn a non-zero exit into an error carrying the last stderr line
fn check_output(output: &Output, program: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let exit_code = output.status.code().unwrap_or(-1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("no output");
    tracing::warn!("{program} exited with {exit_code}: {stderr}");
    Err(BrowserError::Pull(format!(
        "{program} exited with code {exit_code}: {}",
        detail.trim()
    )))
}
