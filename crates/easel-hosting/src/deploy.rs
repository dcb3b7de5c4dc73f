//! Deploy adapter for the generated site.
//!
//! Shells out to the configured hosting CLI and resolves where the deploy
//! landed from its output. Structured `--json` output names a hosting
//! version, which needs a follow-up API lookup for the public URL; plain
//! output prints the hosted URL directly.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, info};

use easel_core::config::HostingConfig;
use easel_core::{Error, Result};

/// Where a deploy run landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployTarget {
    /// Hosted URL taken directly from the CLI output.
    HostedUrl(String),
    /// Hosting version name; the URL needs a hosting API lookup.
    Version(String),
}

/// Runs the deploy step for the generated site.
///
/// The CLI implementation shells out; tests swap in a mock through this
/// trait.
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Run the deploy command and return its raw stdout.
    async fn deploy(&self) -> Result<String>;

    /// Verify the deploy program is runnable.
    async fn health_check(&self) -> Result<bool>;
}

/// Deployer that shells out to the configured hosting CLI.
pub struct HostingCliDeployer {
    command: String,
    timeout_secs: u64,
}

impl HostingCliDeployer {
    /// Create a deployer running `command` with a timeout in seconds.
    pub fn new(command: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            command: command.into(),
            timeout_secs,
        }
    }

    pub fn from_config(config: &HostingConfig) -> Self {
        Self::new(config.deploy_command.clone(), config.deploy_timeout_secs)
    }

    /// Split the configured command into program and arguments.
    fn program_and_args(&self) -> Result<(String, Vec<String>)> {
        let mut parts = self.command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| Error::Config("Deploy command is empty".to_string()))?;
        Ok((program, parts.collect()))
    }
}

/// Run a command with a timeout, returning stdout as a string.
async fn run_cmd_with_timeout(cmd: &mut Command, timeout_secs: u64) -> Result<String> {
    let output = tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| {
            Error::Deployment(format!("Deploy command timed out after {}s", timeout_secs))
        })?
        .map_err(|e| Error::Deployment(format!("Failed to execute deploy command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Deployment(format!(
            "Deploy command failed (exit {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[async_trait]
impl Deployer for HostingCliDeployer {
    async fn deploy(&self) -> Result<String> {
        let (program, args) = self.program_and_args()?;
        info!(command = %self.command, "Running deploy command");
        let stdout =
            run_cmd_with_timeout(Command::new(&program).args(&args), self.timeout_secs).await?;
        debug!(output_len = stdout.len(), "Deploy command finished");
        Ok(stdout)
    }

    async fn health_check(&self) -> Result<bool> {
        let Ok((program, _)) = self.program_and_args() else {
            return Ok(false);
        };
        match Command::new(&program).arg("--version").output().await {
            Ok(output) => Ok(output.status.success()),
            Err(_) => Ok(false),
        }
    }
}

static HOSTING_URL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*Hosting URL:\s*(\S+)").unwrap());

static HOSTED_SITE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://[A-Za-z0-9][A-Za-z0-9.-]*\.(?:web\.app|firebaseapp\.com)\S*").unwrap()
});

/// Resolve where a deploy landed from the CLI output.
///
/// Structured `--json` output carries a hosting version path under
/// `result.hosting`; the version name is its last path segment. Plain output
/// prints the hosted URL, either on a `Hosting URL:` line or bare.
pub fn parse_deploy_output(stdout: &str) -> Result<DeployTarget> {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(stdout.trim()) {
        if let Some(version) = version_from_json(&json) {
            return Ok(DeployTarget::Version(version));
        }
    }

    if let Some(url) = find_hosted_url(stdout) {
        return Ok(DeployTarget::HostedUrl(url));
    }

    Err(Error::Deployment(
        "Hosting URL not found in deploy output".to_string(),
    ))
}

fn version_from_json(json: &serde_json::Value) -> Option<String> {
    let path = json.get("result")?.get("hosting")?.as_str()?;
    let version = path.rsplit('/').next()?;
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

fn find_hosted_url(output: &str) -> Option<String> {
    if let Some(caps) = HOSTING_URL_LINE.captures(output) {
        return Some(caps[1].to_string());
    }
    HOSTED_SITE_URL.find(output).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_from_json_output() {
        let stdout = r#"{"status": "success", "result": {"hosting": "projects/vision-app-maker/sites/vision-app-maker/versions/abc123"}}"#;
        assert_eq!(
            parse_deploy_output(stdout).unwrap(),
            DeployTarget::Version("abc123".to_string())
        );
    }

    #[test]
    fn parses_version_from_single_segment_path() {
        let stdout = r#"{"result": {"hosting": "abc123"}}"#;
        assert_eq!(
            parse_deploy_output(stdout).unwrap(),
            DeployTarget::Version("abc123".to_string())
        );
    }

    #[test]
    fn json_output_tolerates_surrounding_whitespace() {
        let stdout = "\n  {\"result\": {\"hosting\": \"sites/s/versions/v9\"}}  \n";
        assert_eq!(
            parse_deploy_output(stdout).unwrap(),
            DeployTarget::Version("v9".to_string())
        );
    }

    #[test]
    fn json_without_hosting_result_is_not_found() {
        let stdout = r#"{"status": "success", "result": {}}"#;
        let err = parse_deploy_output(stdout).unwrap_err();
        assert!(err.to_string().contains("Hosting URL not found"));
    }

    #[test]
    fn json_with_non_string_hosting_is_not_found() {
        let stdout = r#"{"result": {"hosting": ["projects/p/sites/s/versions/v1"]}}"#;
        assert!(parse_deploy_output(stdout).is_err());
    }

    #[test]
    fn parses_hosting_url_line_from_plain_output() {
        let stdout = "\n=== Deploying to 'vision-app-maker'...\n\n\
            Deploy complete!\n\n\
            Project Console: https://console.firebase.google.com/project/vision-app-maker/overview\n\
            Hosting URL: https://vision-app-maker.web.app\n";
        assert_eq!(
            parse_deploy_output(stdout).unwrap(),
            DeployTarget::HostedUrl("https://vision-app-maker.web.app".to_string())
        );
    }

    #[test]
    fn console_url_is_not_mistaken_for_hosted_url() {
        let stdout =
            "Project Console: https://console.firebase.google.com/project/demo/overview\n";
        assert!(parse_deploy_output(stdout).is_err());
    }

    #[test]
    fn finds_bare_hosted_url_without_label() {
        let stdout = "Deployed site is live at https://demo-app.firebaseapp.com now";
        assert_eq!(
            parse_deploy_output(stdout).unwrap(),
            DeployTarget::HostedUrl("https://demo-app.firebaseapp.com".to_string())
        );
    }

    #[test]
    fn empty_output_is_not_found() {
        let err = parse_deploy_output("").unwrap_err();
        assert!(matches!(err, Error::Deployment(_)));
    }

    #[test]
    fn program_and_args_splits_command() {
        let deployer = HostingCliDeployer::new("firebase deploy --only hosting --json", 60);
        let (program, args) = deployer.program_and_args().unwrap();
        assert_eq!(program, "firebase");
        assert_eq!(args, vec!["deploy", "--only", "hosting", "--json"]);
    }

    #[test]
    fn empty_command_is_config_error() {
        let deployer = HostingCliDeployer::new("   ", 60);
        assert!(matches!(
            deployer.program_and_args(),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn deploy_captures_stdout_of_command() {
        let deployer = HostingCliDeployer::new("echo Hosting URL: https://demo.web.app", 10);
        let stdout = deployer.deploy().await.unwrap();
        assert_eq!(
            parse_deploy_output(&stdout).unwrap(),
            DeployTarget::HostedUrl("https://demo.web.app".to_string())
        );
    }

    #[tokio::test]
    async fn nonzero_exit_is_deployment_error() {
        let deployer = HostingCliDeployer::new("false", 10);
        let err = deployer.deploy().await.unwrap_err();
        assert!(err.to_string().contains("Deploy command failed"));
    }

    #[tokio::test]
    async fn missing_program_is_deployment_error() {
        let deployer = HostingCliDeployer::new("definitely-not-a-real-deploy-cli", 10);
        let err = deployer.deploy().await.unwrap_err();
        assert!(err.to_string().contains("Failed to execute deploy command"));
    }

    #[tokio::test]
    async fn health_check_reports_missing_program() {
        let deployer = HostingCliDeployer::new("definitely-not-a-real-deploy-cli", 10);
        assert!(!deployer.health_check().await.unwrap());
    }
}
