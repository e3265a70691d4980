//! Configuration handling for the registry browser.
//!
//! Configuration is stored in `~/.acr-browser.yaml` (or the file passed with
//! `--config`) and includes:
//! - The registry name, used to build the catalog endpoint
//! - Optional admin credentials for basic auth
//!
//! A bearer access token in `ACR_BROWSER_TOKEN` takes precedence over the
//! configured credentials.

use std::env;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use directories::BaseDirs;
use owo_colors::OwoColorize;
use regex::Regex;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{BrowserError, Result};

/// Environment variable holding a bearer access token for the registry
pub const TOKEN_ENV: &str = "ACR_BROWSER_TOKEN";

const CONFIG_FILE_NAME: &str = ".acr-browser.yaml";

static REGISTRY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9-]{3,24}$").expect("registry name regex should be valid")
});

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registry name (the `<name>` in `<name>.azurecr.io`)
    pub registry: String,

    /// Admin credentials
    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,
}

/// Basic-auth credentials for the registry's admin user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AuthConfig {
    fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

/// Resolved credentials for catalog requests
#[derive(Debug, Clone)]
pub enum Credentials {
    Bearer(SecretString),
    Basic {
        username: String,
        password: SecretString,
    },
    Anonymous,
}

/// Check a registry name against Azure's naming rules
pub fn validate_registry_name(name: &str) -> Result<()> {
    if REGISTRY_NAME.is_match(name) {
        Ok(())
    } else {
        Err(BrowserError::Validation(name.to_string()))
    }
}

impl Config {
    pub fn new(registry: impl Into<String>) -> Result<Self> {
        let registry = registry.into();
        validate_registry_name(&registry)?;
        Ok(Self {
            registry,
            auth: AuthConfig::default(),
        })
    }

    /// Default config location in the user's home directory
    pub fn default_path() -> Result<PathBuf> {
        let dirs = BaseDirs::new()
            .ok_or_else(|| BrowserError::Config("could not locate home directory".to_string()))?;
        Ok(dirs.home_dir().join(CONFIG_FILE_NAME))
    }

    /// Load and validate the configuration at `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        validate_registry_name(&config.registry)?;
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load the configuration, running the first-run prompt when the file
    /// does not exist yet.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            return Self::load_from(&path);
        }

        tracing::info!("no configuration at {}, prompting", path.display());
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let registry = prompt_for_registry(&mut stdin.lock(), &mut stdout.lock())?;
        let config = Config::new(registry)?;
        config.save_to(&path)?;
        Ok(config)
    }

    /// Registry login server, e.g. `myregistry.azurecr.io`
    pub fn login_server(&self) -> String {
        format!("{}.azurecr.io", self.registry)
    }

    /// Catalog REST endpoint
    pub fn endpoint(&self) -> String {
        format!("https://{}", self.login_server())
    }

    /// Credentials from the environment, falling back to the config file
    pub fn credentials(&self) -> Credentials {
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            return Credentials::Bearer(SecretString::from(token));
        }

        match (&self.auth.username, &self.auth.password) {
            (Some(username), Some(password)) => Credentials::Basic {
                username: username.clone(),
                password: SecretString::from(password.clone()),
            },
            _ => Credentials::Anonymous,
        }
    }
}

/// Ask for a registry name until a valid one is entered.
pub fn prompt_for_registry<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    writeln!(
        output,
        "Which container registry would you like to browse?\n"
    )?;

    loop {
        write!(output, "{} ", "Container Registry Name:".bold())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(BrowserError::Config(
                "no registry name provided".to_string(),
            ));
        }

        let name = line.trim();
        match validate_registry_name(name) {
            Ok(()) => return Ok(name.to_string()),
            Err(e) => writeln!(output, "{}", e.to_string().red())?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_guards::EnvGuard;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::io::Cursor;

    #[test]
    fn test_validate_registry_name() {
        assert!(validate_registry_name("myregistry").is_ok());
        assert!(validate_registry_name("my-registry-01").is_ok());
        assert!(validate_registry_name("abc").is_ok());
        assert!(validate_registry_name("ab").is_err());
        assert!(validate_registry_name("a".repeat(25).as_str()).is_err());
        assert!(validate_registry_name("my_registry").is_err());
        assert!(validate_registry_name("my.registry").is_err());
        assert!(validate_registry_name("").is_err());
    }

    #[test]
    fn test_endpoint() {
        let config = Config::new("contoso").unwrap();
        assert_eq!(config.login_server(), "contoso.azurecr.io");
        assert_eq!(config.endpoint(), "https://contoso.azurecr.io");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::new("contoso").unwrap();
        config.auth.username = Some("admin".to_string());
        config.auth.password = Some("hunter2".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.registry, "contoso");
        assert_eq!(loaded.auth.username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_empty_auth_is_not_serialized() {
        let config = Config::new("contoso").unwrap();
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        assert!(!yaml.contains("auth"));
    }

    #[test]
    fn test_load_rejects_invalid_registry() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "registry: no_underscores_allowed\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, BrowserError::Validation(_)));
    }

    #[test]
    fn test_load_missing_registry_is_yaml_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "auth:\n  username: admin\n").unwrap();

        assert!(matches!(
            Config::load_from(&path).unwrap_err(),
            BrowserError::Yaml(_)
        ));
    }

    #[test]
    fn test_resolve_loads_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        Config::new("contoso").unwrap().save_to(&path).unwrap();

        let config = Config::resolve(Some(&path)).unwrap();
        assert_eq!(config.registry, "contoso");
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let mut input = Cursor::new("x\nbad_name\ncontoso\n");
        let mut output = Vec::new();

        let name = prompt_for_registry(&mut input, &mut output).unwrap();
        assert_eq!(name, "contoso");

        let printed = String::from_utf8_lossy(&output);
        assert_eq!(printed.matches("invalid registry name").count(), 2);
    }

    #[test]
    fn test_prompt_eof_is_config_error() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(matches!(
            prompt_for_registry(&mut input, &mut output),
            Err(BrowserError::Config(_))
        ));
    }

    #[test]
    #[serial]
    fn test_token_env_takes_precedence() {
        let _guard = unsafe { EnvGuard::new().set(TOKEN_ENV, "access-token") };
        let mut config = Config::new("contoso").unwrap();
        config.auth.username = Some("admin".to_string());
        config.auth.password = Some("hunter2".to_string());

        match config.credentials() {
            Credentials::Bearer(token) => assert_eq!(token.expose_secret(), "access-token"),
            other => panic!("expected bearer credentials, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_basic_credentials_from_config() {
        let _guard = unsafe { EnvGuard::new().remove(TOKEN_ENV) };
        let mut config = Config::new("contoso").unwrap();
        config.auth.username = Some("admin".to_string());
        config.auth.password = Some("hunter2".to_string());

        match config.credentials() {
            Credentials::Basic { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password.expose_secret(), "hunter2");
            }
            other => panic!("expected basic credentials, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_anonymous_without_credentials() {
        let _guard = unsafe { EnvGuard::new().remove(TOKEN_ENV) };
        let config = Config::new("contoso").unwrap();
        assert!(matches!(config.credentials(), Credentials::Anonymous));
    }
}
