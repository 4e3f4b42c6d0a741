//! Configuration resolution across ordered setting sources.
//!
//! Managed deployments ship a secrets file; self-hosted deployments use plain
//! environment variables. A [`SettingsResolver`] consults the secrets store
//! first and the process environment second, so a key present in both always
//! resolves to the secrets value. Absence is a normal outcome, never an error.

use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Connection string for the document store. Required.
pub const MONGODB_URI: &str = "MONGODB_URI";
/// API key for the language-model provider. Required.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Bot token for Telegram notifications. Optional.
pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
/// Recipient user id for Telegram notifications. Optional.
pub const TELEGRAM_USER_ID: &str = "TELEGRAM_USER_ID";
/// Deployment environment name. Optional.
pub const ENVIRONMENT: &str = "ENVIRONMENT";
/// Debug-mode flag. Optional.
pub const DEBUG: &str = "DEBUG";

/// Settings that must resolve before any view renders.
pub const REQUIRED_SETTINGS: [&str; 2] = [MONGODB_URI, OPENAI_API_KEY];

pub const DEFAULT_ENVIRONMENT: &str = "Production";
pub const DEFAULT_DEBUG: &str = "False";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

const SECRETS_FILE_VAR: &str = "LEADBOARD_SECRETS_FILE";
const DEFAULT_SECRETS_FILE: &str = ".secrets/leadboard.env";

/// A named-setting lookup. Blank values count as unset.
pub trait SettingSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads settings from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl SettingSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }
}

/// Secrets provided by a managed deployment as an env-style file. Parsed once
/// at load time and held in memory; never exported into the process
/// environment.
#[derive(Debug, Clone, Default)]
pub struct SecretsFile {
    values: HashMap<String, String>,
}

impl SecretsFile {
    /// Parses `KEY=value` lines from `path`. Blank values are dropped so an
    /// empty entry behaves exactly like a missing one.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let entries = dotenvy::from_path_iter(path).map_err(|source| ConfigError::SecretsFile {
            path: path.to_path_buf(),
            source,
        })?;

        let mut values = HashMap::new();
        for entry in entries {
            let (key, value) = entry.map_err(|source| ConfigError::SecretsFile {
                path: path.to_path_buf(),
                source,
            })?;
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                values.insert(key, trimmed.to_string());
            }
        }

        Ok(Self { values })
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingSource for SecretsFile {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Where the process is running, decided once at bootstrap from the presence
/// of the secrets file and passed in explicitly from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentContext {
    CloudManaged,
    SelfHosted,
}

impl DeploymentContext {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CloudManaged => "Cloud (managed secrets)",
            Self::SelfHosted => "Self-hosted",
        }
    }

    pub fn config_surface(&self) -> &'static str {
        match self {
            Self::CloudManaged => "Secrets file",
            Self::SelfHosted => "Environment variables",
        }
    }

    /// Operator-facing hint shown when required settings are missing.
    pub fn remediation_hint(&self) -> &'static str {
        match self {
            Self::CloudManaged => "add the missing keys to the deployment's secrets file",
            Self::SelfHosted => "set the missing keys as environment variables",
        }
    }
}

/// Ordered-precedence lookup over an optional secrets store and the process
/// environment. Pure: every call re-reads the underlying sources, so a value
/// is only fixed for as long as the caller holds onto it.
pub struct SettingsResolver {
    secrets: Option<Box<dyn SettingSource>>,
    env: Box<dyn SettingSource>,
    context: DeploymentContext,
}

impl SettingsResolver {
    /// Hydrates `.env`, then picks the deployment context from the presence
    /// of the secrets file (`LEADBOARD_SECRETS_FILE`, falling back to
    /// `.secrets/leadboard.env`).
    pub fn detect() -> Result<Self, ConfigError> {
        hydrate_env_file()?;
        let path = secrets_file_path();
        if path.exists() {
            let secrets = SecretsFile::load(&path)?;
            tracing::debug!(path = %path.display(), "secrets file found, running cloud-managed");
            Ok(Self::cloud_managed(secrets))
        } else {
            tracing::debug!("no secrets file, running self-hosted");
            Ok(Self::self_hosted())
        }
    }

    pub fn cloud_managed(secrets: impl SettingSource + 'static) -> Self {
        Self {
            secrets: Some(Box::new(secrets)),
            env: Box::new(EnvSource),
            context: DeploymentContext::CloudManaged,
        }
    }

    pub fn self_hosted() -> Self {
        Self {
            secrets: None,
            env: Box::new(EnvSource),
            context: DeploymentContext::SelfHosted,
        }
    }

    /// Fully-injected constructor so tests can substitute fake sources.
    pub fn with_sources(
        secrets: Option<Box<dyn SettingSource>>,
        env: Box<dyn SettingSource>,
        context: DeploymentContext,
    ) -> Self {
        Self {
            secrets,
            env,
            context,
        }
    }

    pub fn context(&self) -> DeploymentContext {
        self.context
    }

    /// Secrets store first, environment second, `None` otherwise.
    pub fn resolve(&self, key: &str) -> Option<String> {
        if let Some(secrets) = &self.secrets {
            if let Some(value) = secrets.get(key) {
                return Some(value);
            }
        }
        self.env.get(key)
    }

    pub fn resolve_or(&self, key: &str, default: &str) -> String {
        self.resolve(key).unwrap_or_else(|| default.to_string())
    }

    pub fn is_configured(&self, key: &str) -> bool {
        self.resolve(key).is_some()
    }

    /// Returns the order-preserving subsequence of `keys` that do not
    /// resolve. Empty means every key resolved.
    pub fn check_required(&self, keys: &[&'static str]) -> Vec<&'static str> {
        keys.iter()
            .copied()
            .filter(|key| self.resolve(key).is_none())
            .collect()
    }
}

/// HTTP-listener settings for the dashboard binary, kept apart from the
/// dashboard's own setting keys so the resolver never sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    bind_address: String,
}

impl ServerConfig {
    pub fn load_from_env() -> Result<Self, ConfigError> {
        hydrate_env_file()?;
        let bind_address = EnvSource
            .get("DASHBOARD_BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        Ok(Self { bind_address })
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }
}

fn secrets_file_path() -> PathBuf {
    EnvSource
        .get(SECRETS_FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_FILE))
}

pub fn hydrate_env_file() -> Result<(), ConfigError> {
    if env::var_os("LEADBOARD_SKIP_DOTENV").is_some() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(ConfigError::Dotenv { source: err }),
    }

    Ok(())
}

/// Errors emitted when `.env` hydration or secrets-file parsing fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read secrets file `{path}`: {source}")]
    SecretsFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error("failed to load .env file: {source}")]
    Dotenv {
        #[from]
        source: dotenvy::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    struct MapSource(HashMap<String, String>);

    impl MapSource {
        fn new<const N: usize>(pairs: [(&str, &str); N]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl SettingSource for MapSource {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    fn resolver_with(
        secrets: Option<MapSource>,
        env: MapSource,
        context: DeploymentContext,
    ) -> SettingsResolver {
        SettingsResolver::with_sources(
            secrets.map(|s| Box::new(s) as Box<dyn SettingSource>),
            Box::new(env),
            context,
        )
    }

    #[test]
    fn secrets_take_precedence_over_environment() {
        let resolver = resolver_with(
            Some(MapSource::new([(MONGODB_URI, "mongodb://secret")])),
            MapSource::new([(MONGODB_URI, "mongodb://env")]),
            DeploymentContext::CloudManaged,
        );
        assert_eq!(
            resolver.resolve(MONGODB_URI).as_deref(),
            Some("mongodb://secret")
        );
    }

    #[test]
    fn environment_fills_in_for_missing_secrets() {
        let resolver = resolver_with(
            Some(MapSource::new([(MONGODB_URI, "mongodb://secret")])),
            MapSource::new([(OPENAI_API_KEY, "sk-env")]),
            DeploymentContext::CloudManaged,
        );
        assert_eq!(resolver.resolve(OPENAI_API_KEY).as_deref(), Some("sk-env"));
    }

    #[test]
    fn unresolved_key_yields_default() {
        let resolver = resolver_with(
            None,
            MapSource::new([]),
            DeploymentContext::SelfHosted,
        );
        assert_eq!(resolver.resolve(ENVIRONMENT), None);
        assert_eq!(
            resolver.resolve_or(ENVIRONMENT, DEFAULT_ENVIRONMENT),
            "Production"
        );
        assert_eq!(resolver.resolve_or(DEBUG, DEFAULT_DEBUG), "False");
    }

    #[test]
    fn check_required_preserves_input_order() {
        let resolver = resolver_with(
            None,
            MapSource::new([(OPENAI_API_KEY, "sk-test")]),
            DeploymentContext::SelfHosted,
        );
        let missing = resolver.check_required(&[MONGODB_URI, OPENAI_API_KEY, TELEGRAM_BOT_TOKEN]);
        assert_eq!(missing, vec![MONGODB_URI, TELEGRAM_BOT_TOKEN]);
    }

    #[test]
    fn check_required_is_empty_when_all_resolve() {
        let resolver = resolver_with(
            Some(MapSource::new([(MONGODB_URI, "mongodb://secret")])),
            MapSource::new([(OPENAI_API_KEY, "sk-test")]),
            DeploymentContext::CloudManaged,
        );
        assert!(resolver.check_required(&REQUIRED_SETTINGS).is_empty());
    }

    #[test]
    fn blank_environment_value_is_treated_as_unset() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::set_var("LEADBOARD_TEST_BLANK", "   ");
        assert_eq!(EnvSource.get("LEADBOARD_TEST_BLANK"), None);
        env::set_var("LEADBOARD_TEST_BLANK", " padded ");
        assert_eq!(
            EnvSource.get("LEADBOARD_TEST_BLANK").as_deref(),
            Some("padded")
        );
        env::remove_var("LEADBOARD_TEST_BLANK");
    }

    #[test]
    fn secrets_file_parses_env_style_lines() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "MONGODB_URI=mongodb://localhost:27017/sales").unwrap();
        writeln!(file, "OPENAI_API_KEY=\"sk-from-file\"").unwrap();
        writeln!(file, "TELEGRAM_BOT_TOKEN=   ").unwrap();

        let secrets = SecretsFile::load(file.path()).expect("secrets load");
        assert_eq!(
            secrets.get(MONGODB_URI).as_deref(),
            Some("mongodb://localhost:27017/sales")
        );
        assert_eq!(secrets.get(OPENAI_API_KEY).as_deref(), Some("sk-from-file"));
        // Blank entries behave like missing ones.
        assert_eq!(secrets.get(TELEGRAM_BOT_TOKEN), None);
    }

    #[test]
    fn missing_secrets_file_is_an_error() {
        let err = SecretsFile::load(Path::new("/nonexistent/leadboard.env")).unwrap_err();
        assert!(matches!(err, ConfigError::SecretsFile { .. }));
    }

    #[test]
    fn server_config_defaults_bind_address() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::set_var("LEADBOARD_SKIP_DOTENV", "1");
        env::remove_var("DASHBOARD_BIND_ADDRESS");
        let config = ServerConfig::load_from_env().expect("server config loads");
        assert_eq!(config.bind_address(), DEFAULT_BIND_ADDRESS);

        env::set_var("DASHBOARD_BIND_ADDRESS", "0.0.0.0:9000");
        let config = ServerConfig::load_from_env().expect("server config loads");
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        env::remove_var("DASHBOARD_BIND_ADDRESS");
    }

    #[test]
    fn deployment_context_labels_are_distinct() {
        assert_ne!(
            DeploymentContext::CloudManaged.remediation_hint(),
            DeploymentContext::SelfHosted.remediation_hint()
        );
        assert_eq!(
            DeploymentContext::SelfHosted.config_surface(),
            "Environment variables"
        );
    }
}
