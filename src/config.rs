use anyhow::{Context, Result};
use clap::Parser;
use std::{env, fmt, time::Duration};

/// One Objecttypes API the service is allowed to resolve object types from.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL; object type URLs must start with it.
    pub api_root: String,

    /// Sent as `Authorization: Token <token>` when present.
    pub auth_token: Option<String>,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_root", &self.api_root)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub objecttypes: Vec<ServiceConfig>,
    pub request_timeout: Duration,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Objects API with remote JSON-schema validation")]
pub struct Args {
    /// Host to bind to (overrides OBJECTS_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides OBJECTS_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Objecttypes API root, repeatable (overrides OBJECTS_OBJECTTYPES_API_ROOTS)
    #[arg(long = "objecttypes-api-root")]
    pub objecttypes_api_roots: Vec<String>,

    /// Token for the Objecttypes APIs (overrides OBJECTS_OBJECTTYPES_TOKEN)
    #[arg(long)]
    pub objecttypes_token: Option<String>,

    /// Outbound request timeout in seconds (overrides OBJECTS_REQUEST_TIMEOUT_SECS)
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_parts(Args::parse(), |key| env::var(key).ok())
    }

    /// Merge parsed CLI args over values looked up with `env_lookup`.
    pub fn from_parts(args: Args, env_lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env_lookup("OBJECTS_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let env_port = match env_lookup("OBJECTS_PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing OBJECTS_PORT value `{}`", value))?,
            None => 8000,
        };
        let env_timeout = match env_lookup("OBJECTS_REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .with_context(|| format!("parsing OBJECTS_REQUEST_TIMEOUT_SECS value `{}`", value))?,
            None => 10,
        };
        let env_roots = env_lookup("OBJECTS_OBJECTTYPES_API_ROOTS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();
        let env_token = env_lookup("OBJECTS_OBJECTTYPES_TOKEN").filter(|t| !t.is_empty());

        // --- Merge ---
        let roots = if args.objecttypes_api_roots.is_empty() {
            env_roots
        } else {
            args.objecttypes_api_roots
        };
        let token = args.objecttypes_token.or(env_token);

        let objecttypes = roots
            .into_iter()
            .map(|api_root| ServiceConfig {
                api_root,
                auth_token: token.clone(),
            })
            .collect();

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            objecttypes,
            request_timeout: Duration::from_secs(args.request_timeout_secs.unwrap_or(env_timeout)),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
