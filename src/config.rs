//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Every setting except the OAuth credentials has a default.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:5000";
const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;
const DEFAULT_STATIC_DIR: &str = "static";

/// Size limits applied before an instance reaches a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverLimits {
    /// Largest city count accepted by `/tsp` (enumeration is factorial).
    pub tsp_max_cities: usize,
    /// Largest knapsack capacity (the DP table has one column per unit).
    pub knapsack_max_capacity: u64,
    /// Largest DP table, `(items + 1) * (capacity + 1)` cells.
    pub knapsack_max_cells: u64,
    /// Largest matrix accepted by `/hamiltonian_cycle` (backtracking is exponential).
    pub hamiltonian_max_nodes: usize,
    /// Largest `number` accepted by `/partitions`.
    pub partitions_max_number: u64,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            tsp_max_cities: 10,
            knapsack_max_capacity: 1_000_000,
            knapsack_max_cells: 50_000_000,
            hamiltonian_max_nodes: 20,
            partitions_max_number: 1000,
        }
    }
}

/// OAuth provider credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    /// Provider base URL, e.g. `https://tenant.auth0.com`, without trailing slash.
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Externally visible base URL, used to build the OAuth callback.
    pub public_url: String,
    /// `None` disables the login flow.
    pub oauth: Option<OAuthConfig>,
    pub session_ttl: chrono::Duration,
    pub limits: SolverLimits,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            oauth: None,
            session_ttl: chrono::Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            limits: SolverLimits::default(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// ```
    /// use combinatorics_solver::config::AppConfig;
    ///
    /// let config = AppConfig::from_lookup(|name| match name {
    ///     "TSP_MAX_CITIES" => Some("8".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.limits.tsp_max_cities, 8);
    /// assert_eq!(config.bind_addr.port(), 5000);
    /// assert!(config.oauth.is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SolverLimits::default();
        let limits = SolverLimits {
            tsp_max_cities: parse_var(&lookup, "TSP_MAX_CITIES", defaults.tsp_max_cities)?,
            knapsack_max_capacity: parse_var(
                &lookup,
                "KNAPSACK_MAX_CAPACITY",
                defaults.knapsack_max_capacity,
            )?,
            knapsack_max_cells: parse_var(&lookup, "KNAPSACK_MAX_CELLS", defaults.knapsack_max_cells)?,
            hamiltonian_max_nodes: parse_var(
                &lookup,
                "HAMILTONIAN_MAX_NODES",
                defaults.hamiltonian_max_nodes,
            )?,
            partitions_max_number: parse_var(
                &lookup,
                "PARTITIONS_MAX_NUMBER",
                defaults.partitions_max_number,
            )?,
        };

        let ttl_secs: i64 = parse_var(&lookup, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_SECS",
                value: ttl_secs.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let bind_addr = parse_var(
            &lookup,
            "BIND_ADDR",
            SocketAddr::from_str(DEFAULT_BIND_ADDR).map_err(|e| ConfigError::InvalidValue {
                name: "BIND_ADDR",
                value: DEFAULT_BIND_ADDR.to_string(),
                reason: e.to_string(),
            })?,
        )?;

        Ok(Self {
            bind_addr,
            public_url: lookup("PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string()),
            oauth: oauth_from_lookup(&lookup)?,
            session_ttl: chrono::Duration::seconds(ttl_secs),
            limits,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            value,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// OAuth is enabled only when all three variables are present.
fn oauth_from_lookup<F>(lookup: &F) -> Result<Option<OAuthConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    const VARS: [&str; 3] = ["AUTH0_DOMAIN", "AUTH0_CLIENT_ID", "AUTH0_CLIENT_SECRET"];

    let values: Vec<Option<String>> = VARS
        .iter()
        .map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
        .collect();

    let present = values.iter().position(Option::is_some);
    let missing = values.iter().position(Option::is_none);
    match (present, missing) {
        (None, _) => Ok(None),
        (Some(p), Some(m)) => Err(ConfigError::IncompleteOAuth(VARS[p], VARS[m])),
        (Some(_), None) => {
            let mut values = values.into_iter().flatten();
            let (Some(domain), Some(client_id), Some(client_secret)) =
                (values.next(), values.next(), values.next())
            else {
                return Ok(None);
            };
            Ok(Some(OAuthConfig {
                domain: normalize_domain(&domain),
                client_id,
                client_secret,
            }))
        }
    }
}

fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 5000)));
        assert_eq!(config.public_url, "http://localhost:5000");
        assert_eq!(config.limits, SolverLimits::default());
        assert_eq!(config.session_ttl, chrono::Duration::hours(24));
        assert!(config.oauth.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("PUBLIC_URL", "https://solver.example.com/"),
            ("KNAPSACK_MAX_CAPACITY", "500"),
            ("KNAPSACK_MAX_CELLS", "10000"),
            ("HAMILTONIAN_MAX_NODES", "12"),
            ("PARTITIONS_MAX_NUMBER", "200"),
            ("SESSION_TTL_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.public_url, "https://solver.example.com");
        assert_eq!(config.limits.knapsack_max_capacity, 500);
        assert_eq!(config.limits.knapsack_max_cells, 10_000);
        assert_eq!(config.limits.hamiltonian_max_nodes, 12);
        assert_eq!(config.limits.partitions_max_number, 200);
        assert_eq!(config.session_ttl, chrono::Duration::seconds(60));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = config_from(&[("TSP_MAX_CITIES", "many")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "TSP_MAX_CITIES", .. }));
        assert!(config_from(&[("SESSION_TTL_SECS", "0")]).is_err());
    }

    #[test]
    fn test_oauth_all_or_none() {
        let config = config_from(&[
            ("AUTH0_DOMAIN", "tenant.auth0.com/"),
            ("AUTH0_CLIENT_ID", "id"),
            ("AUTH0_CLIENT_SECRET", "secret"),
        ])
        .unwrap();
        let oauth = config.oauth.unwrap();
        assert_eq!(oauth.domain, "https://tenant.auth0.com");
        assert_eq!(oauth.client_id, "id");
        assert!(!format!("{:?}", oauth).contains("secret\""));

        let err = config_from(&[("AUTH0_CLIENT_ID", "id")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::IncompleteOAuth("AUTH0_CLIENT_ID", "AUTH0_DOMAIN")
        ));
    }
}
