use std::env;
use std::fmt;
use std::str::FromStr;

const DEFAULT_DATABASE: &str = "test";

/// How the idempotent insert guards against duplicate emails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Unique index on `email` plus a single conditional upsert
    Atomic,
    /// Separate lookup and insert; concurrent writers can both pass the lookup
    CheckThenInsert,
}

impl FromStr for InsertMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(InsertMode::Atomic),
            "check-then-insert" | "check_then_insert" => Ok(InsertMode::CheckThenInsert),
            other => Err(format!(
                "Invalid insert mode: {}. Supported: atomic, check-then-insert",
                other
            )),
        }
    }
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertMode::Atomic => write!(f, "atomic"),
            InsertMode::CheckThenInsert => write!(f, "check-then-insert"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityHeadersConfig {
    pub enabled: bool,
    pub content_security_policy: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub hash: bool,
    pub bcrypt_cost: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            hash: true,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Service configuration read from the environment (and `.env`, loaded by `main`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongo_uri: Option<String>,
    pub database_name: String,
    pub insert_mode: InsertMode,
    pub passwords: PasswordPolicy,
    pub cors_origins: CorsOrigins,
    pub security_headers: SecurityHeadersConfig,
    pub seed_sample_user: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests don't touch the process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mongo_uri = var("MONGO_URI");
        let database_name = var("MONGO_DATABASE")
            .or_else(|| mongo_uri.as_deref().and_then(database_from_uri))
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let bcrypt_cost = parse_or("BCRYPT_COST", var("BCRYPT_COST"), bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(format!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost));
        }

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", var("PORT"), 5000)?,
            mongo_uri,
            database_name,
            insert_mode: parse_or("USER_INSERT_MODE", var("USER_INSERT_MODE"), InsertMode::Atomic)?,
            passwords: PasswordPolicy {
                hash: parse_flag("HASH_PASSWORDS", var("HASH_PASSWORDS"), true)?,
                bcrypt_cost,
            },
            cors_origins: CorsOrigins::parse(&var("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
            security_headers: SecurityHeadersConfig {
                enabled: parse_flag("SECURITY_HEADERS", var("SECURITY_HEADERS"), true)?,
                content_security_policy: var("CONTENT_SECURITY_POLICY")
                    .unwrap_or_else(|| "default-src 'self'".to_string()),
            },
            seed_sample_user: parse_flag("SEED_SAMPLE_USER", var("SEED_SAMPLE_USER"), false)?,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {} value '{}': {}", key, value, e)),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, raw: Option<String>, default: bool) -> Result<bool, String> {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(format!("Invalid {} value '{}': expected true or false", key, v)),
    }
}

/// Extracts the database name from the path of a connection string
pub fn database_from_uri(uri: &str) -> Option<String> {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path)
        .and_then(|path| path.split('?').next())
        .filter(|name| !name.is_empty())
        .map(String::from)
}

/// Hides the credentials of a connection string before it is logged
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };

    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", scheme, &rest[at + 1..]),
        None => uri.to_string(),
    }
}
