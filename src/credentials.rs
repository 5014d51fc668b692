//! API key resolution
//!
//! Keys are looked up in this order (first found wins):
//! 1. the environment variable (default `ALPHA_GENOME_API_KEY`)
//! 2. `.env` in the current directory
//! 3. `../.env`
//! 4. `~/.env`
//!
//! `.env` files hold `KEY=VALUE` lines. Blank lines and `#` comments are
//! skipped and one layer of surrounding quotes is stripped from values.
//! The process environment is never modified.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PredictError;

/// Default environment variable holding the key
pub const DEFAULT_API_KEY_VAR: &str = "ALPHA_GENOME_API_KEY";

/// An API key; `Debug` never shows the value
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for placing in request headers
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(****)")
    }
}

/// Where a key was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    File(PathBuf),
}

/// Finds an API key in the environment or `.env` files
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    var_name: String,
    search_paths: Vec<PathBuf>,
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_VAR)
    }
}

impl CredentialResolver {
    /// Resolver for `var_name` with the default `.env` search paths
    pub fn new(var_name: impl Into<String>) -> Self {
        let mut search_paths = vec![PathBuf::from(".env"), PathBuf::from("../.env")];
        if let Some(home) = home_dir(std::env::var("HOME").ok()) {
            search_paths.push(home.join(".env"));
        }
        Self {
            var_name: var_name.into(),
            search_paths,
        }
    }

    /// Replace the `.env` search paths
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Look up the key, reading the process environment
    pub fn resolve(&self) -> Option<(ApiKey, KeySource)> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Look up the key with a custom environment lookup
    pub fn resolve_with<F>(&self, lookup: F) -> Option<(ApiKey, KeySource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(&self.var_name).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(var = %self.var_name, "API key found in environment");
            return Some((ApiKey::new(value.trim()), KeySource::Environment));
        }

        for path in &self.search_paths {
            if let Some(value) = read_env_file(path, &self.var_name) {
                tracing::debug!(path = %path.display(), "API key found in env file");
                return Some((ApiKey::new(value), KeySource::File(path.clone())));
            }
        }

        None
    }

    /// Like [`resolve`](Self::resolve) but a missing key is an error
    pub fn require(&self) -> Result<ApiKey, PredictError> {
        self.resolve()
            .map(|(key, _)| key)
            .ok_or_else(|| PredictError::MissingCredential {
                name: self.var_name.clone(),
            })
    }
}

/// Read `name` from a `.env` file; unreadable files count as not found
fn read_env_file(path: &Path, name: &str) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    parse_env(&content, name)
}

/// Find `name` among `KEY=VALUE` lines
pub fn parse_env(content: &str, name: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();

        if line.starts_with('#') || line.is_empty() {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() != name {
                continue;
            }
            let value = strip_quotes(value.trim());
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// `HOME` when set, otherwise the platform home directory
fn home_dir(home_var: Option<String>) -> Option<PathBuf> {
    home_var
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}
