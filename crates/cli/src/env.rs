use std::collections::HashMap;
use std::fs;
use std::path::Path;

use planner::query::dialect::DialectKind;

use crate::error::CliError;

pub const LIMIT_VAR: &str = "PAGER_LIMIT";
pub const LOG_VAR: &str = "PAGER_LOG";
pub const DIALECT_VAR: &str = "PAGER_DIALECT";

const DEFAULT_LIMIT: u64 = 50;
const DEFAULT_LOG: &str = "info";

/// Environment variable manager that loads from system and .env files.
///
/// Variables already present in the process environment win over values
/// read from a file.
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Load variables from a .env file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars
                .entry(key.to_string())
                .or_insert_with(|| Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }
}

/// Defaults for the command line, resolved from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct PagerConfig {
    pub limit: u64,
    pub log: String,
    pub dialect: DialectKind,
}

impl PagerConfig {
    pub fn from_env(env: &EnvManager) -> Result<Self, CliError> {
        let limit = match env.get(LIMIT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|l| *l > 0)
                .ok_or_else(|| {
                    CliError::Config(format!("{LIMIT_VAR} must be a positive integer, got '{raw}'"))
                })?,
            None => DEFAULT_LIMIT,
        };

        let dialect = match env.get(DIALECT_VAR) {
            Some(raw) => raw.parse::<DialectKind>().map_err(CliError::Config)?,
            None => DialectKind::default(),
        };

        let log = env.get(LOG_VAR).unwrap_or(DEFAULT_LOG).to_string();

        Ok(PagerConfig {
            limit,
            log,
            dialect,
        })
    }
}
