//! CLI configuration handling.
//!
//! Settings are merged with this precedence, highest first: command-line
//! flags, environment variables (including a `.env` file), `rolegen.toml`,
//! built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use rolegen_core::writer::DEFAULT_OUTPUT_DIR;
use rolegen_core::{CompileOptions, FilterSemantics, TableOrder, compiler::DEFAULT_CREATED_BY};

use crate::cli::CompileArgs;
use crate::error::{CliError, CliResult};

/// Default config file name (lives in the working directory)
pub const CONFIG_FILE_NAME: &str = "rolegen.toml";

/// rolegen configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the security matrix is read from
    pub source: SourceConfig,

    /// Where role scripts are written
    pub target: TargetConfig,

    /// How roles are compiled
    pub compile: CompileConfig,
}

impl Config {
    /// Load configuration from a file, expanding `${VAR}` references.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration text, expanding `${VAR}` references.
    pub fn parse(content: &str) -> CliResult<Self> {
        Ok(toml::from_str(&expand_env_vars(content))?)
    }

    /// Load `path` if given, else `rolegen.toml` in `dir` if it exists, else defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = dir.join(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Merge compile flags over the `[compile]` and `[target]` sections.
    pub fn compile_options(&self, args: &CompileArgs) -> CompileOptions {
        CompileOptions::new()
            .semantics(args.semantics.unwrap_or(self.compile.semantics))
            .order(args.order.unwrap_or(self.compile.order))
            .dedupe_column_hides(args.dedupe_columns || self.compile.dedupe_columns)
            .created_by(
                args.created_by
                    .clone()
                    .or_else(|| self.target.created_by.clone())
                    .unwrap_or_else(|| DEFAULT_CREATED_BY.to_string()),
            )
    }

    /// Resolve the output directory.
    pub fn output_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.target.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Resolve the target dataset, if any.
    pub fn dataset(&self, flag: Option<&str>) -> Option<String> {
        flag.map(String::from)
            .or_else(|| self.target.dataset.clone())
            .filter(|d| !d.trim().is_empty())
    }
}

/// Matrix source configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// JSON file holding the matrix
    pub input: Option<PathBuf>,

    /// SQL Server connection string
    pub connection_string: Option<String>,

    /// SQL Server host
    pub server: Option<String>,

    /// Database name
    pub database: Option<String>,

    /// SQL Server login
    pub username: Option<String>,

    /// SQL Server password
    pub password: Option<String>,

    /// Security matrix table
    pub table: Option<String>,

    /// Trust the server certificate
    pub trust_cert: bool,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    /// Target dataset name
    pub dataset: Option<String>,

    /// Output directory
    pub output_dir: Option<PathBuf>,

    /// Value of the created_by annotation
    pub created_by: Option<String>,
}

/// Compile configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    /// Filter semantics
    pub semantics: FilterSemantics,

    /// Emission order
    pub order: TableOrder,

    /// Emit each hidden column once
    pub dedupe_columns: bool,
}

/// Expand environment variables in the format `${VAR_NAME}`.
///
/// Unset variables are left as written.
pub fn expand_env_vars(content: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex");
    re.replace_all(content, |caps: &regex_lite::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.compile.semantics, FilterSemantics::AndAll);
        assert_eq!(config.compile.order, TableOrder::Sorted);
        assert_eq!(config.output_dir(None), PathBuf::from("Roles"));
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [source]
            server = "sql01\\BI"
            database = "Security"
            table = "dbo.SecurityMatrix"

            [target]
            dataset = "Sales Model"
            output_dir = "out/roles"
            created_by = "pipeline"

            [compile]
            semantics = "or-within-column"
            order = "first-seen"
            dedupe_columns = true
            "#,
        )
        .unwrap();

        assert_eq!(config.source.server.as_deref(), Some("sql01\\BI"));
        assert_eq!(config.dataset(None).as_deref(), Some("Sales Model"));
        assert_eq!(config.output_dir(None), PathBuf::from("out/roles"));

        let options = config.compile_options(&CompileArgs::default());
        assert_eq!(options.semantics, FilterSemantics::OrWithinColumn);
        assert_eq!(options.order, TableOrder::FirstSeen);
        assert!(options.dedupe_column_hides);
        assert_eq!(options.created_by, "pipeline");
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config::parse(
            r#"
            [target]
            dataset = "FromFile"
            created_by = "file"
            "#,
        )
        .unwrap();

        assert_eq!(config.dataset(Some("FromFlag")).as_deref(), Some("FromFlag"));
        assert_eq!(
            config.output_dir(Some(Path::new("flag-dir"))),
            PathBuf::from("flag-dir")
        );

        let args = CompileArgs {
            created_by: Some("flag".to_string()),
            semantics: Some(FilterSemantics::OrWithinColumn),
            ..CompileArgs::default()
        };
        let options = config.compile_options(&args);
        assert_eq!(options.created_by, "flag");
        assert_eq!(options.semantics, FilterSemantics::OrWithinColumn);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::parse("[source]\nhost = \"x\"\n").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_empty_dataset_is_none() {
        let config = Config::parse("[target]\ndataset = \"  \"\n").unwrap();
        assert_eq!(config.dataset(None), None);
    }

    #[test]
    fn test_env_var_expansion() {
        // SAFETY: the variable name is unique to this test.
        unsafe {
            std::env::set_var("ROLEGEN_TEST_EXPAND_DB", "SecurityDb");
        }
        let expanded = expand_env_vars("database = \"${ROLEGEN_TEST_EXPAND_DB}\"");
        assert_eq!(expanded, "database = \"SecurityDb\"");

        let untouched = expand_env_vars("x = \"${ROLEGEN_TEST_SURELY_UNSET_VAR}\"");
        assert_eq!(untouched, "x = \"${ROLEGEN_TEST_SURELY_UNSET_VAR}\"");
    }

    #[test]
    fn test_discover_without_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_discover_missing_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = Config::discover(Some(&dir.path().join("nope.toml")), dir.path());
        assert!(result.is_err());
    }
}
