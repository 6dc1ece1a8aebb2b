use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DEFAULT_CACHE_CAPACITY;
use crate::Diagnostic;
use crate::DiagnosticKind;
use crate::EnvarError;
use crate::EnvarResult;
use crate::NameRules;
use crate::ParseOptions;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["envar.toml", ".envar.toml", ".config/envar.toml"];

/// Configuration loaded from an `envar.toml` file.
///
/// ```toml
/// [names]
/// rules = "posix"
///
/// [parse]
/// comments = true
///
/// [check]
/// duplicates_are_errors = false
///
/// [cache]
/// capacity = 16
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvarConfig {
	#[serde(default)]
	pub names: NamesConfig,
	#[serde(default)]
	pub parse: ParseConfig,
	#[serde(default)]
	pub check: CheckConfig,
	#[serde(default)]
	pub cache: CacheConfig,
}

/// Variable name validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamesConfig {
	/// `posix` (the default) or `relaxed`, which also accepts `.` and `-`.
	#[serde(default)]
	pub rules: NameRules,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseConfig {
	/// Skip lines starting with `#`. Defaults to `true`.
	#[serde(default = "default_true")]
	pub comments: bool,
}

impl Default for ParseConfig {
	fn default() -> Self {
		Self { comments: true }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
	/// Treat duplicated names as errors instead of warnings.
	#[serde(default)]
	pub duplicates_are_errors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
	/// Number of parsed documents an editor session keeps around.
	#[serde(default = "default_cache_capacity")]
	pub capacity: usize,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			capacity: DEFAULT_CACHE_CAPACITY,
		}
	}
}

fn default_true() -> bool {
	true
}

fn default_cache_capacity() -> usize {
	DEFAULT_CACHE_CAPACITY
}

impl EnvarConfig {
	/// Return the first config file found at `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> EnvarResult<Option<EnvarConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;

		Ok(Some(config))
	}

	pub fn from_toml(content: &str) -> EnvarResult<EnvarConfig> {
		toml::from_str(content).map_err(|e| EnvarError::ConfigParse(e.to_string()))
	}

	/// The parser options described by this config.
	pub fn parse_options(&self) -> ParseOptions {
		ParseOptions {
			name_rules: self.names.rules,
			comments: self.parse.comments,
		}
	}

	/// Whether `diagnostic` should block applying text or fail a check.
	pub fn is_blocking(&self, diagnostic: &Diagnostic) -> bool {
		diagnostic.is_error()
			|| (self.check.duplicates_are_errors && diagnostic.kind == DiagnosticKind::DuplicateName)
	}
}
