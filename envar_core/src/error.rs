use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum EnvarError {
	#[error(transparent)]
	#[diagnostic(code(envar::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(envar::config_parse),
		help("check that envar.toml is valid TOML with [names], [parse], [check] and/or [cache] sections")
	)]
	ConfigParse(String),

	#[error("`{0}` is not a valid variable name")]
	#[diagnostic(
		code(envar::invalid_name),
		help("names must start with a letter or `_` and contain only letters, digits, and `_`")
	)]
	InvalidName(String),

	#[error("variable `{0}` is already defined")]
	#[diagnostic(
		code(envar::already_defined_name),
		help("change the value of the existing `{0}` entry instead of creating a new one")
	)]
	AlreadyDefinedName(String),

	#[error("the expert text has {0} error(s)")]
	#[diagnostic(
		code(envar::invalid_expert_text),
		help("fix every line reported as invalid, the correct pattern is KEY=\"VALUE\"")
	)]
	InvalidExpertText(usize),

	#[error("expert text can only be edited in expert mode")]
	#[diagnostic(
		code(envar::not_in_expert_mode),
		help("switch the editor to expert mode first")
	)]
	NotInExpertMode,

	#[error("`{path}` has {count} invalid line(s)")]
	#[diagnostic(
		code(envar::invalid_file),
		help("run `envar check` on the file to see every diagnostic")
	)]
	InvalidFile { path: String, count: usize },
}

pub type EnvarResult<T> = Result<T, EnvarError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
