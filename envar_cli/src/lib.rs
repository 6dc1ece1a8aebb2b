use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use envar_core::Diagnostic;
use envar_core::DiagnosticKind;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Check, format, and merge KEY=\"VALUE\" environment variable files.",
	long_about = "envar validates environment variable files written as KEY=\"VALUE\" lines and \
	              merges an edited copy against a baseline that changed in the meantime, without \
	              losing local edits.\n\nQuick start:\n  envar check .env    Report invalid \
	              lines and names\n  envar fmt .env      Print the canonical form\n  envar merge \
	              ...     Reconcile a draft against an updated baseline\n  envar init          \
	              Create an envar.toml"
)]
pub struct EnvarCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory used to discover `envar.toml`.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `envar.toml` in the project root.
	///
	/// If the file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Report invalid lines, invalid names, invalid values, and duplicated
	/// names in an environment file.
	///
	/// Exits with a non-zero status code when any error is found. Duplicated
	/// names are warnings unless `[check] duplicates_are_errors` is set.
	Check {
		/// The file to check.
		file: PathBuf,

		/// A baseline file. Names already defined there are reported as
		/// `already-defined-name`.
		#[arg(long)]
		baseline: Option<PathBuf>,

		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print an environment file in its canonical `KEY="VALUE"` form.
	Fmt {
		/// The file to format.
		file: PathBuf,

		/// Exit with a non-zero status code and show a diff when the file is
		/// not already formatted.
		#[arg(long, default_value_t = false, conflicts_with = "write")]
		check: bool,

		/// Rewrite the file in place instead of printing it.
		#[arg(long, default_value_t = false)]
		write: bool,
	},
	/// Reconcile an edited draft against an updated baseline.
	///
	/// Starts editing from `--baseline`, applies `--draft` as the user's
	/// edits, then reconciles against `--updated`. Untouched entries take the
	/// updated values, local edits are kept, and deletions confirmed by the
	/// updated baseline are dropped.
	Merge {
		/// The baseline the draft was started from.
		#[arg(long)]
		baseline: PathBuf,

		/// The edited draft.
		#[arg(long)]
		draft: PathBuf,

		/// The baseline as it is now.
		#[arg(long)]
		updated: PathBuf,

		/// Output format. `text` prints the merged file, `json` prints every
		/// entry with its status.
		#[arg(long, value_enum, default_value_t = MergeOutputFormat::Text)]
		format: MergeOutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format. Emits `::warning` or `::error`
	/// annotations that appear inline on pull request diffs.
	Github,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MergeOutputFormat {
	/// The merged file as `KEY="VALUE"` lines.
	Text,
	/// Every entry with its status, tombstones included.
	Json,
}

/// Human-readable message for a diagnostic.
pub fn diagnostic_message(diagnostic: &Diagnostic) -> String {
	let name = diagnostic.name.as_deref().unwrap_or_default();

	match diagnostic.kind {
		DiagnosticKind::InvalidLine => {
			"this line is not valid, the correct pattern is KEY=\"VALUE\"".to_string()
		}
		DiagnosticKind::InvalidName => format!("`{name}` is not a valid variable name"),
		DiagnosticKind::InvalidValue => {
			"the value is not valid, if you use quotes, you need to escape them like this \\\" or \
			 quote the whole value"
				.to_string()
		}
		DiagnosticKind::DuplicateName => {
			format!("be careful, the name `{name}` is already defined")
		}
		DiagnosticKind::AlreadyDefinedName => format!("name `{name}` is already defined"),
	}
}

/// Remediation hint for a diagnostic.
pub fn diagnostic_help(diagnostic: &Diagnostic) -> &'static str {
	match diagnostic.kind {
		DiagnosticKind::InvalidLine => "write the line as KEY=\"VALUE\" or remove it",
		DiagnosticKind::InvalidName => {
			"names must start with a letter or `_` and contain only letters, digits, and `_`"
		}
		DiagnosticKind::InvalidValue => "wrap the whole value in double quotes and escape inner ones",
		DiagnosticKind::DuplicateName => "the last assignment wins, remove the others",
		DiagnosticKind::AlreadyDefinedName => "edit the existing variable instead",
	}
}
