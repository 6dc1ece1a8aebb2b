use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use envar_cli::Commands;
use envar_cli::EnvarCli;
use envar_cli::MergeOutputFormat;
use envar_cli::OutputFormat;
use envar_cli::diagnostic_help;
use envar_cli::diagnostic_message;
use envar_core::Diagnostic;
use envar_core::EntryStatus;
use envar_core::EnvarConfig;
use envar_core::EnvarError;
use envar_core::ParsedLine;
use envar_core::VariableSet;
use envar_core::apply_entries;
use envar_core::diagnose;
use envar_core::diagnose_against;
use envar_core::parse_with_options;
use envar_core::reconcile;
use envar_core::serialize;
use envar_core::start_editing;
use envar_core::to_serialized_set;
use envar_core::valid_variables;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = EnvarCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Check {
			file,
			baseline,
			format,
		}) => run_check(&args, file, baseline.as_deref(), *format),
		Some(Commands::Fmt { file, check, write }) => run_fmt(&args, file, *check, *write),
		Some(Commands::Merge {
			baseline,
			draft,
			updated,
			format,
		}) => run_merge(&args, baseline, draft, updated, *format),
		None => {
			eprintln!("No subcommand specified. Run `envar --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<EnvarError>() {
			Ok(envar_err) => {
				let report: miette::Report = (*envar_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr so they never mix with formatted output. `RUST_LOG`
/// takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init();
}

fn resolve_root(args: &EnvarCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &EnvarCli) -> Result<EnvarConfig, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = EnvarConfig::load(&root)?.unwrap_or_default();
	tracing::debug!(?config, "resolved config");
	Ok(config)
}

fn read_lines(path: &Path, config: &EnvarConfig) -> Result<Vec<ParsedLine>, EnvarError> {
	let content = std::fs::read_to_string(path)?;
	Ok(parse_with_options(content, &config.parse_options()))
}

/// Read a file that must be free of blocking diagnostics.
fn read_variables(path: &Path, config: &EnvarConfig) -> Result<VariableSet, EnvarError> {
	let lines = read_lines(path, config)?;
	let count = diagnose(&lines)
		.iter()
		.filter(|diagnostic| config.is_blocking(diagnostic))
		.count();

	if count > 0 {
		return Err(EnvarError::InvalidFile {
			path: path.display().to_string(),
			count,
		});
	}

	Ok(valid_variables(&lines))
}

fn run_init(args: &EnvarCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config_path = root.join("envar.toml");

	if config_path.exists() {
		println!("Config file already exists: {}", config_path.display());
		return Ok(());
	}

	let sample_config = "# envar configuration\n\n# Variable name rules: \"posix\" \
	                     ([A-Za-z_][A-Za-z0-9_]*) or \"relaxed\" (also allows `.` and `-`).\n[names]\n\
	                     rules = \"posix\"\n\n# Skip lines starting with `#`.\n[parse]\ncomments = \
	                     true\n\n# Fail checks on duplicated names instead of warning.\n[check]\n\
	                     duplicates_are_errors = false\n\n# Parsed documents kept per editing \
	                     session.\n[cache]\ncapacity = 16\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());

	Ok(())
}

fn run_check(
	args: &EnvarCli,
	file: &Path,
	baseline: Option<&Path>,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(args)?;
	let lines = read_lines(file, &config)?;

	let diagnostics = match baseline {
		Some(baseline) => diagnose_against(&lines, &read_variables(baseline, &config)?),
		None => diagnose(&lines),
	};

	let errors = diagnostics
		.iter()
		.filter(|diagnostic| config.is_blocking(diagnostic))
		.count();
	let warnings = diagnostics.len() - errors;
	let variable_count = lines.iter().filter(|line| line.is_valid()).count();
	let file_label = file.display().to_string();

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = diagnostics
				.iter()
				.map(|diagnostic| {
					let severity = if config.is_blocking(diagnostic) {
						"error"
					} else {
						"warning"
					};
					serde_json::json!({
						"line": diagnostic.line,
						"kind": diagnostic.kind,
						"name": diagnostic.name,
						"severity": severity,
						"message": diagnostic_message(diagnostic),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": errors == 0,
				"file": file_label,
				"variables": variable_count,
				"diagnostics": entries,
			});
			println!("{output}");
		}
		OutputFormat::Github => {
			for diagnostic in &diagnostics {
				let level = if config.is_blocking(diagnostic) {
					"error"
				} else {
					"warning"
				};
				println!(
					"::{level} file={file_label},line={}::{}",
					diagnostic.line.unwrap_or(1),
					diagnostic_message(diagnostic)
				);
			}
			eprintln!("{errors} error(s), {warnings} warning(s)");
		}
		OutputFormat::Text => {
			for diagnostic in &diagnostics {
				let report =
					diagnostic_to_report(diagnostic, &file_label, config.is_blocking(diagnostic));
				eprintln!("{report:?}");
			}

			if errors == 0 {
				println!(
					"{} {file_label}: {variable_count} variable(s), {warnings} warning(s)",
					colored!("Check passed:", green),
				);
			} else {
				eprintln!(
					"{} {file_label}: {errors} error(s), {warnings} warning(s)",
					colored!("Check failed:", red)
				);
			}
		}
	}

	if errors > 0 {
		process::exit(1);
	}

	Ok(())
}

fn run_fmt(
	args: &EnvarCli,
	file: &Path,
	check: bool,
	write: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(args)?;
	let current = std::fs::read_to_string(file)?;
	let variables = read_variables(file, &config)?;

	// Duplicates collapse into the first position with the last value.
	let state = apply_entries(&start_editing(&VariableSet::default()), &variables);
	let mut formatted = serialize(&to_serialized_set(&state));
	if !formatted.is_empty() {
		formatted.push('\n');
	}

	if check {
		if current == formatted {
			println!("{} is formatted.", file.display());
			return Ok(());
		}

		eprintln!("{} is not formatted:", file.display());
		print_diff(&current, &formatted);
		process::exit(1);
	}

	if write {
		if current != formatted {
			std::fs::write(file, &formatted)?;
			println!("Formatted {}", file.display());
		}
		return Ok(());
	}

	print!("{formatted}");
	Ok(())
}

fn run_merge(
	args: &EnvarCli,
	baseline: &Path,
	draft: &Path,
	updated: &Path,
	format: MergeOutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(args)?;
	let baseline = read_variables(baseline, &config)?;
	let draft = read_variables(draft, &config)?;
	let updated = read_variables(updated, &config)?;

	let state = start_editing(&baseline);
	let state = apply_entries(&state, &draft);
	let state = reconcile(&state, &updated);

	match format {
		MergeOutputFormat::Json => {
			let output = serde_json::json!({
				"changed": state.has_changes(),
				"entries": state.entries(),
			});
			println!("{output}");
		}
		MergeOutputFormat::Text => {
			let merged = serialize(&to_serialized_set(&state));
			if !merged.is_empty() {
				println!("{merged}");
			}

			for entry in state.entries() {
				let marker = match entry.status {
					EntryStatus::Unchanged => continue,
					EntryStatus::Added => colored!("added", green),
					EntryStatus::Modified => colored!("modified", yellow),
					EntryStatus::Deleted => colored!("deleted", red),
				};
				eprintln!("  {marker:<10} {}", entry.name);
			}
		}
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Convert a `Diagnostic` into a `miette::Report` with appropriate severity,
/// error code, and help text for rich terminal display.
fn diagnostic_to_report(diagnostic: &Diagnostic, file: &str, is_error: bool) -> miette::Report {
	let location = match diagnostic.line {
		Some(line) => format!("{file}:{line}"),
		None => file.to_string(),
	};
	let severity = if is_error {
		miette::Severity::Error
	} else {
		miette::Severity::Warning
	};
	let code = format!("envar::{}", diagnostic.kind.code().replace('-', "_"));

	let message = format!("[{location}] {}", diagnostic_message(diagnostic));
	let diag_value = miette::MietteDiagnostic::new(message)
		.with_code(code)
		.with_help(diagnostic_help(diagnostic))
		.with_severity(severity);
	miette::Report::new(diag_value)
}
