use serde::Deserialize;
use serde::Serialize;

use crate::NameRules;
use crate::Variable;
use crate::VariableSet;
use crate::lexer::ValueShape;
use crate::lexer::lex_value;

/// The result of parsing a single non-blank line of expert mode text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParsedLine {
	/// A well formed `NAME=VALUE` assignment.
	Valid {
		name: String,
		value: String,
		line: usize,
	},
	/// The line is not an assignment at all, or opens a quote it never
	/// closes.
	InvalidLine { raw: String, line: usize },
	/// The assignment is well formed but the name fails the identifier rules.
	InvalidName { name: String, line: usize },
	/// The value breaks the quoting contract.
	InvalidValue { raw: String, line: usize },
}

impl ParsedLine {
	/// 1-indexed line number in the source text.
	pub fn line(&self) -> usize {
		match self {
			Self::Valid { line, .. }
			| Self::InvalidLine { line, .. }
			| Self::InvalidName { line, .. }
			| Self::InvalidValue { line, .. } => *line,
		}
	}

	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Valid { .. })
	}

	/// The variable name when the line got far enough to have one.
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Valid { name, .. } | Self::InvalidName { name, .. } => Some(name),
			Self::InvalidLine { .. } | Self::InvalidValue { .. } => None,
		}
	}

	pub fn to_variable(&self) -> Option<Variable> {
		match self {
			Self::Valid { name, value, .. } => Some(Variable::new(name, value)),
			_ => None,
		}
	}
}

/// Options controlling how expert mode text is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
	/// Rules used to validate the name half of each assignment.
	pub name_rules: NameRules,
	/// When true, lines starting with `#` are skipped.
	pub comments: bool,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self {
			name_rules: NameRules::Posix,
			comments: true,
		}
	}
}

/// Parse expert mode text into one result per non-blank line using the
/// default options.
pub fn parse(text: impl AsRef<str>) -> Vec<ParsedLine> {
	parse_with_options(text, &ParseOptions::default())
}

/// Parse expert mode text into one result per non-blank line.
///
/// Blank lines (and comment lines when enabled) produce nothing. Every other
/// line produces exactly one [`ParsedLine`], so a malformed line is reported
/// instead of dropped.
pub fn parse_with_options(text: impl AsRef<str>, options: &ParseOptions) -> Vec<ParsedLine> {
	let text = text.as_ref();
	let mut lines = vec![];

	for (index, raw) in text.split('\n').enumerate() {
		let raw = raw.strip_suffix('\r').unwrap_or(raw);
		let trimmed = raw.trim();

		if trimmed.is_empty() || (options.comments && trimmed.starts_with('#')) {
			continue;
		}

		let parsed = parse_line(raw, index + 1, options);
		if !parsed.is_valid() {
			tracing::trace!(line = parsed.line(), ?parsed, "rejected line");
		}
		lines.push(parsed);
	}

	tracing::debug!(count = lines.len(), "parsed environment text");
	lines
}

fn parse_line(raw: &str, line: usize, options: &ParseOptions) -> ParsedLine {
	let Some((name, value)) = raw.split_once('=') else {
		return ParsedLine::InvalidLine {
			raw: raw.to_string(),
			line,
		};
	};

	let name = name.trim();
	let value = match lex_value(value.trim()) {
		ValueShape::Value(value) => value,
		ValueShape::Unterminated => {
			return ParsedLine::InvalidLine {
				raw: raw.to_string(),
				line,
			};
		}
		ValueShape::Malformed => {
			return ParsedLine::InvalidValue {
				raw: raw.to_string(),
				line,
			};
		}
	};

	if !options.name_rules.is_valid(name) {
		return ParsedLine::InvalidName {
			name: name.to_string(),
			line,
		};
	}

	ParsedLine::Valid {
		name: name.to_string(),
		value,
		line,
	}
}

/// Collect the valid entries of a parsed document, in source order.
/// Duplicated names are all kept.
pub fn valid_variables(lines: &[ParsedLine]) -> VariableSet {
	lines.iter().filter_map(ParsedLine::to_variable).collect()
}
