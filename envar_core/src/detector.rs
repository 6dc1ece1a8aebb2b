use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::NameRules;
use crate::ParsedLine;
use crate::Variable;

/// The kind of problem a [`Diagnostic`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
	/// The line does not match the `NAME=VALUE` assignment grammar.
	InvalidLine,
	/// The name fails the identifier rules.
	InvalidName,
	/// The value has malformed quoting.
	InvalidValue,
	/// The name appears more than once in the same set.
	DuplicateName,
	/// A new name collides with an existing baseline entry.
	AlreadyDefinedName,
}

/// How seriously a [`Diagnostic`] should be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Warning,
	Error,
}

impl DiagnosticKind {
	/// Duplicates are only a warning: the text can still be applied and the
	/// last assignment wins. Everything else blocks applying the text.
	pub fn severity(self) -> Severity {
		match self {
			Self::DuplicateName => Severity::Warning,
			Self::InvalidLine | Self::InvalidName | Self::InvalidValue | Self::AlreadyDefinedName => {
				Severity::Error
			}
		}
	}

	/// Stable identifier for this kind, e.g. `invalid-line`.
	pub fn code(self) -> &'static str {
		match self {
			Self::InvalidLine => "invalid-line",
			Self::InvalidName => "invalid-name",
			Self::InvalidValue => "invalid-value",
			Self::DuplicateName => "duplicate-name",
			Self::AlreadyDefinedName => "already-defined-name",
		}
	}
}

/// A structured problem report. No message text is attached; rendering is
/// left to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
	/// 1-indexed line number, when the diagnostic comes from parsed text.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub line: Option<usize>,
	pub kind: DiagnosticKind,
	/// The variable name involved, when known.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}

impl Diagnostic {
	pub fn severity(&self) -> Severity {
		self.kind.severity()
	}

	pub fn is_error(&self) -> bool {
		self.severity() == Severity::Error
	}
}

/// A draft name that already exists in the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
	pub name: String,
	pub kind: DiagnosticKind,
}

/// Count every name that appears more than once. Names appearing only once
/// are not included.
pub fn find_duplicates(entries: &[Variable]) -> BTreeMap<String, usize> {
	let mut counts: BTreeMap<String, usize> = BTreeMap::new();
	for entry in entries {
		*counts.entry(entry.name.clone()).or_default() += 1;
	}
	counts.retain(|_, count| *count > 1);
	counts
}

/// Report the draft names that are already defined in the baseline.
///
/// Names that are duplicated inside the draft are not reported here: the
/// duplicate is the stronger local error and is reported by
/// [`find_duplicates`] instead. Each name is reported at most once, in draft
/// order.
pub fn find_conflicts(draft: &[Variable], baseline: &[Variable]) -> Vec<ConflictReport> {
	let existing: HashSet<&str> = baseline.iter().map(|entry| entry.name.as_str()).collect();
	let duplicates = find_duplicates(draft);
	let mut reported = HashSet::new();

	draft
		.iter()
		.filter(|entry| existing.contains(entry.name.as_str()))
		.filter(|entry| !duplicates.contains_key(&entry.name))
		.filter(|entry| reported.insert(entry.name.clone()))
		.map(|entry| ConflictReport {
			name: entry.name.clone(),
			kind: DiagnosticKind::AlreadyDefinedName,
		})
		.collect()
}

/// Validate a name typed into the "create variable" form.
pub fn check_new_name<'a>(
	name: &str,
	existing: impl IntoIterator<Item = &'a str>,
	rules: NameRules,
) -> Option<DiagnosticKind> {
	if !rules.is_valid(name) {
		return Some(DiagnosticKind::InvalidName);
	}

	if existing.into_iter().any(|existing| existing == name) {
		return Some(DiagnosticKind::AlreadyDefinedName);
	}

	None
}

/// One diagnostic per occurrence of every duplicated name among the valid
/// lines, so each offending line can be highlighted.
pub fn duplicate_diagnostics(lines: &[ParsedLine]) -> Vec<Diagnostic> {
	let variables: Vec<Variable> = lines.iter().filter_map(ParsedLine::to_variable).collect();
	let duplicates = find_duplicates(&variables);

	lines
		.iter()
		.filter_map(|parsed| match parsed {
			ParsedLine::Valid { name, line, .. } if duplicates.contains_key(name) => {
				Some(Diagnostic {
					line: Some(*line),
					kind: DiagnosticKind::DuplicateName,
					name: Some(name.clone()),
				})
			}
			_ => None,
		})
		.collect()
}

/// Every diagnostic for a parsed document, ordered by line.
pub fn diagnose(lines: &[ParsedLine]) -> Vec<Diagnostic> {
	let mut diagnostics: Vec<Diagnostic> = lines
		.iter()
		.filter_map(|parsed| {
			let (kind, name) = match parsed {
				ParsedLine::Valid { .. } => return None,
				ParsedLine::InvalidLine { .. } => (DiagnosticKind::InvalidLine, None),
				ParsedLine::InvalidName { name, .. } => {
					(DiagnosticKind::InvalidName, Some(name.clone()))
				}
				ParsedLine::InvalidValue { .. } => (DiagnosticKind::InvalidValue, None),
			};

			Some(Diagnostic {
				line: Some(parsed.line()),
				kind,
				name,
			})
		})
		.collect();

	diagnostics.extend(duplicate_diagnostics(lines));
	diagnostics.sort_by_key(|diagnostic| (diagnostic.line, diagnostic.kind));
	diagnostics
}

/// Like [`diagnose`], additionally flagging valid lines whose name is already
/// defined in `baseline`. A duplicated name is only reported as a duplicate.
pub fn diagnose_against(lines: &[ParsedLine], baseline: &[Variable]) -> Vec<Diagnostic> {
	let mut diagnostics = diagnose(lines);
	let variables: Vec<Variable> = lines.iter().filter_map(ParsedLine::to_variable).collect();
	let conflicting: HashSet<String> = find_conflicts(&variables, baseline)
		.into_iter()
		.map(|conflict| conflict.name)
		.collect();

	for parsed in lines {
		if let ParsedLine::Valid { name, line, .. } = parsed {
			if conflicting.contains(name) {
				diagnostics.push(Diagnostic {
					line: Some(*line),
					kind: DiagnosticKind::AlreadyDefinedName,
					name: Some(name.clone()),
				});
			}
		}
	}

	diagnostics.sort_by_key(|diagnostic| (diagnostic.line, diagnostic.kind));
	diagnostics
}
