use std::fmt::Write;

use crate::Variable;

/// Render variables as canonical `NAME="VALUE"` lines in input order.
///
/// Backslashes, double quotes and line breaks inside values are escaped so
/// that parsing the output yields the same pairs. No trailing newline is
/// emitted.
pub fn serialize(entries: &[Variable]) -> String {
	let mut output = String::new();

	for (index, entry) in entries.iter().enumerate() {
		if index > 0 {
			output.push('\n');
		}
		let _ = write!(output, "{}=\"{}\"", entry.name, escape_value(&entry.value));
	}

	output
}

/// Escape a value for use between double quotes.
pub fn escape_value(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());

	for ch in value.chars() {
		match ch {
			'"' | '\\' => {
				escaped.push('\\');
				escaped.push(ch);
			}
			'\n' => escaped.push_str("\\n"),
			'\r' => escaped.push_str("\\r"),
			_ => escaped.push(ch),
		}
	}

	escaped
}
