use logos::Logos;

/// Raw tokens produced by logos for the value half of an assignment.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[regex(r#""([^"\\]|\\.)*""#)]
	DoubleQuoted,
	#[regex(r"'[^']*'")]
	SingleQuoted,
	/// A double quote that could not be paired with a closing one.
	#[token("\"")]
	DoubleQuote,
	/// A single quote that could not be paired with a closing one.
	#[token("'")]
	SingleQuote,
	#[regex(r#"[^"']+"#)]
	Text,
}

/// The outcome of lexing the text to the right of `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValueShape {
	/// A well formed value with quotes stripped and escapes resolved.
	Value(String),
	/// The value opens a quote that is never closed.
	Unterminated,
	/// A quote appears where the quoting contract does not allow one.
	Malformed,
}

/// Classify a raw value. `raw` should already be trimmed of surrounding
/// whitespace.
pub(crate) fn lex_value(raw: &str) -> ValueShape {
	if raw.is_empty() {
		return ValueShape::Value(String::new());
	}

	let tokens: Vec<_> = RawToken::lexer(raw).spanned().collect();
	let Some((first, span)) = tokens.first() else {
		return ValueShape::Value(String::new());
	};

	let slice = &raw[span.clone()];
	let single = tokens.len() == 1;

	match first {
		Ok(RawToken::DoubleQuote | RawToken::SingleQuote) => ValueShape::Unterminated,
		Ok(RawToken::DoubleQuoted) if single => {
			ValueShape::Value(unescape(&slice[1..slice.len() - 1]))
		}
		Ok(RawToken::SingleQuoted) if single => {
			ValueShape::Value(slice[1..slice.len() - 1].to_string())
		}
		Ok(RawToken::Text) if single => ValueShape::Value(slice.to_string()),
		// A quoted token only fails to match when its closing quote is missing.
		Err(()) if raw.starts_with(['"', '\'']) => ValueShape::Unterminated,
		Ok(RawToken::DoubleQuoted | RawToken::SingleQuoted | RawToken::Text) | Err(()) => {
			ValueShape::Malformed
		}
	}
}

/// Resolve `\"`, `\\`, `\n` and `\r` inside a double quoted value. Any other
/// backslash is kept as is.
fn unescape(inner: &str) -> String {
	if !inner.contains('\\') {
		return inner.to_string();
	}

	let mut value = String::with_capacity(inner.len());
	let mut chars = inner.chars().peekable();

	while let Some(ch) = chars.next() {
		if ch == '\\' {
			let resolved = match chars.peek() {
				Some(&next @ ('"' | '\\')) => Some(next),
				Some('n') => Some('\n'),
				Some('r') => Some('\r'),
				_ => None,
			};

			if let Some(resolved) = resolved {
				value.push(resolved);
				chars.next();
				continue;
			}
		}

		value.push(ch);
	}

	value
}
