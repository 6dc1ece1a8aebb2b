use serde::Deserialize;
use serde::Serialize;

/// The identifier rules a variable name is checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum NameRules {
	/// POSIX shell identifiers: `^[A-Za-z_][A-Za-z0-9_]*$`.
	#[default]
	Posix,
	/// POSIX identifiers that may also contain `.` and `-` after the first
	/// character, as used by Java style properties (`spring.profiles-active`).
	Relaxed,
}

impl NameRules {
	pub fn is_valid(self, name: &str) -> bool {
		let mut chars = name.chars();
		let Some(first) = chars.next() else {
			return false;
		};

		if !(first.is_ascii_alphabetic() || first == '_') {
			return false;
		}

		chars.all(|ch| self.is_valid_continuation(ch))
	}

	fn is_valid_continuation(self, ch: char) -> bool {
		match self {
			Self::Posix => ch.is_ascii_alphanumeric() || ch == '_',
			Self::Relaxed => ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'),
		}
	}
}

/// Check a candidate variable name against the POSIX identifier rules.
pub fn is_valid_name(name: &str) -> bool {
	NameRules::Posix.is_valid(name)
}
