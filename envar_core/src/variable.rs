use derive_more::Deref;
use derive_more::DerefMut;
use derive_more::IntoIterator;
use serde::Deserialize;
use serde::Serialize;

/// A single environment variable.
///
/// The name is expected to satisfy the identifier rules checked by
/// [`is_valid_name`](crate::is_valid_name). Uniqueness is a property of the
/// containing [`VariableSet`], not of the variable itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
	pub name: String,
	pub value: String,
}

impl Variable {
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

/// An ordered sequence of variables.
///
/// Order is significant: it is the order used when serializing, so existing
/// entries keep their position and new ones are appended.
#[derive(
	Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref, DerefMut, IntoIterator,
)]
#[serde(transparent)]
#[into_iterator(owned, ref)]
pub struct VariableSet(
	#[deref]
	#[deref_mut]
	Vec<Variable>,
);

impl VariableSet {
	/// Find a variable by name. When the set holds duplicates the last one
	/// wins, matching how a shell would evaluate the assignments.
	pub fn get(&self, name: &str) -> Option<&Variable> {
		self.0.iter().rev().find(|variable| variable.name == name)
	}
}

impl From<Vec<Variable>> for VariableSet {
	fn from(variables: Vec<Variable>) -> Self {
		Self(variables)
	}
}

impl FromIterator<Variable> for VariableSet {
	fn from_iter<T: IntoIterator<Item = Variable>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<N, V> FromIterator<(N, V)> for VariableSet
where
	N: Into<String>,
	V: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(name, value)| Variable::new(name, value))
				.collect(),
		)
	}
}
