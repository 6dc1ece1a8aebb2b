//! The edit state machine.
//!
//! Every entry of a draft carries a status relative to the baseline it was
//! last reconciled against. All operations are pure: they take an
//! [`EditState`] by reference and return a new one, so a caller can keep the
//! previous state around (for undo, or to diff two renders) without any
//! aliasing.
//!
//! The guarantees upheld here are that a user never silently loses an edit
//! and that a deletion confirmed by the baseline is never silently
//! resurrected.

use std::collections::HashMap;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::Variable;
use crate::VariableSet;

/// Status of a draft entry relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
	/// Present in the baseline with the same value.
	Unchanged,
	/// Absent from the baseline.
	Added,
	/// Present in the baseline with a different value.
	Modified,
	/// Present in the baseline but removed from the draft. The entry is kept
	/// as a tombstone so it can be restored with [`keep`].
	Deleted,
}

/// A single entry of the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntry {
	pub name: String,
	pub value: String,
	pub status: EntryStatus,
}

impl DraftEntry {
	pub fn to_variable(&self) -> Variable {
		Variable::new(&self.name, &self.value)
	}
}

/// A working draft together with the baseline its statuses refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditState {
	entries: Vec<DraftEntry>,
	baseline: VariableSet,
}

impl EditState {
	/// Draft entries in display order, tombstones included.
	pub fn entries(&self) -> &[DraftEntry] {
		&self.entries
	}

	/// The baseline the statuses are relative to.
	pub fn baseline(&self) -> &VariableSet {
		&self.baseline
	}

	pub fn get(&self, name: &str) -> Option<&DraftEntry> {
		self.entries.iter().find(|entry| entry.name == name)
	}

	pub fn status(&self, name: &str) -> Option<EntryStatus> {
		self.get(name).map(|entry| entry.status)
	}

	/// True when any entry differs from the baseline.
	pub fn has_changes(&self) -> bool {
		self.entries
			.iter()
			.any(|entry| entry.status != EntryStatus::Unchanged)
	}

	/// Names of the entries that would be submitted (tombstones excluded).
	pub fn live_names(&self) -> impl Iterator<Item = &str> {
		self.entries
			.iter()
			.filter(|entry| entry.status != EntryStatus::Deleted)
			.map(|entry| entry.name.as_str())
	}

	fn position(&self, name: &str) -> Option<usize> {
		self.entries.iter().position(|entry| entry.name == name)
	}

	fn set_value_mut(&mut self, name: &str, value: &str) {
		let status = status_against(&self.baseline, name, value);

		if let Some(index) = self.position(name) {
			let entry = &mut self.entries[index];
			entry.value = value.to_string();
			entry.status = status;
		} else {
			self.entries.push(DraftEntry {
				name: name.to_string(),
				value: value.to_string(),
				status,
			});
		}
	}

	fn remove_mut(&mut self, name: &str) {
		let Some(index) = self.position(name) else {
			return;
		};

		match self.entries[index].status {
			EntryStatus::Added => {
				self.entries.remove(index);
			}
			EntryStatus::Unchanged | EntryStatus::Modified => {
				self.entries[index].status = EntryStatus::Deleted;
			}
			EntryStatus::Deleted => {}
		}
	}
}

/// Compute the status a live entry with `value` has against `baseline`.
fn status_against(baseline: &VariableSet, name: &str, value: &str) -> EntryStatus {
	match baseline.get(name) {
		None => EntryStatus::Added,
		Some(existing) if existing.value == value => EntryStatus::Unchanged,
		Some(_) => EntryStatus::Modified,
	}
}

/// Start a draft as a copy of `baseline` with every entry unchanged.
pub fn start_editing(baseline: &VariableSet) -> EditState {
	let mut seen = HashSet::new();
	let entries = baseline
		.iter()
		.filter(|variable| seen.insert(variable.name.as_str()))
		.filter_map(|variable| baseline.get(&variable.name))
		.map(|variable| DraftEntry {
			name: variable.name.clone(),
			value: variable.value.clone(),
			status: EntryStatus::Unchanged,
		})
		.collect();

	EditState {
		entries,
		baseline: baseline.clone(),
	}
}

/// Set the value of `name`, inserting it as added when missing.
///
/// Setting a value equal to the baseline value reverts the entry to
/// unchanged. Setting the value of a tombstone revives it.
pub fn set_value(state: &EditState, name: &str, value: &str) -> EditState {
	let mut next = state.clone();
	next.set_value_mut(name, value);
	next
}

/// Remove `name` from the draft.
///
/// An added entry never existed in the baseline and is dropped outright.
/// Any other entry becomes a tombstone. Unknown names are ignored.
pub fn remove(state: &EditState, name: &str) -> EditState {
	let mut next = state.clone();
	next.remove_mut(name);
	next
}

/// Restore a tombstone to the status it had before removal: unchanged when
/// its value matches the baseline, modified otherwise. Anything else is left
/// as is.
pub fn keep(state: &EditState, name: &str) -> EditState {
	let mut next = state.clone();

	if let Some(index) = next.position(name) {
		if next.entries[index].status == EntryStatus::Deleted {
			let status = status_against(&next.baseline, name, &next.entries[index].value);
			next.entries[index].status = status;
		}
	}

	next
}

/// Merge an externally updated baseline into the draft.
///
/// - Unchanged entries take the new baseline value, or disappear when the
///   baseline no longer has them.
/// - Added and modified entries keep the user's value and have their status
///   recomputed. An edit whose baseline entry vanished becomes added.
/// - Tombstones survive while the baseline still has the entry and are
///   dropped once the deletion is confirmed. A tombstone of an entry the
///   user never edited takes the new baseline value, so [`keep`] restores
///   it as unchanged.
/// - Baseline entries unknown to the draft are appended as unchanged.
///
/// Applying the same baseline twice is the same as applying it once.
pub fn reconcile(state: &EditState, new_baseline: &VariableSet) -> EditState {
	let mut seen: HashSet<&str> = HashSet::new();
	let mut entries = Vec::with_capacity(state.entries.len());
	let mut dropped = 0usize;

	for entry in &state.entries {
		seen.insert(entry.name.as_str());
		let incoming = new_baseline.get(&entry.name);

		match (entry.status, incoming) {
			(EntryStatus::Unchanged, Some(incoming)) => {
				entries.push(DraftEntry {
					name: entry.name.clone(),
					value: incoming.value.clone(),
					status: EntryStatus::Unchanged,
				});
			}
			(EntryStatus::Unchanged | EntryStatus::Deleted, None) => dropped += 1,
			(EntryStatus::Added | EntryStatus::Modified, _) => {
				entries.push(DraftEntry {
					name: entry.name.clone(),
					value: entry.value.clone(),
					status: status_against(new_baseline, &entry.name, &entry.value),
				});
			}
			(EntryStatus::Deleted, Some(incoming)) => {
				// A tombstone still holding the old baseline value was never
				// edited, so it follows the baseline like an unchanged entry.
				let untouched = state
					.baseline
					.get(&entry.name)
					.is_some_and(|previous| previous.value == entry.value);
				let value = if untouched {
					incoming.value.clone()
				} else {
					entry.value.clone()
				};
				entries.push(DraftEntry {
					name: entry.name.clone(),
					value,
					status: EntryStatus::Deleted,
				});
			}
		}
	}

	let mut appended = 0usize;
	for variable in new_baseline.iter() {
		if seen.insert(variable.name.as_str()) {
			let value = new_baseline
				.get(&variable.name)
				.map_or_else(String::new, |latest| latest.value.clone());
			entries.push(DraftEntry {
				name: variable.name.clone(),
				value,
				status: EntryStatus::Unchanged,
			});
			appended += 1;
		}
	}

	tracing::debug!(
		entries = entries.len(),
		dropped,
		appended,
		"reconciled draft against new baseline"
	);

	EditState {
		entries,
		baseline: new_baseline.clone(),
	}
}

/// Apply a complete set of entries, as produced by parsing expert mode text,
/// to the draft.
///
/// Names present in `entries` are set (the last occurrence of a duplicated
/// name wins). Names missing from `entries` are removed. Existing entries
/// keep their position and new names are appended in `entries` order.
pub fn apply_entries(state: &EditState, entries: &[Variable]) -> EditState {
	let mut order: Vec<&str> = vec![];
	let mut values: HashMap<&str, &str> = HashMap::new();

	for entry in entries {
		if values.insert(entry.name.as_str(), entry.value.as_str()).is_none() {
			order.push(entry.name.as_str());
		}
	}

	let mut next = state.clone();
	let missing: Vec<String> = next
		.live_names()
		.filter(|name| !values.contains_key(name))
		.map(ToString::to_string)
		.collect();

	for name in &missing {
		next.remove_mut(name);
	}

	for name in order {
		next.set_value_mut(name, values[&name]);
	}

	next
}

/// The set to submit or display: every entry except tombstones.
pub fn to_serialized_set(state: &EditState) -> VariableSet {
	state
		.entries
		.iter()
		.filter(|entry| entry.status != EntryStatus::Deleted)
		.map(DraftEntry::to_variable)
		.collect()
}
