//! An editing session over one variable set.
//!
//! The session glues the engine together the way the environment variable
//! form uses it: a simple mode editing one variable at a time, an expert mode
//! editing the whole set as text, and reset/update actions. Observers are
//! notified after every transition, which is how a rendering layer learns it
//! has to redraw.

use serde::Deserialize;
use serde::Serialize;

use crate::Diagnostic;
use crate::DiagnosticKind;
use crate::EditState;
use crate::EnvarConfig;
use crate::EnvarError;
use crate::EnvarResult;
use crate::ParseCache;
use crate::VariableSet;
use crate::apply_entries;
use crate::check_new_name;
use crate::diagnose;
use crate::reconcile;
use crate::serialize;
use crate::start_editing;
use crate::to_serialized_set;
use crate::valid_variables;

/// Which editor is currently showing the draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
	/// One input per variable.
	#[default]
	Simple,
	/// The whole set as `KEY="VALUE"` text.
	Expert,
}

/// A transition that happened in an [`EditorSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionEvent {
	/// The draft changed through an edit.
	Changed,
	/// The editor switched mode.
	ModeChanged(EditorMode),
	/// The draft was discarded and restarted from the baseline.
	Reset,
	/// The draft was handed over for saving.
	Submitted(VariableSet),
	/// A new baseline was reconciled into the draft.
	BaselineChanged,
}

/// Receives every [`SessionEvent`] together with the resulting state.
pub trait SessionObserver {
	fn notify(&mut self, event: &SessionEvent, state: &EditState);
}

impl<F> SessionObserver for F
where
	F: FnMut(&SessionEvent, &EditState),
{
	fn notify(&mut self, event: &SessionEvent, state: &EditState) {
		self(event, state);
	}
}

pub struct EditorSession {
	state: EditState,
	mode: EditorMode,
	config: EnvarConfig,
	cache: ParseCache,
	/// Diagnostics for the last expert text, empty outside expert mode.
	diagnostics: Vec<Diagnostic>,
	observers: Vec<Box<dyn SessionObserver>>,
}

impl std::fmt::Debug for EditorSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EditorSession")
			.field("state", &self.state)
			.field("mode", &self.mode)
			.field("config", &self.config)
			.field("diagnostics", &self.diagnostics)
			.field("observers", &self.observers.len())
			.finish_non_exhaustive()
	}
}

impl EditorSession {
	pub fn new(baseline: VariableSet) -> Self {
		Self::with_config(baseline, EnvarConfig::default())
	}

	pub fn with_config(baseline: VariableSet, config: EnvarConfig) -> Self {
		let cache = ParseCache::new(config.cache.capacity);

		Self {
			state: start_editing(&baseline),
			mode: EditorMode::default(),
			config,
			cache,
			diagnostics: vec![],
			observers: vec![],
		}
	}

	/// Register an observer notified after every transition.
	pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
		self.observers.push(Box::new(observer));
	}

	pub fn state(&self) -> &EditState {
		&self.state
	}

	pub fn baseline(&self) -> &VariableSet {
		self.state.baseline()
	}

	pub fn mode(&self) -> EditorMode {
		self.mode
	}

	pub fn config(&self) -> &EnvarConfig {
		&self.config
	}

	pub fn cache(&self) -> &ParseCache {
		&self.cache
	}

	/// Diagnostics produced by the last call to
	/// [`set_expert_text`](Self::set_expert_text).
	pub fn diagnostics(&self) -> &[Diagnostic] {
		&self.diagnostics
	}

	/// True when the draft differs from the baseline.
	pub fn is_dirty(&self) -> bool {
		self.state.has_changes()
	}

	pub fn set_value(&mut self, name: &str, value: &str) {
		self.state = crate::set_value(&self.state, name, value);
		self.emit(&SessionEvent::Changed);
	}

	pub fn remove(&mut self, name: &str) {
		self.state = crate::remove(&self.state, name);
		self.emit(&SessionEvent::Changed);
	}

	pub fn keep(&mut self, name: &str) {
		self.state = crate::keep(&self.state, name);
		self.emit(&SessionEvent::Changed);
	}

	/// Add a new variable from the creation form.
	///
	/// The name must be valid and must not already be in use by a live entry
	/// of the draft. A tombstone with the same name is revived instead.
	pub fn create(&mut self, name: &str, value: &str) -> EnvarResult<()> {
		match check_new_name(name, self.state.live_names(), self.config.names.rules) {
			Some(DiagnosticKind::InvalidName) => {
				return Err(EnvarError::InvalidName(name.to_string()));
			}
			Some(_) => return Err(EnvarError::AlreadyDefinedName(name.to_string())),
			None => {}
		}

		self.set_value(name, value);
		Ok(())
	}

	/// The draft rendered as expert mode text.
	pub fn expert_text(&self) -> String {
		serialize(&to_serialized_set(&self.state))
	}

	/// Replace the draft with the content of expert mode text.
	///
	/// Only available in expert mode. The text is only applied when it has no
	/// blocking diagnostics; either way the diagnostics are returned and kept
	/// for [`diagnostics`](Self::diagnostics).
	pub fn set_expert_text(&mut self, text: &str) -> EnvarResult<Vec<Diagnostic>> {
		if self.mode != EditorMode::Expert {
			return Err(EnvarError::NotInExpertMode);
		}

		let lines = self.cache.parse(text, &self.config.parse_options());
		self.diagnostics = diagnose(&lines);

		let blocking = self.blocking_count();
		if blocking == 0 {
			self.state = apply_entries(&self.state, &valid_variables(&lines));
			self.emit(&SessionEvent::Changed);
		} else {
			tracing::debug!(blocking, "expert text not applied");
		}

		Ok(self.diagnostics.clone())
	}

	/// Switch editor mode. Leaving expert mode is refused while the last
	/// expert text has blocking diagnostics.
	pub fn switch_mode(&mut self, mode: EditorMode) -> EnvarResult<()> {
		if mode == self.mode {
			return Ok(());
		}

		if self.mode == EditorMode::Expert {
			let blocking = self.blocking_count();
			if blocking > 0 {
				return Err(EnvarError::InvalidExpertText(blocking));
			}
		}

		self.mode = mode;
		self.diagnostics.clear();
		self.emit(&SessionEvent::ModeChanged(mode));
		Ok(())
	}

	/// Discard every change and restart from the baseline.
	pub fn reset(&mut self) {
		self.state = start_editing(self.state.baseline());
		self.diagnostics.clear();
		self.emit(&SessionEvent::Reset);
	}

	/// Hand the draft over for saving.
	pub fn submit(&mut self) -> EnvarResult<VariableSet> {
		let blocking = self.blocking_count();
		if blocking > 0 {
			return Err(EnvarError::InvalidExpertText(blocking));
		}

		let variables = to_serialized_set(&self.state);
		self.emit(&SessionEvent::Submitted(variables.clone()));
		Ok(variables)
	}

	/// Reconcile the baseline confirmed by a successful save.
	pub fn confirm_saved(&mut self, saved: &VariableSet) {
		self.apply_baseline(saved);
	}

	/// Reconcile a baseline that was refreshed externally.
	pub fn refresh_baseline(&mut self, baseline: &VariableSet) {
		self.apply_baseline(baseline);
	}

	fn apply_baseline(&mut self, baseline: &VariableSet) {
		self.state = reconcile(&self.state, baseline);
		self.emit(&SessionEvent::BaselineChanged);
	}

	fn blocking_count(&self) -> usize {
		self.diagnostics
			.iter()
			.filter(|diagnostic| self.config.is_blocking(diagnostic))
			.count()
	}

	fn emit(&mut self, event: &SessionEvent) {
		for observer in &mut self.observers {
			observer.notify(event, &self.state);
		}
	}
}
