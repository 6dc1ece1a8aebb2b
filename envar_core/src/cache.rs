use std::collections::HashMap;
use std::collections::VecDeque;
use std::hash::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::ParseOptions;
use crate::ParsedLine;
use crate::parse_with_options;

/// Default number of parsed documents kept by a [`ParseCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// Counters describing how a [`ParseCache`] has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTelemetry {
	pub hits: u64,
	pub misses: u64,
	pub evictions: u64,
}

#[derive(Debug)]
struct CachedParse {
	text: String,
	options: ParseOptions,
	lines: Arc<[ParsedLine]>,
}

/// A bounded cache of parse results, owned by whoever parses the same text
/// repeatedly (typically one editor session).
///
/// Entries are evicted oldest first once `capacity` is reached.
#[derive(Debug)]
pub struct ParseCache {
	capacity: usize,
	entries: HashMap<u64, CachedParse>,
	order: VecDeque<u64>,
	telemetry: CacheTelemetry,
}

impl Default for ParseCache {
	fn default() -> Self {
		Self::new(DEFAULT_CACHE_CAPACITY)
	}
}

impl ParseCache {
	/// Create a cache holding at most `capacity` documents. A capacity of zero
	/// disables caching.
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			entries: HashMap::new(),
			order: VecDeque::new(),
			telemetry: CacheTelemetry::default(),
		}
	}

	/// Parse `text`, reusing a previous result for identical input.
	pub fn parse(&mut self, text: &str, options: &ParseOptions) -> Arc<[ParsedLine]> {
		let key = fingerprint(text, options);

		if let Some(cached) = self.entries.get(&key) {
			if cached.text == text && cached.options == *options {
				self.telemetry.hits = self.telemetry.hits.saturating_add(1);
				return Arc::clone(&cached.lines);
			}
		}

		self.telemetry.misses = self.telemetry.misses.saturating_add(1);
		let lines: Arc<[ParsedLine]> = parse_with_options(text, options).into();

		if self.capacity == 0 {
			return lines;
		}

		if self.entries.contains_key(&key) {
			self.order.retain(|existing| *existing != key);
		} else if self.entries.len() >= self.capacity {
			if let Some(oldest) = self.order.pop_front() {
				self.entries.remove(&oldest);
				self.telemetry.evictions = self.telemetry.evictions.saturating_add(1);
			}
		}

		self.entries.insert(
			key,
			CachedParse {
				text: text.to_string(),
				options: *options,
				lines: Arc::clone(&lines),
			},
		);
		self.order.push_back(key);

		lines
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
		self.order.clear();
	}

	pub fn telemetry(&self) -> CacheTelemetry {
		self.telemetry
	}
}

fn fingerprint(text: &str, options: &ParseOptions) -> u64 {
	let mut hasher = DefaultHasher::new();
	text.hash(&mut hasher);
	options.comments.hash(&mut hasher);
	options.name_rules.hash(&mut hasher);
	hasher.finish()
}
