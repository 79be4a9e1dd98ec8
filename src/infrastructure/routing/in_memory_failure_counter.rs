use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::domain::payment_router::FailureCounter;

/// Process-local failure counts. Entries are only dropped by `reset`, so ids
/// that never succeed stay tracked until restart.
#[derive(Clone, Default)]
pub struct InMemoryFailureCounter {
	counts: Arc<DashMap<String, AtomicU64>>,
}

impl InMemoryFailureCounter {
	pub fn new() -> Self {
		Self::default()
	}
}

impl FailureCounter for InMemoryFailureCounter {
	fn increment(&self, correlation_id: &str) -> u64 {
		if let Some(count) = self.counts.get(correlation_id) {
			return count.fetch_add(1, Ordering::AcqRel) + 1;
		}
		self.counts
			.entry(correlation_id.to_string())
			.or_insert_with(|| AtomicU64::new(0))
			.fetch_add(1, Ordering::AcqRel) +
			1
	}

	fn current(&self, correlation_id: &str) -> u64 {
		self.counts
			.get(correlation_id)
			.map(|count| count.load(Ordering::Acquire))
			.unwrap_or(0)
	}

	fn reset(&self, correlation_id: &str) {
		self.counts.remove(correlation_id);
	}

	fn tracked(&self) -> usize {
		self.counts.len()
	}
}
