use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::debug;

use crate::domain::ledger::Ledger;
use crate::domain::payment::Payment;
use crate::domain::repository::{PaymentStore, StoreError};

/// Ledger for stores that live and die with the process.
///
/// A crash loses the pending attempts together with the store itself, so
/// nothing is staged in the store: `prepare` only remembers the attempt and
/// `commit` appends it once. Attempts sharing a correlation id are tracked
/// separately; `commit` and `rollback` act on the attempt equal to the
/// payment they are given.
#[derive(Clone)]
pub struct DirectLedger<S: PaymentStore> {
	store:   S,
	pending: Arc<DashMap<String, Vec<Payment>>>,
}

impl<S: PaymentStore> DirectLedger<S> {
	pub fn new(store: S) -> Self {
		Self {
			store,
			pending: Arc::new(DashMap::new()),
		}
	}

	/// Attempts prepared but neither committed nor rolled back.
	pub fn pending(&self) -> usize {
		self.pending.iter().map(|attempts| attempts.len()).sum()
	}

	fn take_pending(&self, payment: &Payment) -> Option<Payment> {
		let Entry::Occupied(mut entry) = self.pending.entry(payment.correlation_id.clone())
		else {
			return None;
		};
		let attempts = entry.get_mut();
		let taken = attempts
			.iter()
			.position(|attempt| attempt == payment)
			.map(|index| attempts.swap_remove(index));
		if attempts.is_empty() {
			entry.remove();
		}
		taken
	}
}

#[async_trait]
impl<S: PaymentStore> Ledger for DirectLedger<S> {
	async fn prepare(&self, payment: &Payment) -> Result<(), StoreError> {
		self.pending
			.entry(payment.correlation_id.clone())
			.or_default()
			.push(payment.clone());
		Ok(())
	}

	async fn commit(&self, payment: &Payment) -> Result<(), StoreError> {
		let Some(prepared) = self.take_pending(payment) else {
			debug!(
				"Nothing prepared for '{}', skipping commit",
				payment.correlation_id
			);
			return Ok(());
		};
		self.store.append(&prepared.correlation_id, &prepared).await
	}

	async fn rollback(&self, payment: &Payment, reason: &str) -> Result<(), StoreError> {
		debug!("Rolling back '{}': {reason}", payment.correlation_id);
		self.take_pending(payment);
		Ok(())
	}
}
