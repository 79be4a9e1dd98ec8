use log::info;

use crate::domain::payment::PaymentRequest;
use crate::domain::queue::Queue;
use crate::domain::repository::{PaymentStore, StoreError};

/// Wipes recorded payments and drops everything still waiting for dispatch.
#[derive(Clone)]
pub struct PurgePaymentsUseCase<S: PaymentStore, Q: Queue<PaymentRequest>> {
	store: S,
	queue: Q,
}

impl<S: PaymentStore, Q: Queue<PaymentRequest>> PurgePaymentsUseCase<S, Q> {
	pub fn new(store: S, queue: Q) -> Self {
		Self { store, queue }
	}

	pub async fn execute(&self) -> Result<(), StoreError> {
		let dropped = self.queue.purge();
		if dropped > 0 {
			info!("Dropped {dropped} queued payments");
		}
		self.store.purge_all().await
	}
}
