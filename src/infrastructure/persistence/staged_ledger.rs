use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::domain::ledger::Ledger;
use crate::domain::payment::Payment;
use crate::domain::repository::{StagingStore, StoreError};

pub const DEFAULT_STAGING_TTL: Duration = Duration::from_secs(60);

/// Ledger that survives a crash between the upstream call and the commit:
/// the attempt sits in an expiring staging entry keyed by correlation id and
/// simply disappears if it is never committed.
#[derive(Clone)]
pub struct StagedLedger<S: StagingStore> {
	store: S,
	ttl:   Duration,
}

impl<S: StagingStore> StagedLedger<S> {
	pub fn new(store: S, ttl: Duration) -> Self {
		Self { store, ttl }
	}
}

#[async_trait]
impl<S: StagingStore> Ledger for StagedLedger<S> {
	async fn prepare(&self, payment: &Payment) -> Result<(), StoreError> {
		self.store
			.stage(&payment.correlation_id, payment, self.ttl)
			.await
	}

	async fn commit(&self, payment: &Payment) -> Result<(), StoreError> {
		let moved = self
			.store
			.move_staged_to_durable(&payment.correlation_id)
			.await?;
		if !moved {
			warn!(
				"No staged entry for '{}' at commit; it was already committed or \
				 expired",
				payment.correlation_id
			);
		}
		Ok(())
	}

	async fn rollback(&self, payment: &Payment, reason: &str) -> Result<(), StoreError> {
		debug!("Rolling back '{}': {reason}", payment.correlation_id);
		self.store.delete_staged(&payment.correlation_id).await
	}
}

#[cfg(test)]
mod tests {
	use rust_decimal_macros::dec;
	use time::OffsetDateTime;

	use super::*;
	use crate::domain::payment::{PaymentRequest, Processor};
	use crate::domain::repository::PaymentStore;
	use crate::infrastructure::persistence::in_memory_payment_store::InMemoryPaymentStore;

	fn payment(id: &str) -> Payment {
		Payment::new(
			&PaymentRequest::new(id, dec!(42.00)),
			Processor::Primary,
			OffsetDateTime::now_utc(),
		)
	}

	#[tokio::test]
	async fn test_prepare_then_commit_records_payment() {
		let store = InMemoryPaymentStore::new();
		let ledger = StagedLedger::new(store.clone(), DEFAULT_STAGING_TTL);
		let payment = payment("a");

		ledger.prepare(&payment).await.unwrap();
		assert!(store.scan_all().await.unwrap().is_empty());

		ledger.commit(&payment).await.unwrap();
		ledger.commit(&payment).await.unwrap();

		assert_eq!(store.scan_all().await.unwrap(), vec![payment]);
	}

	#[tokio::test]
	async fn test_rollback_discards_staged_payment() {
		let store = InMemoryPaymentStore::new();
		let ledger = StagedLedger::new(store.clone(), DEFAULT_STAGING_TTL);
		let payment = payment("a");

		ledger.prepare(&payment).await.unwrap();
		ledger.rollback(&payment, "HTTP 400").await.unwrap();
		ledger.commit(&payment).await.unwrap();

		assert!(store.scan_all().await.unwrap().is_empty());
		assert_eq!(store.staged_count(), 0);
	}

	#[tokio::test]
	async fn test_uncommitted_attempt_expires() {
		let store = InMemoryPaymentStore::new();
		let ledger = StagedLedger::new(store.clone(), Duration::from_millis(10));
		let payment = payment("a");

		ledger.prepare(&payment).await.unwrap();
		tokio::time::sleep(Duration::from_millis(30)).await;
		ledger.commit(&payment).await.unwrap();

		assert!(store.scan_all().await.unwrap().is_empty());
	}
}
