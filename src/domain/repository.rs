use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use derive_more::derive::{Display, Error};

use crate::domain::payment::Payment;

#[derive(Debug, Display, Error)]
pub enum StoreError {
	#[display("Storage backend unavailable: {_0}")]
	Backend(#[error(not(source))] String),
	#[display("Could not encode or decode a payment: {_0}")]
	Codec(#[error(not(source))] String),
}

/// Append-only record of dispatched payments.
#[async_trait]
pub trait PaymentStore: Send + Sync + 'static {
	async fn append(&self, key: &str, payment: &Payment) -> Result<(), StoreError>;

	async fn scan_all(&self) -> Result<Vec<Payment>, StoreError>;

	async fn purge_all(&self) -> Result<(), StoreError>;
}

/// A store that can hold a payment under an expiring key before it is
/// confirmed durable.
#[async_trait]
pub trait StagingStore: PaymentStore {
	async fn stage(
		&self,
		key: &str,
		payment: &Payment,
		ttl: Duration,
	) -> Result<(), StoreError>;

	/// Returns `false` when nothing was staged under `key`.
	async fn move_staged_to_durable(&self, key: &str) -> Result<bool, StoreError>;

	async fn delete_staged(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: PaymentStore + ?Sized> PaymentStore for Arc<S> {
	async fn append(&self, key: &str, payment: &Payment) -> Result<(), StoreError> {
		(**self).append(key, payment).await
	}

	async fn scan_all(&self) -> Result<Vec<Payment>, StoreError> {
		(**self).scan_all().await
	}

	async fn purge_all(&self) -> Result<(), StoreError> {
		(**self).purge_all().await
	}
}

#[async_trait]
impl<S: StagingStore + ?Sized> StagingStore for Arc<S> {
	async fn stage(
		&self,
		key: &str,
		payment: &Payment,
		ttl: Duration,
	) -> Result<(), StoreError> {
		(**self).stage(key, payment, ttl).await
	}

	async fn move_staged_to_durable(&self, key: &str) -> Result<bool, StoreError> {
		(**self).move_staged_to_durable(key).await
	}

	async fn delete_staged(&self, key: &str) -> Result<(), StoreError> {
		(**self).delete_staged(key).await
	}
}
