use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::payment::Payment;
use crate::domain::repository::StoreError;

/// Brackets an upstream call so that a payment is only recorded once the
/// processor accepted it.
///
/// `prepare` runs before the call, then exactly one of `commit` or
/// `rollback`. `commit` must not record twice for a single `prepare`.
#[async_trait]
pub trait Ledger: Send + Sync + 'static {
	async fn prepare(&self, payment: &Payment) -> Result<(), StoreError>;

	async fn commit(&self, payment: &Payment) -> Result<(), StoreError>;

	async fn rollback(&self, payment: &Payment, reason: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for Arc<L> {
	async fn prepare(&self, payment: &Payment) -> Result<(), StoreError> {
		(**self).prepare(payment).await
	}

	async fn commit(&self, payment: &Payment) -> Result<(), StoreError> {
		(**self).commit(payment).await
	}

	async fn rollback(&self, payment: &Payment, reason: &str) -> Result<(), StoreError> {
		(**self).rollback(payment, reason).await
	}
}
