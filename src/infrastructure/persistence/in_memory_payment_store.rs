use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::payment::Payment;
use crate::domain::repository::{PaymentStore, StagingStore, StoreError};

/// Process-local payment store. Staged entries expire lazily: an expired
/// entry is treated as absent the next time it is touched.
#[derive(Clone, Default)]
pub struct InMemoryPaymentStore {
	payments: Arc<RwLock<Vec<Payment>>>,
	staged:   Arc<DashMap<String, StagedPayment>>,
}

struct StagedPayment {
	payment:    Payment,
	expires_at: Instant,
}

impl InMemoryPaymentStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn staged_count(&self) -> usize {
		self.staged
			.iter()
			.filter(|entry| entry.expires_at > Instant::now())
			.count()
	}
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
	async fn append(&self, key: &str, payment: &Payment) -> Result<(), StoreError> {
		debug!("Appending payment '{key}' to in-memory store");
		self.payments.write().await.push(payment.clone());
		Ok(())
	}

	async fn scan_all(&self) -> Result<Vec<Payment>, StoreError> {
		Ok(self.payments.read().await.clone())
	}

	async fn purge_all(&self) -> Result<(), StoreError> {
		self.payments.write().await.clear();
		self.staged.clear();
		Ok(())
	}
}

#[async_trait]
impl StagingStore for InMemoryPaymentStore {
	async fn stage(
		&self,
		key: &str,
		payment: &Payment,
		ttl: Duration,
	) -> Result<(), StoreError> {
		self.staged.insert(key.to_string(), StagedPayment {
			payment:    payment.clone(),
			expires_at: Instant::now() + ttl,
		});
		Ok(())
	}

	async fn move_staged_to_durable(&self, key: &str) -> Result<bool, StoreError> {
		let Some((_, staged)) = self.staged.remove(key) else {
			return Ok(false);
		};
		if staged.expires_at <= Instant::now() {
			debug!("Staged payment '{key}' expired before commit");
			return Ok(false);
		}
		self.append(key, &staged.payment).await?;
		Ok(true)
	}

	async fn delete_staged(&self, key: &str) -> Result<(), StoreError> {
		self.staged.remove(key);
		Ok(())
	}
}
