use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Direction};

use crate::domain::payment::Payment;
use crate::domain::repository::{PaymentStore, StagingStore, StoreError};
use crate::infrastructure::config::redis::{PAYMENTS_KEY, staging_key};

impl From<redis::RedisError> for StoreError {
	fn from(err: redis::RedisError) -> Self {
		StoreError::Backend(err.to_string())
	}
}

impl From<serde_json::Error> for StoreError {
	fn from(err: serde_json::Error) -> Self {
		StoreError::Codec(err.to_string())
	}
}

/// Payments live in one Redis list; each in-flight attempt is staged in its
/// own expiring list and moved across with `LMOVE` on commit.
#[derive(Clone)]
pub struct RedisPaymentStore {
	client: Client,
}

impl RedisPaymentStore {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
		Ok(self.client.get_multiplexed_async_connection().await?)
	}
}

#[async_trait]
impl PaymentStore for RedisPaymentStore {
	async fn append(&self, key: &str, payment: &Payment) -> Result<(), StoreError> {
		let mut con = self.connection().await?;
		let encoded = serde_json::to_string(payment)?;

		debug!("Appending payment '{key}' to {PAYMENTS_KEY}");
		let _: () = con.lpush(PAYMENTS_KEY, encoded).await?;
		Ok(())
	}

	async fn scan_all(&self) -> Result<Vec<Payment>, StoreError> {
		let mut con = self.connection().await?;
		let encoded: Vec<String> = con.lrange(PAYMENTS_KEY, 0, -1).await?;

		encoded
			.iter()
			.map(|payment| serde_json::from_str(payment).map_err(StoreError::from))
			.collect()
	}

	async fn purge_all(&self) -> Result<(), StoreError> {
		let mut con = self.connection().await?;
		let staged: Vec<String> = con.keys(staging_key("*")).await?;

		let mut pipe = redis::pipe();
		pipe.atomic().del(PAYMENTS_KEY).ignore();
		for key in staged {
			pipe.del(key).ignore();
		}
		pipe.query_async::<()>(&mut con).await?;
		Ok(())
	}
}

#[async_trait]
impl StagingStore for RedisPaymentStore {
	async fn stage(
		&self,
		key: &str,
		payment: &Payment,
		ttl: Duration,
	) -> Result<(), StoreError> {
		let mut con = self.connection().await?;
		let encoded = serde_json::to_string(payment)?;
		let staged = staging_key(key);
		let ttl_secs = ttl.as_secs().max(1) as i64;

		redis::pipe()
			.atomic()
			.lpush(&staged, encoded)
			.ignore()
			.expire(&staged, ttl_secs)
			.ignore()
			.query_async::<()>(&mut con)
			.await?;
		Ok(())
	}

	async fn move_staged_to_durable(&self, key: &str) -> Result<bool, StoreError> {
		let mut con = self.connection().await?;
		let moved: Option<String> = con
			.lmove(staging_key(key), PAYMENTS_KEY, Direction::Left, Direction::Left)
			.await?;
		Ok(moved.is_some())
	}

	async fn delete_staged(&self, key: &str) -> Result<(), StoreError> {
		let mut con = self.connection().await?;
		let _: () = con.del(staging_key(key)).await?;
		Ok(())
	}
}
