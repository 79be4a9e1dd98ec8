use std::thread;

use serde::Deserialize;

use crate::infrastructure::persistence::staged_ledger::DEFAULT_STAGING_TTL;
use crate::infrastructure::processors::http_payment_processor_client::DEFAULT_UPSTREAM_TIMEOUT;
use crate::infrastructure::queue::admission_queue::DEFAULT_QUEUE_CAPACITY;
use crate::infrastructure::routing::circuit_router::DEFAULT_RETRY_THRESHOLD;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
	#[default]
	Memory,
	Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	#[serde(default)]
	pub storage: StorageBackend,
	pub redis_url: Option<String>,
	pub primary_payment_processor_url: String,
	pub fallback_payment_processor_url: String,
	#[serde(default = "default_queue_capacity")]
	pub queue_capacity: usize,
	#[serde(default = "default_worker_count")]
	pub worker_count: usize,
	#[serde(default = "default_retry_threshold")]
	pub retry_threshold: u64,
	#[serde(default = "default_upstream_timeout_secs")]
	pub upstream_timeout_secs: u64,
	#[serde(default = "default_staging_ttl_secs")]
	pub staging_ttl_secs: u64,
	#[serde(default = "default_server_port")]
	pub server_port: u16,
	#[serde(default = "default_server_keepalive")]
	pub server_keepalive: u64,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		config_builder.try_deserialize()
	}
}

fn default_queue_capacity() -> usize {
	DEFAULT_QUEUE_CAPACITY
}

fn default_worker_count() -> usize {
	thread::available_parallelism()
		.map(|cpus| cpus.get() * 2)
		.unwrap_or(2)
}

fn default_retry_threshold() -> u64 {
	DEFAULT_RETRY_THRESHOLD
}

fn default_upstream_timeout_secs() -> u64 {
	DEFAULT_UPSTREAM_TIMEOUT.as_secs()
}

fn default_staging_ttl_secs() -> u64 {
	DEFAULT_STAGING_TTL.as_secs()
}

fn default_server_port() -> u16 {
	9999
}

fn default_server_keepalive() -> u64 {
	5
}
