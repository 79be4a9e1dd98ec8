use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::info;

use crate::adapters::web::payments_handler::payments;
use crate::adapters::web::payments_purge_handler::payments_purge;
use crate::adapters::web::payments_summary_handler::payments_summary;
use crate::domain::ledger::Ledger;
use crate::domain::payment::PaymentRequest;
use crate::domain::repository::PaymentStore;
use crate::infrastructure::config::settings::{Config, StorageBackend};
use crate::infrastructure::persistence::direct_ledger::DirectLedger;
use crate::infrastructure::persistence::in_memory_payment_store::InMemoryPaymentStore;
use crate::infrastructure::persistence::redis_payment_store::RedisPaymentStore;
use crate::infrastructure::persistence::staged_ledger::StagedLedger;
use crate::infrastructure::processors::http_payment_processor_client::HttpPaymentProcessorClient;
use crate::infrastructure::queue::admission_queue::AdmissionQueue;
use crate::infrastructure::routing::circuit_router::CircuitRouter;
use crate::infrastructure::routing::in_memory_failure_counter::InMemoryFailureCounter;
use crate::infrastructure::workers::payment_processor_worker::WorkerPool;
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;
use crate::use_cases::process_payment::ProcessPaymentUseCase;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

pub mod domain {
	pub mod ledger;
	pub mod payment;
	pub mod payment_processor;
	pub mod payment_router;
	pub mod payment_summary;
	pub mod queue;
	pub mod repository;
}

pub mod infrastructure {
	pub mod config {
		pub mod redis;
		pub mod settings;
	}
	pub mod persistence {
		pub mod direct_ledger;
		pub mod in_memory_payment_store;
		pub mod redis_payment_store;
		pub mod staged_ledger;
	}
	pub mod processors {
		pub mod http_payment_processor_client;
	}
	pub mod queue {
		pub mod admission_queue;
	}
	pub mod routing {
		pub mod circuit_router;
		pub mod in_memory_failure_counter;
	}
	pub mod workers {
		pub mod payment_processor_worker;
	}
}

pub mod use_cases {
	pub mod create_payment;
	pub mod dto;
	pub mod get_payment_summary;
	pub mod process_payment;
	pub mod purge_payments;
}

pub mod adapters {
	pub mod web {
		pub mod errors;
		pub mod payments_handler;
		pub mod payments_purge_handler;
		pub mod payments_summary_handler;
		pub mod schema;
	}
}

/// The store chosen at startup, shared by the summary and purge paths.
pub type SharedStore = Arc<dyn PaymentStore>;
pub type SharedLedger = Arc<dyn Ledger>;
pub type PaymentQueue = AdmissionQueue<PaymentRequest>;

pub async fn run(config: Arc<Config>) -> io::Result<()> {
	let queue: PaymentQueue = AdmissionQueue::new(config.queue_capacity);
	let (store, ledger) = build_storage(&config)?;

	let client = HttpPaymentProcessorClient::new(
		&config.primary_payment_processor_url,
		&config.fallback_payment_processor_url,
		Duration::from_secs(config.upstream_timeout_secs),
	)
	.map_err(io::Error::other)?;
	let router = CircuitRouter::new(
		InMemoryFailureCounter::new(),
		InMemoryFailureCounter::new(),
		config.retry_threshold,
	);

	let create_payment_use_case = CreatePaymentUseCase::new(queue.clone());
	let get_payment_summary_use_case = GetPaymentSummaryUseCase::new(store.clone());
	let purge_payments_use_case = PurgePaymentsUseCase::new(store, queue.clone());

	let server = HttpServer::new(move || {
		App::new()
			.app_data(web::Data::new(create_payment_use_case.clone()))
			.app_data(web::Data::new(get_payment_summary_use_case.clone()))
			.app_data(web::Data::new(purge_payments_use_case.clone()))
			.service(payments)
			.service(payments_summary)
			.service(payments_purge)
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.bind(("0.0.0.0", config.server_port))?
	.run();

	let capacity = queue.capacity();
	let worker_pool = WorkerPool::start(
		config.worker_count,
		queue,
		ProcessPaymentUseCase::new(router, ledger, client),
	);
	info!(
		"Listening on port {} with {} payment workers ({:?} storage, queue capacity {})",
		config.server_port,
		worker_pool.size(),
		config.storage,
		capacity
	);

	let served = server.await;
	worker_pool.shutdown().await;
	served
}

fn build_storage(config: &Config) -> io::Result<(SharedStore, SharedLedger)> {
	match config.storage {
		StorageBackend::Memory => {
			let store = InMemoryPaymentStore::new();
			Ok((Arc::new(store.clone()), Arc::new(DirectLedger::new(store))))
		}
		StorageBackend::Redis => {
			let redis_url = config.redis_url.as_deref().ok_or_else(|| {
				io::Error::new(
					io::ErrorKind::InvalidInput,
					"APP_REDIS_URL is required when APP_STORAGE=redis",
				)
			})?;
			let client = redis::Client::open(redis_url).map_err(io::Error::other)?;
			let store = RedisPaymentStore::new(client);
			let ledger = StagedLedger::new(
				store.clone(),
				Duration::from_secs(config.staging_ttl_secs),
			);
			Ok((Arc::new(store), Arc::new(ledger)))
		}
	}
}
