use std::sync::Arc;

use log::{error, info, warn};
use tokio::task::JoinHandle;

use crate::domain::ledger::Ledger;
use crate::domain::payment::PaymentRequest;
use crate::domain::payment_processor::PaymentProcessorClient;
use crate::domain::payment_router::FailureCounter;
use crate::domain::queue::Queue;
use crate::infrastructure::queue::admission_queue::AdmissionQueue;
use crate::use_cases::process_payment::{DispatchOutcome, ProcessPaymentUseCase};

/// Drains `queue` until it shuts down. A request the router wants retried on
/// the primary goes back to the tail of the queue.
pub async fn payment_processing_worker<Q, C, L, P>(
	worker_id: usize,
	queue: Q,
	process_payment_use_case: Arc<ProcessPaymentUseCase<C, L, P>>,
) where
	Q: Queue<PaymentRequest>,
	C: FailureCounter,
	L: Ledger,
	P: PaymentProcessorClient,
{
	info!("Payment worker {worker_id} started");

	while let Some(request) = queue.take().await {
		match process_payment_use_case.execute(&request).await {
			Ok(DispatchOutcome::Committed(_)) => {}
			Ok(DispatchOutcome::RetryLater { failures }) => {
				let correlation_id = request.correlation_id.clone();
				if queue.accept(request) {
					warn!(
						"Payment {correlation_id} re-queued after {failures} primary \
						 failures"
					);
				} else {
					error!("Payment {correlation_id} dropped: could not re-queue it");
				}
			}
			Err(e) => error!("{e}"),
		}
	}

	info!("Payment worker {worker_id} stopped");
}

/// A fixed number of workers sharing one admission queue.
pub struct WorkerPool {
	queue:   AdmissionQueue<PaymentRequest>,
	handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
	pub fn start<C, L, P>(
		worker_count: usize,
		queue: AdmissionQueue<PaymentRequest>,
		process_payment_use_case: ProcessPaymentUseCase<C, L, P>,
	) -> Self
	where
		C: FailureCounter,
		L: Ledger,
		P: PaymentProcessorClient,
	{
		let use_case = Arc::new(process_payment_use_case);
		let handles = (0..worker_count.max(1))
			.map(|worker_id| {
				tokio::spawn(payment_processing_worker(
					worker_id,
					queue.clone(),
					Arc::clone(&use_case),
				))
			})
			.collect();

		Self { queue, handles }
	}

	pub fn size(&self) -> usize {
		self.handles.len()
	}

	/// Stops intake, wakes idle workers and waits for in-flight dispatches to
	/// finish. Requests still queued are left behind.
	pub async fn shutdown(self) {
		self.queue.shutdown();
		for handle in self.handles {
			if let Err(e) = handle.await {
				error!("Payment worker ended abnormally: {e}");
			}
		}
		info!("Payment worker pool stopped");
	}
}
