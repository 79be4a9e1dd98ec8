use derive_more::derive::{Display, Error};
use log::{error, info};
use time::OffsetDateTime;

use crate::domain::ledger::Ledger;
use crate::domain::payment::{Payment, PaymentRequest, Processor};
use crate::domain::payment_processor::{PaymentProcessorClient, ProcessorOutcome};
use crate::domain::payment_router::{FailureCounter, RoutingDecision};
use crate::domain::repository::StoreError;
use crate::infrastructure::routing::circuit_router::CircuitRouter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
	Committed(Processor),
	/// The primary failed but is still under the threshold; the request
	/// should go back on the queue.
	RetryLater { failures: u64 },
}

#[derive(Debug, Display, Error)]
pub enum DispatchError {
	#[display("Payment {correlation_id} rejected by {processor} processor: {reason}")]
	TerminalUpstreamFailure {
		correlation_id: String,
		processor:      Processor,
		reason:         String,
	},
	#[display("Payment {correlation_id} failed on {processor} processor: {reason}")]
	TransientUpstreamFailure {
		correlation_id: String,
		processor:      Processor,
		reason:         String,
	},
	#[display("Could not persist payment {correlation_id}: {source}")]
	PersistenceFailure {
		correlation_id: String,
		source:         StoreError,
	},
}

/// One dispatch attempt for one request: pick a processor, stage the payment,
/// call the processor, then commit or roll back.
pub struct ProcessPaymentUseCase<C, L, P>
where
	C: FailureCounter,
	L: Ledger,
	P: PaymentProcessorClient,
{
	router: CircuitRouter<C>,
	ledger: L,
	client: P,
}

impl<C, L, P> ProcessPaymentUseCase<C, L, P>
where
	C: FailureCounter,
	L: Ledger,
	P: PaymentProcessorClient,
{
	pub fn new(router: CircuitRouter<C>, ledger: L, client: P) -> Self {
		Self {
			router,
			ledger,
			client,
		}
	}

	pub fn router(&self) -> &CircuitRouter<C> {
		&self.router
	}

	pub async fn execute(
		&self,
		request: &PaymentRequest,
	) -> Result<DispatchOutcome, DispatchError> {
		let correlation_id = &request.correlation_id;
		let mut target = self.router.select_target(correlation_id);

		loop {
			let payment = Payment::new(request, target, OffsetDateTime::now_utc());

			if let Err(e) = self.ledger.prepare(&payment).await {
				self.rollback_after_store_failure(&payment).await;
				return Err(persistence_failure(correlation_id, e));
			}

			let outcome = self.client.send(target, &payment).await;

			match self.router.record_outcome(correlation_id, target, &outcome) {
				RoutingDecision::Completed => {
					if let Err(e) = self.ledger.commit(&payment).await {
						self.rollback_after_store_failure(&payment).await;
						return Err(persistence_failure(correlation_id, e));
					}
					info!("Payment {correlation_id} processed by {target} processor");
					return Ok(DispatchOutcome::Committed(target));
				}
				RoutingDecision::RetryPrimary { failures } => {
					self.rollback(&payment, "primary processor unavailable")
						.await?;
					return Ok(DispatchOutcome::RetryLater { failures });
				}
				RoutingDecision::SwitchToFallback { .. } => {
					self.rollback(&payment, "switching to fallback processor")
						.await?;
					target = Processor::Fallback;
				}
				RoutingDecision::Surface { reason } => {
					self.rollback(&payment, &reason).await?;
					return Err(upstream_failure(correlation_id, target, outcome, reason));
				}
			}
		}
	}

	async fn rollback(&self, payment: &Payment, reason: &str) -> Result<(), DispatchError> {
		self.ledger
			.rollback(payment, reason)
			.await
			.map_err(|e| persistence_failure(&payment.correlation_id, e))
	}

	async fn rollback_after_store_failure(&self, payment: &Payment) {
		if let Err(e) = self.ledger.rollback(payment, "store failure").await {
			error!(
				"Rollback of payment {} failed as well: {e}",
				payment.correlation_id
			);
		}
	}
}

fn persistence_failure(correlation_id: &str, source: StoreError) -> DispatchError {
	DispatchError::PersistenceFailure {
		correlation_id: correlation_id.to_string(),
		source,
	}
}

fn upstream_failure(
	correlation_id: &str,
	processor: Processor,
	outcome: ProcessorOutcome,
	reason: String,
) -> DispatchError {
	let correlation_id = correlation_id.to_string();
	match outcome {
		ProcessorOutcome::TerminalFailure(_) => DispatchError::TerminalUpstreamFailure {
			correlation_id,
			processor,
			reason,
		},
		_ => DispatchError::TransientUpstreamFailure {
			correlation_id,
			processor,
			reason,
		},
	}
}
