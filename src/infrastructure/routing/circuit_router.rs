use log::{debug, warn};

use crate::domain::payment::Processor;
use crate::domain::payment_processor::ProcessorOutcome;
use crate::domain::payment_router::{FailureCounter, RoutingDecision};

pub const DEFAULT_RETRY_THRESHOLD: u64 = 16;

/// Chooses the processor for each attempt and turns attempt outcomes into
/// routing decisions.
///
/// Failures are counted per correlation id, never per processor, so a single
/// struggling request cannot demote traffic for any other request.
#[derive(Clone)]
pub struct CircuitRouter<C: FailureCounter> {
	primary_failures:  C,
	fallback_failures: C,
	threshold:         u64,
}

impl<C: FailureCounter> CircuitRouter<C> {
	pub fn new(primary_failures: C, fallback_failures: C, threshold: u64) -> Self {
		Self {
			primary_failures,
			fallback_failures,
			threshold: threshold.max(1),
		}
	}

	pub fn threshold(&self) -> u64 {
		self.threshold
	}

	pub fn select_target(&self, correlation_id: &str) -> Processor {
		if self.primary_failures.current(correlation_id) >= self.threshold {
			Processor::Fallback
		} else {
			Processor::Primary
		}
	}

	pub fn record_outcome(
		&self,
		correlation_id: &str,
		target: Processor,
		outcome: &ProcessorOutcome,
	) -> RoutingDecision {
		match (outcome, target) {
			(ProcessorOutcome::Success, _) => {
				self.primary_failures.reset(correlation_id);
				self.fallback_failures.reset(correlation_id);
				RoutingDecision::Completed
			}
			(ProcessorOutcome::TerminalFailure(reason), _) => {
				RoutingDecision::Surface {
					reason: format!("{target} processor rejected payment: {reason}"),
				}
			}
			(ProcessorOutcome::TransientFailure(reason), Processor::Primary) => {
				let failures = self.primary_failures.increment(correlation_id);
				if failures < self.threshold {
					debug!(
						"Primary attempt {failures}/{} failed for {correlation_id}: \
						 {reason}",
						self.threshold
					);
					RoutingDecision::RetryPrimary { failures }
				} else {
					warn!(
						"Primary failed {failures} times for {correlation_id}, \
						 switching to fallback"
					);
					RoutingDecision::SwitchToFallback { failures }
				}
			}
			(ProcessorOutcome::TransientFailure(reason), Processor::Fallback) => {
				let failures = self.fallback_failures.increment(correlation_id);
				RoutingDecision::Surface {
					reason: format!(
						"fallback processor failed (attempt {failures}): {reason}"
					),
				}
			}
		}
	}

	pub fn primary_failures(&self, correlation_id: &str) -> u64 {
		self.primary_failures.current(correlation_id)
	}

	pub fn fallback_failures(&self, correlation_id: &str) -> u64 {
		self.fallback_failures.current(correlation_id)
	}
}
