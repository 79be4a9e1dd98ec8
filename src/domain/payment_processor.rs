use async_trait::async_trait;

use crate::domain::payment::{Payment, Processor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorOutcome {
	Success,
	/// Server-side error or no response at all; worth another attempt.
	TransientFailure(String),
	/// The processor rejected the request itself.
	TerminalFailure(String),
}

#[async_trait]
pub trait PaymentProcessorClient: Send + Sync + 'static {
	async fn send(&self, target: Processor, payment: &Payment) -> ProcessorOutcome;
}
