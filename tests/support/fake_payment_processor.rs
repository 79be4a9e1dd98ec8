use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use payment_dispatcher::domain::payment::{Payment, Processor};
use payment_dispatcher::domain::payment_processor::{
	PaymentProcessorClient, ProcessorOutcome,
};

/// Answers from a per-processor script, then with a default outcome once the
/// script runs out. Every call is recorded.
#[derive(Clone)]
pub struct ScriptedPaymentProcessor {
	state: Arc<Mutex<ScriptState>>,
}

struct ScriptState {
	primary:          VecDeque<ProcessorOutcome>,
	fallback:         VecDeque<ProcessorOutcome>,
	primary_default:  ProcessorOutcome,
	fallback_default: ProcessorOutcome,
	calls:            Vec<(Processor, String)>,
}

impl ScriptedPaymentProcessor {
	pub fn always(outcome: ProcessorOutcome) -> Self {
		Self::new(outcome.clone(), outcome)
	}

	pub fn new(
		primary_default: ProcessorOutcome,
		fallback_default: ProcessorOutcome,
	) -> Self {
		Self {
			state: Arc::new(Mutex::new(ScriptState {
				primary: VecDeque::new(),
				fallback: VecDeque::new(),
				primary_default,
				fallback_default,
				calls: Vec::new(),
			})),
		}
	}

	pub fn then_times(
		self,
		target: Processor,
		outcome: ProcessorOutcome,
		times: u64,
	) -> Self {
		{
			let mut state = self.state.lock().unwrap();
			let script = match target {
				Processor::Primary => &mut state.primary,
				Processor::Fallback => &mut state.fallback,
			};
			script.extend((0..times).map(|_| outcome.clone()));
		}
		self
	}

	pub fn calls(&self) -> Vec<(Processor, String)> {
		self.state.lock().unwrap().calls.clone()
	}

	pub fn calls_to(&self, target: Processor) -> usize {
		self.calls()
			.iter()
			.filter(|(processor, _)| *processor == target)
			.count()
	}
}

#[async_trait]
impl PaymentProcessorClient for ScriptedPaymentProcessor {
	async fn send(&self, target: Processor, payment: &Payment) -> ProcessorOutcome {
		let mut state = self.state.lock().unwrap();
		state.calls.push((target, payment.correlation_id.clone()));
		let scripted = match target {
			Processor::Primary => state.primary.pop_front(),
			Processor::Fallback => state.fallback.pop_front(),
		};
		scripted.unwrap_or_else(|| match target {
			Processor::Primary => state.primary_default.clone(),
			Processor::Fallback => state.fallback_default.clone(),
		})
	}
}

pub fn transient() -> ProcessorOutcome {
	ProcessorOutcome::TransientFailure("HTTP 500 Internal Server Error".to_string())
}

pub fn terminal() -> ProcessorOutcome {
	ProcessorOutcome::TerminalFailure("HTTP 422 Unprocessable Entity".to_string())
}
