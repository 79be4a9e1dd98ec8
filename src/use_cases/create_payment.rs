use derive_more::derive::{Display, Error};

use crate::domain::payment::PaymentRequest;
use crate::domain::queue::Queue;
use crate::use_cases::dto::CreatePaymentCommand;

#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display("Payment {correlation_id} was not admitted: queue is full or shutting down")]
pub struct AdmissionRejected {
	pub correlation_id: String,
}

#[derive(Clone)]
pub struct CreatePaymentUseCase<Q: Queue<PaymentRequest>> {
	payment_queue: Q,
}

impl<Q: Queue<PaymentRequest>> CreatePaymentUseCase<Q> {
	pub fn new(payment_queue: Q) -> Self {
		Self { payment_queue }
	}

	pub fn execute(&self, command: CreatePaymentCommand) -> Result<(), AdmissionRejected> {
		let request = PaymentRequest::new(command.correlation_id, command.amount);
		let correlation_id = request.correlation_id.clone();

		if self.payment_queue.accept(request) {
			Ok(())
		} else {
			Err(AdmissionRejected { correlation_id })
		}
	}
}
