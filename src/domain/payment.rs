use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The two interchangeable upstream processors a payment can be sent to.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Processor {
	Primary,
	Fallback,
}

impl Processor {
	pub fn name(&self) -> &'static str {
		match self {
			Processor::Primary => "primary",
			Processor::Fallback => "fallback",
		}
	}
}

impl fmt::Display for Processor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentRequest {
	pub correlation_id: String,
	pub amount:         Decimal,
}

impl PaymentRequest {
	pub fn new(correlation_id: impl Into<String>, amount: Decimal) -> Self {
		Self {
			correlation_id: correlation_id.into(),
			amount,
		}
	}
}

/// A dispatched payment, as recorded once a processor accepted it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Payment {
	pub correlation_id: String,
	pub processed_by:   Processor,
	pub amount:         Decimal,
	#[serde(with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
}

impl Payment {
	pub fn new(
		request: &PaymentRequest,
		processed_by: Processor,
		requested_at: OffsetDateTime,
	) -> Self {
		Self {
			correlation_id: request.correlation_id.clone(),
			processed_by,
			amount: request.amount,
			requested_at,
		}
	}

	/// Inclusive on both ends; a missing bound is unbounded on that side.
	pub fn requested_within(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> bool {
		from.is_none_or(|from| self.requested_at >= from) &&
			to.is_none_or(|to| self.requested_at <= to)
	}
}
