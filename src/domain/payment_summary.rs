use derive_more::derive::{Display, Error};
use rayon::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::payment::{Payment, Processor};

const AMOUNT_SCALE: u32 = 2;

/// A total no longer fits a `Decimal` with two fractional digits.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Payment totals exceed the representable amount range")]
pub struct SummaryOverflow;

/// Two fractional digits, ties rounded towards zero.
pub fn normalize_amount(amount: Decimal) -> Result<Decimal, SummaryOverflow> {
	let mut normalized = amount
		.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointTowardZero);
	normalized.rescale(AMOUNT_SCALE);
	if normalized.scale() != AMOUNT_SCALE {
		return Err(SummaryOverflow);
	}
	Ok(normalized)
}

/// Request count and amount total for one processor.
///
/// The amount is normalized on every construction, so two summaries that
/// differ only in trailing zeros compare equal and serialize identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "PaymentSummaryBody", into = "PaymentSummaryBody")]
pub struct PaymentSummary {
	total_requests: u64,
	total_amount:   Decimal,
}

impl PaymentSummary {
	pub const ZERO: PaymentSummary = PaymentSummary {
		total_requests: 0,
		total_amount:   Decimal::from_parts(0, 0, 0, false, AMOUNT_SCALE),
	};

	pub fn new(total_requests: u64, total_amount: Decimal) -> Result<Self, SummaryOverflow> {
		Ok(Self {
			total_requests,
			total_amount: normalize_amount(total_amount)?,
		})
	}

	pub fn total_requests(&self) -> u64 {
		self.total_requests
	}

	pub fn total_amount(&self) -> Decimal {
		self.total_amount
	}

	pub fn try_add(self, other: PaymentSummary) -> Result<PaymentSummary, SummaryOverflow> {
		let total_requests = self
			.total_requests
			.checked_add(other.total_requests)
			.ok_or(SummaryOverflow)?;
		let total_amount = self
			.total_amount
			.checked_add(other.total_amount)
			.ok_or(SummaryOverflow)?;
		PaymentSummary::new(total_requests, total_amount)
	}
}

impl Default for PaymentSummary {
	fn default() -> Self {
		Self::ZERO
	}
}

#[derive(Deserialize, Serialize)]
struct PaymentSummaryBody {
	#[serde(rename = "totalRequests")]
	total_requests: u64,
	#[serde(rename = "totalAmount", with = "rust_decimal::serde::float")]
	total_amount:   Decimal,
}

impl TryFrom<PaymentSummaryBody> for PaymentSummary {
	type Error = SummaryOverflow;

	fn try_from(body: PaymentSummaryBody) -> Result<Self, Self::Error> {
		PaymentSummary::new(body.total_requests, body.total_amount)
	}
}

impl From<PaymentSummary> for PaymentSummaryBody {
	fn from(summary: PaymentSummary) -> Self {
		PaymentSummaryBody {
			total_requests: summary.total_requests,
			total_amount:   summary.total_amount,
		}
	}
}

/// Per-processor report. Both processors are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PaymentsSummary {
	#[serde(default)]
	pub primary:  PaymentSummary,
	#[serde(default)]
	pub fallback: PaymentSummary,
}

impl PaymentsSummary {
	pub fn merge(self, other: PaymentsSummary) -> Result<Self, SummaryOverflow> {
		Ok(Self {
			primary:  self.primary.try_add(other.primary)?,
			fallback: self.fallback.try_add(other.fallback)?,
		})
	}

	/// Filters `payments` by request time and groups them by processor,
	/// reducing in parallel. Raw amounts are summed first and normalized
	/// once, so the result does not depend on how the work was split.
	pub fn tally(
		payments: &[Payment],
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<Self, SummaryOverflow> {
		let [primary, fallback] = payments
			.par_iter()
			.filter(|payment| payment.requested_within(from, to))
			.try_fold(
				|| [Tally::default(); 2],
				|mut tallies, payment| -> Result<[Tally; 2], SummaryOverflow> {
					let slot = &mut tallies[slot_of(payment.processed_by)];
					*slot = slot.record(payment.amount)?;
					Ok(tallies)
				},
			)
			.try_reduce(
				|| [Tally::default(); 2],
				|left, right| -> Result<[Tally; 2], SummaryOverflow> {
					Ok([left[0].join(right[0])?, left[1].join(right[1])?])
				},
			)?;

		Ok(Self {
			primary:  primary.into_summary()?,
			fallback: fallback.into_summary()?,
		})
	}
}

fn slot_of(processor: Processor) -> usize {
	match processor {
		Processor::Primary => 0,
		Processor::Fallback => 1,
	}
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
	requests: u64,
	amount:   Decimal,
}

impl Tally {
	fn record(self, amount: Decimal) -> Result<Self, SummaryOverflow> {
		self.join(Tally {
			requests: 1,
			amount,
		})
	}

	fn join(self, other: Tally) -> Result<Self, SummaryOverflow> {
		Ok(Self {
			requests: self
				.requests
				.checked_add(other.requests)
				.ok_or(SummaryOverflow)?,
			amount:   self
				.amount
				.checked_add(other.amount)
				.ok_or(SummaryOverflow)?,
		})
	}

	fn into_summary(self) -> Result<PaymentSummary, SummaryOverflow> {
		PaymentSummary::new(self.requests, self.amount)
	}
}
