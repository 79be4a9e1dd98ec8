use derive_more::derive::{Display, Error};
use log::debug;
use time::OffsetDateTime;

use crate::domain::payment_summary::{PaymentsSummary, SummaryOverflow};
use crate::domain::repository::{PaymentStore, StoreError};
use crate::use_cases::dto::GetPaymentSummaryQuery;

#[derive(Debug, Display, Error)]
pub enum SummaryError {
	#[display("'from' ({from}) is after 'to' ({to})")]
	InvalidRange {
		from: OffsetDateTime,
		to:   OffsetDateTime,
	},
	#[display("Could not read payments: {_0}")]
	Store(#[error(source)] StoreError),
	#[display("Could not summarize payments: {_0}")]
	Overflow(#[error(source)] SummaryOverflow),
}

#[derive(Clone)]
pub struct GetPaymentSummaryUseCase<S: PaymentStore> {
	store: S,
}

impl<S: PaymentStore> GetPaymentSummaryUseCase<S> {
	pub fn new(store: S) -> Self {
		Self { store }
	}

	pub async fn execute(
		&self,
		query: GetPaymentSummaryQuery,
	) -> Result<PaymentsSummary, SummaryError> {
		if let (Some(from), Some(to)) = (query.from, query.to) &&
			from > to
		{
			return Err(SummaryError::InvalidRange { from, to });
		}

		let payments = self.store.scan_all().await.map_err(SummaryError::Store)?;
		debug!("Summarizing {} stored payments", payments.len());

		PaymentsSummary::tally(&payments, query.from, query.to).map_err(SummaryError::Overflow)
	}
}
