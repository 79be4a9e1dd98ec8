use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, redirect};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::payment::{Payment, Processor};
use crate::domain::payment_processor::{PaymentProcessorClient, ProcessorOutcome};

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Body accepted by a processor's `POST /payments`.
#[derive(Debug, Deserialize, Serialize)]
pub struct ProcessorPaymentRequest {
	#[serde(rename = "correlationId")]
	pub correlation_id: String,
	#[serde(with = "rust_decimal::serde::float")]
	pub amount:         Decimal,
	#[serde(rename = "requestedAt", with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
}

impl From<&Payment> for ProcessorPaymentRequest {
	fn from(payment: &Payment) -> Self {
		Self {
			correlation_id: payment.correlation_id.clone(),
			amount:         payment.amount,
			requested_at:   payment.requested_at,
		}
	}
}

/// Sends a single request per call; retry policy lives in the router.
#[derive(Clone)]
pub struct HttpPaymentProcessorClient {
	http_client:  Client,
	primary_url:  String,
	fallback_url: String,
}

impl HttpPaymentProcessorClient {
	pub fn new(
		primary_url: &str,
		fallback_url: &str,
		timeout: Duration,
	) -> Result<Self, reqwest::Error> {
		let http_client = Client::builder()
			.timeout(timeout)
			.redirect(redirect::Policy::none())
			.build()?;

		Ok(Self {
			http_client,
			primary_url: payments_endpoint(primary_url),
			fallback_url: payments_endpoint(fallback_url),
		})
	}

	fn url_for(&self, target: Processor) -> &str {
		match target {
			Processor::Primary => &self.primary_url,
			Processor::Fallback => &self.fallback_url,
		}
	}
}

fn payments_endpoint(base_url: &str) -> String {
	format!("{}/payments", base_url.trim_end_matches('/'))
}

#[async_trait]
impl PaymentProcessorClient for HttpPaymentProcessorClient {
	async fn send(&self, target: Processor, payment: &Payment) -> ProcessorOutcome {
		let url = self.url_for(target);
		let body = ProcessorPaymentRequest::from(payment);

		let response = match self.http_client.post(url).json(&body).send().await {
			Ok(response) => response,
			Err(e) => {
				warn!(
					"Failed to reach {target} processor for {}: {e}",
					payment.correlation_id
				);
				return ProcessorOutcome::TransientFailure(e.to_string());
			}
		};

		let status = response.status();
		debug!(
			"{target} processor answered {status} for {}",
			payment.correlation_id
		);

		if status.is_success() {
			ProcessorOutcome::Success
		} else if status.is_server_error() {
			ProcessorOutcome::TransientFailure(format!("HTTP {status}"))
		} else {
			ProcessorOutcome::TerminalFailure(format!("HTTP {status}"))
		}
	}
}
