use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, error};
use derive_more::derive::{Display, Error};
use serde::Serialize;

use crate::use_cases::create_payment::AdmissionRejected;
use crate::use_cases::get_payment_summary::SummaryError;

#[derive(Serialize)]
struct ErrorResponse {
	#[serde(rename = "statusCode")]
	status_code: u16,
	error:       String,
	message:     String,
}

#[derive(Debug, Display, Error)]
pub enum ApiError {
	#[display("Payment queue is full, try again later.")]
	QueueFull,
	#[display("Could not reach the payment store.")]
	StoreUnavailable,
	#[display("Request data is invalid.")]
	BadClientDataError,
	#[display("Payment totals are out of range.")]
	AmountOutOfRange,
}

impl ApiError {
	pub fn name(&self) -> String {
		match self {
			ApiError::QueueFull => "Service Unavailable".to_string(),
			ApiError::StoreUnavailable => "Internal Server Error".to_string(),
			ApiError::BadClientDataError => "Bad request".to_string(),
			ApiError::AmountOutOfRange => "Unprocessable Entity".to_string(),
		}
	}
}

impl error::ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.content_type(ContentType::json())
			.json(ErrorResponse {
				status_code: self.status_code().as_u16(),
				error:       self.to_string(),
				message:     self.name(),
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::QueueFull => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
			ApiError::BadClientDataError => StatusCode::BAD_REQUEST,
			ApiError::AmountOutOfRange => StatusCode::UNPROCESSABLE_ENTITY,
		}
	}
}

impl From<AdmissionRejected> for ApiError {
	fn from(_: AdmissionRejected) -> Self {
		ApiError::QueueFull
	}
}

impl From<SummaryError> for ApiError {
	fn from(e: SummaryError) -> Self {
		match e {
			SummaryError::InvalidRange { .. } => ApiError::BadClientDataError,
			SummaryError::Store(_) => ApiError::StoreUnavailable,
			SummaryError::Overflow(_) => ApiError::AmountOutOfRange,
		}
	}
}

#[cfg(test)]
mod tests {
	use actix_web::error::ResponseError;

	use super::*;
	use crate::domain::payment_summary::SummaryOverflow;

	#[test]
	fn test_queue_full_error() {
		let error = ApiError::QueueFull;
		assert_eq!(error.name(), "Service Unavailable");
		assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);

		let resp = error.error_response();
		assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
	}

	#[test]
	fn test_store_unavailable_error() {
		let error = ApiError::StoreUnavailable;
		assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

		let resp = error.error_response();
		assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn test_bad_client_data_error() {
		let error = ApiError::BadClientDataError;
		assert_eq!(error.name(), "Bad request");
		assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);

		let resp = error.error_response();
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[test]
	fn test_invalid_range_maps_to_bad_request() {
		let from = time::OffsetDateTime::UNIX_EPOCH + time::Duration::hours(1);
		let error = ApiError::from(SummaryError::InvalidRange {
			from,
			to: time::OffsetDateTime::UNIX_EPOCH,
		});

		assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
	}

	#[test]
	fn test_summary_overflow_maps_to_unprocessable_entity() {
		let error = ApiError::from(SummaryError::Overflow(SummaryOverflow));

		assert_eq!(error.name(), "Unprocessable Entity");
		assert_eq!(error.error_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
	}
}
