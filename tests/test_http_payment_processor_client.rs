use std::net::TcpListener;
use std::time::Duration;

use actix_web::http::StatusCode;
use payment_dispatcher::domain::payment::{Payment, PaymentRequest, Processor};
use payment_dispatcher::domain::payment_processor::{
	PaymentProcessorClient, ProcessorOutcome,
};
use payment_dispatcher::infrastructure::processors::http_payment_processor_client::HttpPaymentProcessorClient;
use rust_decimal_macros::dec;
use time::OffsetDateTime;

mod support;

use crate::support::processor_server::FakeProcessorServer;

fn payment(correlation_id: &str) -> Payment {
	Payment::new(
		&PaymentRequest::new(correlation_id, dec!(19.90)),
		Processor::Primary,
		OffsetDateTime::now_utc(),
	)
}

fn client_for(
	primary: &str,
	fallback: &str,
	timeout: Duration,
) -> HttpPaymentProcessorClient {
	HttpPaymentProcessorClient::new(primary, fallback, timeout).unwrap()
}

#[actix_web::test]
async fn test_send_success_posts_payment_body() {
	let primary = FakeProcessorServer::start(StatusCode::OK).await;
	let fallback = FakeProcessorServer::start(StatusCode::OK).await;
	let client = client_for(&primary.base_url, &fallback.base_url, Duration::from_secs(1));

	let outcome = client.send(Processor::Primary, &payment("abc-123")).await;

	assert_eq!(outcome, ProcessorOutcome::Success);
	let received = primary.received();
	assert_eq!(received.len(), 1);
	assert_eq!(received[0]["correlationId"], "abc-123");
	assert_eq!(received[0]["amount"], 19.9);
	assert!(received[0]["requestedAt"].is_string());
	assert!(fallback.received().is_empty());

	primary.stop().await;
	fallback.stop().await;
}

#[actix_web::test]
async fn test_send_targets_fallback_url() {
	let primary = FakeProcessorServer::start(StatusCode::OK).await;
	let fallback = FakeProcessorServer::start(StatusCode::OK).await;
	let fallback_url = format!("{}/", fallback.base_url);
	let client = client_for(&primary.base_url, &fallback_url, Duration::from_secs(1));

	let outcome = client.send(Processor::Fallback, &payment("abc-123")).await;

	assert_eq!(outcome, ProcessorOutcome::Success);
	assert!(primary.received().is_empty());
	assert_eq!(fallback.received().len(), 1);

	primary.stop().await;
	fallback.stop().await;
}

#[actix_web::test]
async fn test_send_maps_status_codes() {
	let server = FakeProcessorServer::start(StatusCode::OK).await;
	let client = client_for(&server.base_url, &server.base_url, Duration::from_secs(1));

	let cases = [
		(StatusCode::NO_CONTENT, "success"),
		(StatusCode::INTERNAL_SERVER_ERROR, "transient"),
		(StatusCode::SERVICE_UNAVAILABLE, "transient"),
		(StatusCode::BAD_REQUEST, "terminal"),
		(StatusCode::UNPROCESSABLE_ENTITY, "terminal"),
		(StatusCode::FOUND, "terminal"),
	];

	for (status, expected) in cases {
		server.respond_with(status);

		let outcome = client.send(Processor::Primary, &payment("abc-123")).await;

		let actual = match outcome {
			ProcessorOutcome::Success => "success",
			ProcessorOutcome::TransientFailure(_) => "transient",
			ProcessorOutcome::TerminalFailure(_) => "terminal",
		};
		assert_eq!(actual, expected, "unexpected outcome for {status}");
	}

	server.stop().await;
}

#[actix_web::test]
async fn test_send_timeout_is_transient() {
	let server = FakeProcessorServer::start(StatusCode::OK).await;
	server.delay_responses(Duration::from_millis(500));
	let client = client_for(
		&server.base_url,
		&server.base_url,
		Duration::from_millis(100),
	);

	let outcome = client.send(Processor::Primary, &payment("slow")).await;

	assert!(matches!(outcome, ProcessorOutcome::TransientFailure(_)));

	server.stop().await;
}

#[actix_web::test]
async fn test_send_connection_refused_is_transient() {
	let unused_port = {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		listener.local_addr().unwrap().port()
	};
	let url = format!("http://127.0.0.1:{unused_port}");
	let client = client_for(&url, &url, Duration::from_secs(1));

	let outcome = client.send(Processor::Primary, &payment("nobody-home")).await;

	assert!(matches!(outcome, ProcessorOutcome::TransientFailure(_)));
}
