use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, web};

/// A stand-in payment processor listening on an ephemeral local port.
pub struct FakeProcessorServer {
	pub base_url: String,
	state:        web::Data<ServerState>,
	handle:       ServerHandle,
}

struct ServerState {
	status:   AtomicU16,
	delay_ms: AtomicU64,
	received: Mutex<Vec<serde_json::Value>>,
}

impl FakeProcessorServer {
	pub async fn start(status: StatusCode) -> Self {
		let state = web::Data::new(ServerState {
			status:   AtomicU16::new(status.as_u16()),
			delay_ms: AtomicU64::new(0),
			received: Mutex::new(Vec::new()),
		});

		let app_state = state.clone();
		let server = HttpServer::new(move || {
			App::new()
				.app_data(app_state.clone())
				.route("/payments", web::post().to(record_payment))
		})
		.workers(1)
		.bind(("127.0.0.1", 0))
		.unwrap();
		let port = server.addrs()[0].port();
		let server = server.run();
		let handle = server.handle();
		actix_web::rt::spawn(server);

		Self {
			base_url: format!("http://127.0.0.1:{port}"),
			state,
			handle,
		}
	}

	pub fn respond_with(&self, status: StatusCode) {
		self.state.status.store(status.as_u16(), Ordering::SeqCst);
	}

	pub fn delay_responses(&self, delay: Duration) {
		self.state
			.delay_ms
			.store(delay.as_millis() as u64, Ordering::SeqCst);
	}

	pub fn received(&self) -> Vec<serde_json::Value> {
		self.state.received.lock().unwrap().clone()
	}

	pub async fn stop(&self) {
		self.handle.stop(false).await;
	}
}

async fn record_payment(
	state: web::Data<ServerState>,
	body: web::Json<serde_json::Value>,
) -> HttpResponse {
	state.received.lock().unwrap().push(body.into_inner());

	let delay_ms = state.delay_ms.load(Ordering::SeqCst);
	if delay_ms > 0 {
		actix_web::rt::time::sleep(Duration::from_millis(delay_ms)).await;
	}

	let status = StatusCode::from_u16(state.status.load(Ordering::SeqCst)).unwrap();
	HttpResponse::build(status).finish()
}
