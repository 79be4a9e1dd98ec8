use std::io;
use std::sync::Arc;

use log::error;
use payment_dispatcher::infrastructure::config::settings::Config;
use payment_dispatcher::run;

#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::init();

	let config = Config::load().map_err(|e| {
		error!("Failed to load configuration: {e}");
		io::Error::other(e)
	})?;

	run(Arc::new(config)).await
}
