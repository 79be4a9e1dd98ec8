pub const PAYMENTS_KEY: &str = "payments";

pub fn staging_key(correlation_id: &str) -> String {
	format!("{PAYMENTS_KEY}:{correlation_id}")
}
