/// Consecutive-failure counts keyed by correlation id.
///
/// Implementations must make `increment` an atomic read-modify-write so
/// concurrent attempts for the same id each observe a distinct count.
pub trait FailureCounter: Send + Sync + 'static {
	/// Returns the count after incrementing.
	fn increment(&self, correlation_id: &str) -> u64;

	fn current(&self, correlation_id: &str) -> u64;

	fn reset(&self, correlation_id: &str);

	/// Number of ids currently tracked.
	fn tracked(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
	Completed,
	RetryPrimary { failures: u64 },
	SwitchToFallback { failures: u64 },
	Surface { reason: String },
}
