use async_trait::async_trait;

#[async_trait]
pub trait Queue<B>: Send + Sync + 'static {
	/// Never waits. `false` means the item was not admitted.
	fn accept(&self, item: B) -> bool;

	/// Waits for the next item. `None` once the queue is shut down.
	async fn take(&self) -> Option<B>;

	/// Drops every queued item, returning how many were dropped.
	fn purge(&self) -> usize;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
