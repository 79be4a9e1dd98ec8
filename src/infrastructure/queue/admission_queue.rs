use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::domain::queue::Queue;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Bounded FIFO shared by the intake side and every dispatch worker.
///
/// `accept` refuses instead of waiting when the queue is full; that refusal
/// is the only backpressure the caller gets.
pub struct AdmissionQueue<B> {
	inner: Arc<Inner<B>>,
}

struct Inner<B> {
	items:    Mutex<VecDeque<B>>,
	capacity: usize,
	ready:    Notify,
	shutdown: CancellationToken,
}

impl<B> Clone for AdmissionQueue<B> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<B> AdmissionQueue<B> {
	pub fn new(capacity: usize) -> Self {
		Self {
			inner: Arc::new(Inner {
				items: Mutex::new(VecDeque::with_capacity(capacity)),
				capacity,
				ready: Notify::new(),
				shutdown: CancellationToken::new(),
			}),
		}
	}

	pub fn capacity(&self) -> usize {
		self.inner.capacity
	}

	/// Wakes every waiting `take` with `None` and refuses further admissions.
	/// Items still queued are left behind.
	pub fn shutdown(&self) {
		self.inner.shutdown.cancel();
	}

	pub fn is_shut_down(&self) -> bool {
		self.inner.shutdown.is_cancelled()
	}

	fn items(&self) -> MutexGuard<'_, VecDeque<B>> {
		self.inner
			.items
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
	}
}

#[async_trait]
impl<B: Send + 'static> Queue<B> for AdmissionQueue<B> {
	fn accept(&self, item: B) -> bool {
		if self.is_shut_down() {
			return false;
		}
		{
			let mut items = self.items();
			if items.len() >= self.inner.capacity {
				return false;
			}
			items.push_back(item);
		}
		self.inner.ready.notify_one();
		true
	}

	async fn take(&self) -> Option<B> {
		loop {
			let ready = self.inner.ready.notified();
			tokio::pin!(ready);
			ready.as_mut().enable();

			if self.is_shut_down() {
				return None;
			}
			if let Some(item) = self.items().pop_front() {
				return Some(item);
			}

			tokio::select! {
				biased;
				_ = self.inner.shutdown.cancelled() => return None,
				_ = &mut ready => {}
			}
		}
	}

	fn purge(&self) -> usize {
		let mut items = self.items();
		let dropped = items.len();
		items.clear();
		dropped
	}

	fn len(&self) -> usize {
		self.items().len()
	}
}
