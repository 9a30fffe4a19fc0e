//! Retry and cancellation helpers for adapter await points.
//!
//! Reads (`getDeposit`, `estimateGas`, wallet derivation) are idempotent and
//! retried with exponential backoff on transport failures. Submissions never
//! go through `retry_read`.

use backoff::{backoff::Backoff, ExponentialBackoff};
use spoke_types::SpokeError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Bounded exponential backoff for idempotent reads.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
	backoff: ExponentialBackoff,
	max_retries: u32,
}

impl RetryPolicy {
	/// Three retries, giving up after 30 seconds overall.
	pub fn new() -> Self {
		let backoff = ExponentialBackoff {
			max_elapsed_time: Some(Duration::from_secs(30)),
			..Default::default()
		};

		Self {
			backoff,
			max_retries: 3,
		}
	}

	/// Policy that performs the read exactly once.
	pub fn none() -> Self {
		Self::new().with_max_retries(0)
	}

	pub fn with_max_retries(mut self, max_retries: u32) -> Self {
		self.max_retries = max_retries;
		self
	}

	pub fn with_initial_interval(mut self, interval: Duration) -> Self {
		self.backoff.initial_interval = interval;
		self.backoff.current_interval = interval;
		self
	}

	pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
		self.backoff.max_elapsed_time = Some(max_elapsed);
		self
	}

	pub fn max_retries(&self) -> u32 {
		self.max_retries
	}
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new()
	}
}

/// Races a fallible future against cancellation.
pub async fn cancellable<T, E, F>(cancel: &CancellationToken, fut: F) -> Result<T, SpokeError>
where
	F: Future<Output = Result<T, E>>,
	E: Into<SpokeError>,
{
	tokio::select! {
		biased;
		_ = cancel.cancelled() => Err(SpokeError::Cancelled),
		result = fut => result.map_err(Into::into),
	}
}

/// Runs an idempotent read, retrying transport failures under `policy`.
///
/// Each attempt and each backoff sleep honor `cancel`.
pub async fn retry_read<T, E, F, Fut>(
	operation: &str,
	policy: &RetryPolicy,
	cancel: &CancellationToken,
	mut read: F,
) -> Result<T, SpokeError>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, E>>,
	E: Into<SpokeError>,
{
	let mut backoff = policy.backoff.clone();
	backoff.reset();
	let mut attempts = 0;

	loop {
		let err = match cancellable(cancel, read()).await {
			Ok(value) => return Ok(value),
			Err(err) if !err.is_retryable() => return Err(err),
			Err(err) => err,
		};

		attempts += 1;
		if attempts > policy.max_retries {
			warn!(
				"{} failed after {} attempts, giving up: {}",
				operation, attempts, err
			);
			return Err(err);
		}

		match backoff.next_backoff() {
			Some(delay) => {
				warn!(
					"{} failed, attempt {}/{}, retrying in {:?}: {}",
					operation, attempts, policy.max_retries, delay, err
				);
				tokio::select! {
					biased;
					_ = cancel.cancelled() => return Err(SpokeError::Cancelled),
					_ = tokio::time::sleep(delay) => {}
				}
			}
			None => {
				warn!("{} failed, backoff exhausted: {}", operation, err);
				return Err(err);
			}
		}
	}
}
