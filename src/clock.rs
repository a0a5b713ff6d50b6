use std::time::{SystemTime, UNIX_EPOCH};

/// Where a [`SecureCookie`](super::SecureCookie) gets the time from, for stamping new values and
/// checking the age of old ones.
///
/// Anything that can be called to get the current Unix time, in seconds, will do, which is
/// mostly handy for testing:
///
/// ```rust
/// use secure_cookie::SecureCookie;
///
/// let codec = SecureCookie::new(b"very-secret", None).clock(|| 1_234_567_890i64);
/// ```
pub trait Clock: Send + Sync {
	fn now(&self) -> i64;
}

/// The system's wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	#[tracing::instrument(level = "trace")]
	fn now(&self) -> i64 {
		match SystemTime::now().duration_since(UNIX_EPOCH) {
			Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
			// Somebody's set the clock to before 1970
			Err(e) => i64::try_from(e.duration().as_secs()).map_or(i64::MIN, |s| -s),
		}
	}
}

impl<F> Clock for F
where
	F: Fn() -> i64 + Send + Sync,
{
	fn now(&self) -> i64 {
		self()
	}
}
