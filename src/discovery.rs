//! Bounded-retry discovery of host-page elements.
//!
//! The host renders asynchronously, so wiring is gated on the required element
//! existing. The wait is hard-bounded: if the page never renders the expected
//! structure (navigation away, variant layout), we log and stand down instead
//! of polling forever.

use std::time::Duration;

use chromiumoxide::{Page, element::Element};
use v_utils::elog;

/// Poll `probe` up to `max_checks` times at a fixed `interval`.
///
/// Returns the first `Some` the probe produces. On exhaustion returns `None`
/// after logging; no error surfaces and nothing retries afterwards.
pub async fn wait_for<T, F>(mut probe: F, what: &str, max_checks: u32, interval: Duration) -> Option<T>
where
	F: AsyncFnMut() -> Option<T>,
{
	for check in 0..max_checks {
		if let Some(found) = probe().await {
			return Some(found);
		}
		if check + 1 < max_checks {
			tokio::time::sleep(interval).await;
		}
	}
	elog!("\"{}\" not found after {}ms.", what, max_checks as u64 * interval.as_millis() as u64);
	None
}

/// Wait for an element matching `selector` to exist on the page.
pub async fn wait_for_element(page: &Page, selector: &str, max_checks: u32, interval: Duration) -> Option<Element> {
	wait_for(async || page.find_element(selector).await.ok(), selector, max_checks, interval).await
}
