//! Read/click access to the host form's own controls.
//!
//! The submit control and the progress indicator belong to the host page and
//! mutate between ticks. Everything the controller knows about them flows
//! through [`FormObserver`], so tests can script the external state without a
//! browser.

use chromiumoxide::Page;
use color_eyre::{Result, eyre::eyre};

/// One-tick reads of the external form state, plus the single mutating action
/// this tool performs on the host page.
pub trait FormObserver {
	/// Trimmed live text of the form's submit control. `None`: the control is gone.
	fn submit_label(&self) -> impl Future<Output = Result<Option<String>>>;

	/// Raw text of the progress percentage element. `None`: the indicator is gone.
	fn progress_text(&self) -> impl Future<Output = Result<Option<String>>>;

	/// Synthesize one activation on the submit control.
	/// `false`: the control vanished before the click landed.
	fn click_submit(&self) -> impl Future<Output = Result<bool>>;
}

/// [`FormObserver`] over a live page, resolving elements by selector on every call.
#[derive(Clone)]
pub struct DomObserver {
	page: Page,
	submit_selector: String,
	progress_selector: String,
}

impl DomObserver {
	pub fn new(page: Page, submit_selector: impl Into<String>, progress_selector: impl Into<String>) -> Self {
		Self {
			page,
			submit_selector: submit_selector.into(),
			progress_selector: progress_selector.into(),
		}
	}

	async fn text_of(&self, selector: &str) -> Result<Option<String>> {
		let script = format!(
			r#"
			(function() {{
				const el = document.querySelector({selector:?});
				return el ? el.textContent.trim() : null;
			}})()
			"#
		);
		let result = self.page.evaluate(script).await.map_err(|e| eyre!("Failed to read \"{}\": {}", selector, e))?;
		Ok(result.value().and_then(|v| v.as_str()).map(|s| s.to_string()))
	}
}

impl FormObserver for DomObserver {
	async fn submit_label(&self) -> Result<Option<String>> {
		self.text_of(&self.submit_selector).await
	}

	async fn progress_text(&self) -> Result<Option<String>> {
		self.text_of(&self.progress_selector).await
	}

	async fn click_submit(&self) -> Result<bool> {
		let script = format!(
			r#"
			(function() {{
				const el = document.querySelector({:?});
				if (el) {{ el.click(); return true; }}
				return false;
			}})()
			"#,
			self.submit_selector
		);
		let result = self.page.evaluate(script).await.map_err(|e| eyre!("Failed to click submit control: {}", e))?;
		Ok(result.value().and_then(|v| v.as_bool()).unwrap_or(false))
	}
}
