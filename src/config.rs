use serde::Deserialize;

/// Tool configuration, populated from CLI args in main.
///
/// Defaults mirror the timings the 16Personalities form is known to tolerate.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Interval between element-discovery attempts, in ms (default: 500)
	pub check_interval_ms: u64,
	/// How many discovery attempts before giving up (default: 20)
	pub max_checks: u32,
	/// Interval between auto-advance ticks, in ms (default: 200)
	pub auto_page_interval_ms: u64,
	/// Progress percentage at which the threshold run stops (default: 80)
	pub threshold_percent: u32,
	/// Submit-control text that means "clicking advances one page" (default: "Next")
	pub advance_label: String,
	/// Submit-control text shown on the final page (default: "See results")
	pub terminal_label: String,
	/// CSS selector for the form's own submit control
	pub submit_selector: String,
	/// CSS selector for the progress percentage element
	pub progress_selector: String,
	/// CSS selector for the quiz form the surface is injected into
	pub form_selector: String,
	/// Run with visible browser window (non-headless mode)
	pub visible: bool,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			check_interval_ms: 500,
			max_checks: 20,
			auto_page_interval_ms: 200,
			threshold_percent: 80,
			advance_label: "Next".to_string(),
			terminal_label: "See results".to_string(),
			submit_selector: "form[data-quiz] .action-row button".to_string(),
			progress_selector: "#progress-wrapper .percentage".to_string(),
			form_selector: "form[data-quiz]".to_string(),
			visible: false,
		}
	}
}

impl AppConfig {
	pub fn check_interval(&self) -> std::time::Duration {
		std::time::Duration::from_millis(self.check_interval_ms)
	}

	pub fn auto_page_interval(&self) -> std::time::Duration {
		std::time::Duration::from_millis(self.auto_page_interval_ms)
	}
}
