//! The injected trigger buttons and their presentation state.
//!
//! Three buttons are prepended to the quiz form, styled by copying the CSS
//! classes off the form's own submit control. Clicks are recorded in a
//! page-global slot that the controller drains on its idle poll; the page
//! never calls back into this process. Only the controller mutates the
//! enabled/label state, through [`ControlSurface`].

use chromiumoxide::Page;
use color_eyre::{
	Result,
	eyre::{bail, eyre},
};
use v_utils::{elog, log};

use crate::Trigger;

const TRIGGER_SLOT: &str = "window.__quizPagerTrigger";
const CONTAINER_ID: &str = "qp-top-buttons";

/// Mutation interface over the injected triggers.
pub trait ControlSurface {
	/// Inject the buttons once per page load. `false` when the surface already
	/// exists: no mutation, diagnostic log only.
	fn ensure_injected(&mut self) -> impl Future<Output = Result<bool>>;

	/// Disable every trigger and swap the initiating one to its busy label.
	fn set_busy(&mut self, active: Trigger) -> impl Future<Output = Result<()>>;

	/// Re-enable every trigger and restore the idle labels.
	fn set_idle(&mut self) -> impl Future<Output = Result<()>>;

	/// Drain the pending user activation, if any.
	fn take_trigger(&mut self) -> impl Future<Output = Result<Option<Trigger>>>;
}

/// [`ControlSurface`] over a live page.
pub struct DomSurface {
	page: Page,
	form_selector: String,
	submit_selector: String,
	threshold_percent: u32,
}

impl DomSurface {
	pub fn new(page: Page, form_selector: impl Into<String>, submit_selector: impl Into<String>, threshold_percent: u32) -> Self {
		Self {
			page,
			form_selector: form_selector.into(),
			submit_selector: submit_selector.into(),
			threshold_percent,
		}
	}

	fn idle_label(&self, trigger: Trigger) -> String {
		match trigger {
			Trigger::NextOnce => "Next (Top)".to_string(),
			Trigger::ToThreshold => format!("Go to {}% Page", self.threshold_percent),
			Trigger::ToEnd => "Go to Last Page".to_string(),
		}
	}

	fn busy_label(&self, trigger: Trigger) -> String {
		match trigger {
			// NextOnce is a single-shot proxy and never holds the surface busy
			Trigger::NextOnce => self.idle_label(trigger),
			Trigger::ToThreshold => format!("Going to {}%...", self.threshold_percent),
			Trigger::ToEnd => "Going to last...".to_string(),
		}
	}
}

impl ControlSurface for DomSurface {
	async fn ensure_injected(&mut self) -> Result<bool> {
		let script = format!(
			r#"
			(function() {{
				if (document.getElementById({container:?})) return "present";
				const form = document.querySelector({form:?});
				const original = document.querySelector({submit:?});
				if (!form || !original) return "missing";

				const container = document.createElement('div');
				container.id = {container:?};
				container.style.marginBottom = '20px';
				container.style.display = 'flex';
				container.style.gap = '10px';
				container.style.justifyContent = 'center';
				container.style.flexWrap = 'wrap';

				const make = (role, text) => {{
					const btn = document.createElement('button');
					btn.id = {container:?} + '-' + role;
					btn.type = 'button';
					btn.textContent = text;
					original.classList.forEach(cls => btn.classList.add(cls));
					btn.style.position = 'relative';
					btn.style.width = 'auto';
					btn.addEventListener('click', () => {{
						if (!btn.disabled) {slot} = role;
					}});
					container.appendChild(btn);
				}};
				make({next_role:?}, {next_label:?});
				make({threshold_role:?}, {threshold_label:?});
				make({end_role:?}, {end_label:?});

				form.prepend(container);
				return "added";
			}})()
			"#,
			container = CONTAINER_ID,
			form = self.form_selector,
			submit = self.submit_selector,
			slot = TRIGGER_SLOT,
			next_role = Trigger::NextOnce.role(),
			next_label = self.idle_label(Trigger::NextOnce),
			threshold_role = Trigger::ToThreshold.role(),
			threshold_label = self.idle_label(Trigger::ToThreshold),
			end_role = Trigger::ToEnd.role(),
			end_label = self.idle_label(Trigger::ToEnd),
		);

		let result = self.page.evaluate(script).await.map_err(|e| eyre!("Failed to inject navigation buttons: {}", e))?;
		match result.value().and_then(|v| v.as_str()) {
			Some("added") => {
				log!("Navigation buttons added.");
				Ok(true)
			}
			Some("present") => {
				log!("Navigation buttons already exist.");
				Ok(false)
			}
			other => bail!("Quiz form or submit control not found while injecting buttons (got {:?})", other),
		}
	}

	async fn set_busy(&mut self, active: Trigger) -> Result<()> {
		let script = format!(
			r#"
			(function() {{
				for (const role of [{next:?}, {threshold:?}, {end:?}]) {{
					const btn = document.getElementById({container:?} + '-' + role);
					if (btn) btn.disabled = true;
				}}
				const activeBtn = document.getElementById({container:?} + '-' + {active:?});
				if (activeBtn) activeBtn.textContent = {busy:?};
			}})()
			"#,
			next = Trigger::NextOnce.role(),
			threshold = Trigger::ToThreshold.role(),
			end = Trigger::ToEnd.role(),
			container = CONTAINER_ID,
			active = active.role(),
			busy = self.busy_label(active),
		);
		self.page.evaluate(script).await.map_err(|e| eyre!("Failed to disable navigation buttons: {}", e))?;
		Ok(())
	}

	async fn set_idle(&mut self) -> Result<()> {
		let script = format!(
			r#"
			(function() {{
				const labels = {{ {next:?}: {next_label:?}, {threshold:?}: {threshold_label:?}, {end:?}: {end_label:?} }};
				for (const role of Object.keys(labels)) {{
					const btn = document.getElementById({container:?} + '-' + role);
					if (btn) {{
						btn.disabled = false;
						btn.textContent = labels[role];
					}}
				}}
			}})()
			"#,
			next = Trigger::NextOnce.role(),
			next_label = self.idle_label(Trigger::NextOnce),
			threshold = Trigger::ToThreshold.role(),
			threshold_label = self.idle_label(Trigger::ToThreshold),
			end = Trigger::ToEnd.role(),
			end_label = self.idle_label(Trigger::ToEnd),
			container = CONTAINER_ID,
		);
		self.page.evaluate(script).await.map_err(|e| eyre!("Failed to re-enable navigation buttons: {}", e))?;
		Ok(())
	}

	async fn take_trigger(&mut self) -> Result<Option<Trigger>> {
		let script = format!(
			r#"
			(function() {{
				const pending = {slot} || null;
				{slot} = null;
				return pending;
			}})()
			"#,
			slot = TRIGGER_SLOT
		);
		let result = self.page.evaluate(script).await.map_err(|e| eyre!("Failed to poll trigger slot: {}", e))?;
		let Some(value) = result.value().filter(|v| !v.is_null()) else {
			return Ok(None);
		};
		// Role strings are the kebab-case serde names of Trigger
		match serde_json::from_value::<Trigger>(value.clone()) {
			Ok(trigger) => Ok(Some(trigger)),
			Err(_) => {
				elog!("Unknown trigger role {} in the page slot, dropping it.", value);
				Ok(None)
			}
		}
	}
}
