//! The auto-advance controller.
//!
//! One cooperative loop owns everything: while idle it drains the trigger
//! slot, while a run is live it executes one tick per interval. All state
//! lives in [`AutoPager`] and every entry point checks the run slot first,
//! so at most one run can ever be in flight.

use std::{fmt, time::Duration};

use color_eyre::Result;
use tokio::time::{self, Interval, MissedTickBehavior};
use v_utils::{elog, log};

use crate::{LabelClassifier, LabelKind, Trigger, observer::FormObserver, parse_percent, surface::ControlSurface};

/// Predicate deciding when an auto-advance run ends.
///
/// A missing required element always ends the run regardless of the condition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopCondition {
	/// Stop once the submit control shows its terminal label
	TerminalLabel,
	/// Stop once the progress indicator reads at least this percentage
	ProgressAtLeast(u32),
}

/// Why a run ended, for diagnostics.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StopReason {
	ThresholdReached(u32),
	TerminalLabel,
	ExternalVanished,
	UnexpectedLabel(String),
}

impl fmt::Display for StopReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StopReason::ThresholdReached(percent) => write!(f, "reached {}%", percent),
			StopReason::TerminalLabel => write!(f, "reached the last page"),
			StopReason::ExternalVanished => write!(f, "form controls disappeared"),
			StopReason::UnexpectedLabel(label) => write!(f, "unexpected submit label \"{}\"", label.trim()),
		}
	}
}

/// The single in-flight run. Dropping it cancels its ticker.
struct RunHandle {
	kind: Trigger,
	stop: StopCondition,
	ticker: Interval,
}

/// Drives discrete advance actions against the host form until a stop
/// condition holds, serialized through the one run slot.
pub struct AutoPager<O, S> {
	observer: O,
	surface: S,
	classifier: LabelClassifier,
	threshold_percent: u32,
	tick_interval: Duration,
	run: Option<RunHandle>,
	last_stop: Option<StopReason>,
}

impl<O: FormObserver, S: ControlSurface> AutoPager<O, S> {
	pub fn new(observer: O, surface: S, classifier: LabelClassifier, threshold_percent: u32, tick_interval: Duration) -> Self {
		Self {
			observer,
			surface,
			classifier,
			threshold_percent,
			tick_interval,
			run: None,
			last_stop: None,
		}
	}

	pub fn is_running(&self) -> bool {
		self.run.is_some()
	}

	/// The trigger that started the active run, if any.
	pub fn active_kind(&self) -> Option<Trigger> {
		self.run.as_ref().map(|run| run.kind)
	}

	/// Why the most recently finished run stopped.
	pub fn last_stop(&self) -> Option<&StopReason> {
		self.last_stop.as_ref()
	}

	/// React to a user activation of one of the injected controls.
	///
	/// While a run is active every trigger is silently ignored; the buttons
	/// are disabled anyway, so this only fires on a stale slot value.
	pub async fn handle_trigger(&mut self, trigger: Trigger) -> Result<()> {
		if let Some(run) = &self.run {
			tracing::debug!("ignoring {:?} while a {:?} run is active", trigger, run.kind);
			return Ok(());
		}
		match trigger {
			Trigger::NextOnce => self.advance_once().await,
			Trigger::ToThreshold => {
				log!("Starting auto-advance to {}%...", self.threshold_percent);
				self.start_run(trigger, StopCondition::ProgressAtLeast(self.threshold_percent)).await
			}
			Trigger::ToEnd => {
				log!("Starting auto-advance to the last page...");
				self.start_run(trigger, StopCondition::TerminalLabel).await
			}
		}
	}

	/// Single proxied click, no run involved.
	async fn advance_once(&mut self) -> Result<()> {
		let Some(label) = self.observer.submit_label().await? else {
			elog!("Submit control not found.");
			return Ok(());
		};
		match self.classifier.classify(&label) {
			LabelKind::Advance => {
				log!("Clicking the form's submit control.");
				if !self.observer.click_submit().await? {
					elog!("Submit control vanished before the click landed.");
				}
			}
			LabelKind::Terminal | LabelKind::Unknown => {
				log!("Submit control is \"{}\", not clicking (likely the end).", label.trim());
			}
		}
		Ok(())
	}

	async fn start_run(&mut self, kind: Trigger, stop: StopCondition) -> Result<()> {
		self.surface.set_busy(kind).await?;
		// First tick one full period out, matching the recurring-timer feel of the surface
		let mut ticker = time::interval_at(time::Instant::now() + self.tick_interval, self.tick_interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		self.run = Some(RunHandle { kind, stop, ticker });
		Ok(())
	}

	/// One evaluation of the run body. No-op when idle.
	pub async fn tick(&mut self) -> Result<()> {
		let Some(run) = &self.run else {
			return Ok(());
		};
		let stop = run.stop;

		let Some(label) = self.observer.submit_label().await? else {
			elog!("Submit control disappeared. Stopping.");
			return self.finish_run(StopReason::ExternalVanished).await;
		};

		// Numeric threshold is evaluated before the label so it wins when
		// both conditions become true in the same tick.
		if let StopCondition::ProgressAtLeast(threshold) = stop {
			let Some(text) = self.observer.progress_text().await? else {
				elog!("Progress indicator disappeared. Stopping.");
				return self.finish_run(StopReason::ExternalVanished).await;
			};
			// Malformed text carries no numeric signal: skip the check, not an error
			if let Some(percent) = parse_percent(&text)
				&& percent >= threshold
			{
				log!("Reached or passed {}% (at {}%). Stopping.", threshold, percent);
				return self.finish_run(StopReason::ThresholdReached(percent)).await;
			}
		}

		match self.classifier.classify(&label) {
			LabelKind::Terminal => {
				log!("Reached \"{}\". Stopping.", self.classifier.terminal_label());
				self.finish_run(StopReason::TerminalLabel).await
			}
			LabelKind::Advance => {
				tracing::debug!("clicking \"{}\"", label.trim());
				if self.observer.click_submit().await? {
					Ok(())
				} else {
					elog!("Submit control vanished before the click landed. Stopping.");
					self.finish_run(StopReason::ExternalVanished).await
				}
			}
			LabelKind::Unknown => {
				elog!("Submit control text is \"{}\". Stopping.", label.trim());
				self.finish_run(StopReason::UnexpectedLabel(label)).await
			}
		}
	}

	/// End the active run: cancel its ticker, restore the surface.
	/// Idempotent; a call with no run active does nothing.
	async fn finish_run(&mut self, reason: StopReason) -> Result<()> {
		if self.run.take().is_none() {
			return Ok(());
		}
		self.surface.set_idle().await?;
		log!("Auto-paging finished: {}.", reason);
		self.last_stop = Some(reason);
		Ok(())
	}

	/// The cooperative scheduler. Never returns on its own; the caller
	/// selects against shutdown.
	pub async fn event_loop(&mut self) -> Result<()> {
		let mut idle_poll = time::interval(self.tick_interval);
		idle_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
		loop {
			let running = match self.run.as_mut() {
				Some(run) => {
					run.ticker.tick().await;
					true
				}
				None => {
					idle_poll.tick().await;
					false
				}
			};
			if running {
				self.tick().await?;
			} else if let Some(trigger) = self.surface.take_trigger().await? {
				self.handle_trigger(trigger).await?;
			}
		}
	}
}
