use serde::{Deserialize, Serialize};

pub mod config;
pub mod controller;
pub mod discovery;
pub mod observer;
pub mod surface;

/// The injected navigation controls, a closed set of roles.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Trigger {
	/// Proxy a single click to the form's own submit control
	#[serde(rename = "advance-one")]
	NextOnce,
	/// Auto-advance until the progress indicator reaches the configured percentage
	#[serde(rename = "advance-to-threshold")]
	ToThreshold,
	/// Auto-advance until the submit control shows its terminal label
	#[serde(rename = "advance-to-end")]
	ToEnd,
}

impl Trigger {
	/// Stable role string, used as the button's data attribute in the injected surface
	pub fn role(&self) -> &'static str {
		match self {
			Trigger::NextOnce => "advance-one",
			Trigger::ToThreshold => "advance-to-threshold",
			Trigger::ToEnd => "advance-to-end",
		}
	}

	pub fn from_role(role: &str) -> Option<Self> {
		match role {
			"advance-one" => Some(Trigger::NextOnce),
			"advance-to-threshold" => Some(Trigger::ToThreshold),
			"advance-to-end" => Some(Trigger::ToEnd),
			_ => None,
		}
	}
}

/// What the submit control's live text means for the pager.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LabelKind {
	/// The label that means "clicking advances one page"
	Advance,
	/// The label the form shows on its final page
	Terminal,
	/// Anything else, including transient states the host may render mid-transition
	Unknown,
}

/// Maps the opaque external label text into [`LabelKind`].
///
/// The host page owns the submit control and mutates its text between ticks;
/// everything outside the two recognized labels is `Unknown` and the pager
/// halts rather than clicking into unrecognized UI state.
#[derive(Clone, Debug)]
pub struct LabelClassifier {
	advance: String,
	terminal: String,
}

impl LabelClassifier {
	pub fn new(advance: impl Into<String>, terminal: impl Into<String>) -> Self {
		Self {
			advance: advance.into(),
			terminal: terminal.into(),
		}
	}

	pub fn classify(&self, label: &str) -> LabelKind {
		let label = label.trim();
		if label == self.advance {
			LabelKind::Advance
		} else if label == self.terminal {
			LabelKind::Terminal
		} else {
			LabelKind::Unknown
		}
	}

	pub fn advance_label(&self) -> &str {
		&self.advance
	}

	pub fn terminal_label(&self) -> &str {
		&self.terminal
	}
}

impl Default for LabelClassifier {
	fn default() -> Self {
		Self::new("Next", "See results")
	}
}

/// Parse a percentage-formatted text ("80%") into its integer value.
///
/// Takes the leading digit run of the trimmed input, so "80% complete" is 80.
/// Malformed or empty text yields `None`: no numeric signal, never an error.
pub fn parse_percent(text: &str) -> Option<u32> {
	let digits: String = text.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
	digits.parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classifier_recognizes_both_labels() {
		let c = LabelClassifier::default();
		assert_eq!(c.classify("Next"), LabelKind::Advance);
		assert_eq!(c.classify("  Next \n"), LabelKind::Advance);
		assert_eq!(c.classify("See results"), LabelKind::Terminal);
	}

	#[test]
	fn classifier_unknown_branch() {
		let c = LabelClassifier::default();
		assert_eq!(c.classify("Error"), LabelKind::Unknown);
		assert_eq!(c.classify(""), LabelKind::Unknown);
		assert_eq!(c.classify("next"), LabelKind::Unknown);
	}

	#[test]
	fn classifier_custom_labels() {
		let c = LabelClassifier::new("Suivant", "Voir les résultats");
		assert_eq!(c.classify("Suivant"), LabelKind::Advance);
		assert_eq!(c.classify("Next"), LabelKind::Unknown);
	}

	#[test]
	fn parse_percent_variants() {
		assert_eq!(parse_percent("80%"), Some(80));
		assert_eq!(parse_percent(" 7 %"), Some(7));
		assert_eq!(parse_percent("100"), Some(100));
		assert_eq!(parse_percent("80% complete"), Some(80));
		assert_eq!(parse_percent("%80"), None);
		assert_eq!(parse_percent(""), None);
		assert_eq!(parse_percent("n/a"), None);
	}

	#[test]
	fn trigger_role_round_trip() {
		for t in [Trigger::NextOnce, Trigger::ToThreshold, Trigger::ToEnd] {
			assert_eq!(Trigger::from_role(t.role()), Some(t));
		}
		assert_eq!(Trigger::from_role("advance-backwards"), None);
	}

	#[test]
	fn trigger_serde_names_are_the_role_strings() {
		// The page slot is drained through serde, so the serde names and the
		// role strings written into the injection script must stay identical.
		for t in [Trigger::NextOnce, Trigger::ToThreshold, Trigger::ToEnd] {
			assert_eq!(serde_json::to_value(t).unwrap(), serde_json::Value::String(t.role().to_string()));
			assert_eq!(serde_json::from_value::<Trigger>(serde_json::Value::String(t.role().to_string())).unwrap(), t);
		}
		assert!(serde_json::from_value::<Trigger>(serde_json::Value::String("advance-backwards".to_string())).is_err());
	}
}
