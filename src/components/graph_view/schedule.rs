use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Integral floats at or above this print in exponent form, so they keep
/// their `Display` text instead of being widened to digits.
const MAX_PLAIN_INTEGRAL: f64 = 1e21;

/// One step of an execution schedule. `op_magic` names the node id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub op_code: Option<String>,
	pub op_magic: Number,
}

impl ScheduleEntry {
	/// Node ids are decimal strings, so `10000.0` names node `10000`.
	pub fn node_id(&self) -> String {
		if self.op_magic.is_f64() {
			if let Some(value) = self.op_magic.as_f64() {
				if value.fract() == 0.0 && value.abs() < MAX_PLAIN_INTEGRAL {
					return format!("{value:.0}");
				}
			}
		}
		self.op_magic.to_string()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDocument {
	pub schedule: Vec<ScheduleEntry>,
}

impl ScheduleDocument {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

/// Ids of every entry up to and including `index`.
pub fn scheduled_ids(schedule: &[ScheduleEntry], index: usize) -> HashSet<String> {
	schedule
		.iter()
		.take(index.saturating_add(1))
		.map(ScheduleEntry::node_id)
		.collect()
}
