use serde::{Deserialize, Serialize};

use super::de;

/// An equipment rack. Membership is computed by scanning `rack_id` on
/// servers and network devices; the rack itself holds no list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rack {
	pub id: String,
	#[serde(default, deserialize_with = "de::text")]
	pub name: String,
	#[serde(default, deserialize_with = "de::opt_text")]
	pub location: Option<String>,
}
