use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::events::TypeInfo;

/// Calendar period used to bucket trend data.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum GroupBy {
    Day,
    Week,
    Month,
}

impl GroupBy {
    /// `strftime` pattern producing the period label of a local timestamp.
    pub fn label_format(self) -> &'static str {
        match self {
            GroupBy::Day => "%Y-%m-%d",
            // Monday based week of the year
            GroupBy::Week => "%Y-%W-1",
            GroupBy::Month => "%Y-%m-01",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub time_label: String,
    pub duration_hours: f64,
}

/// Dense per-type series, one point per period of the queried range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    #[serde(rename = "type")]
    pub type_info: TypeInfo,
    pub points: Vec<TrendPoint>,
}
