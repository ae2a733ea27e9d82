pub mod error;
pub use error::{AnalyticsError, Result};

pub(crate) mod moving_average;
pub use moving_average::DecayingWindow;

pub(crate) mod sleep;
pub use sleep::{SleepSummary, SleepTrendAnalyzer};

pub(crate) mod trend;
pub use trend::TrendAggregator;

pub(crate) mod statistics;
pub use statistics::StatisticsAggregator;

pub mod helpers;
