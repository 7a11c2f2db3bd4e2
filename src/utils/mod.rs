pub mod app_time;
pub mod maths_utils;
pub mod run_log;
pub mod serde_pairs;
pub mod time_utils;

pub use app_time::{Clock, ManualClock, SystemClock};
pub use run_log::RunLog;
pub use time_utils::TimeUtils;
