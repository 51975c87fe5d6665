pub mod ids;
pub mod time;

pub use ids::new_id;
pub use self::time::{now_timestamp, ClockTime};
