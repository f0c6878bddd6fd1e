use std::time::Duration;

pub const POLL_TIMEOUT: Duration = Duration::from_millis(50);
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(500);
pub const LONG_TIMEOUT: Duration = Duration::from_secs(5);
pub const ITEMS_LOW: usize = 10;
pub const ITEMS_MEDIUM: usize = 100;
pub const ITEMS_HIGH: usize = 500;
