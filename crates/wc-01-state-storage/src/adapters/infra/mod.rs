mod time;

pub use time::{MockTimeSource, SystemTimeSource};
