//! Status sink adapters.

mod channel;
mod fanout;
mod logging;

pub use channel::{ChannelStatusSink, StatusUpdate};
pub use fanout::FanoutStatusSink;
pub use logging::TracingStatusSink;
