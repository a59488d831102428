/// Events produced by a live transport connection.
///
/// A connection yields `Opened` first, any number of `Message`s, and ends with
/// either `Closed` or `Error`. Nothing follows the terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    /// One text frame.
    Message(String),
    /// The connection ended (peer close, local close, or stream end).
    Closed(String),
    /// The connection failed.
    Error(String),
}

/// Commands accepted by a live transport connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    /// Transmit one text frame.
    Send(String),
    /// Close the connection without draining.
    Close,
}
