//! Network domain models: wire message, connection target, status and the
//! transport event vocabulary.

mod address;
mod endpoint;
mod message;
mod status;
mod transport;

pub use address::{ServerAddress, DEFAULT_PORT};
pub use endpoint::EndpointTag;
pub use message::{MessageKind, SyncMessage};
pub use status::ConnectionStatus;
pub use transport::{TransportCommand, TransportEvent};
