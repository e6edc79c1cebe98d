//! Live page updates over WebSocket.
//!
//! ```text
//! Browser --handshake /front--> acceptor --Session--> SessionRegistry
//! Browser <--page/refresh------ Broadcaster <--ContentUpdate-- FsActor
//! ```
//!
//! - `message` - JSON messages exchanged with the page script
//! - `server` - listener binding and the handshake/accept thread

pub mod message;
pub mod server;
