//! Actor System for Live Updates
//!
//! ```text
//! FsActor --> ContentStore --> Broadcaster --> Sessions
//! (watch)       (rescan)        (fan-out)     (browsers)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Updates passed from the watcher to the broadcaster
//! - `fs` - Docroot watcher with tick-and-quiet coalescing
//! - `ws` - Session registry, fan-out and heartbeat
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod ws;

pub use coordinator::Coordinator;
