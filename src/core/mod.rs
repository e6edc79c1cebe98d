//! Process-wide state shared by the HTTP loop and the actors.

pub mod state;
pub mod stop;

pub use stop::{StopHandle, StopSignal};
pub use state::{
    is_ready, is_shutdown, register_server, set_ready, setup_shutdown_handler,
};
