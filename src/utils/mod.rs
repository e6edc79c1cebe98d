//! Shared helpers for subprocesses, HTML text, paths and MIME types.

pub mod exec;
pub mod html;
pub mod mime;
pub mod path;
