//! cxhook core library: webhook envelope types, tag handlers, joke client,
//! configuration, and the HTTP server used by the CLI.

pub mod config;
pub mod error;
pub mod handlers;
pub mod init;
pub mod jokes;
pub mod webhook;
