//! Supervision of a local Docker compose backend.
//!
//! [`docker::Supervisor`] answers "is the daemon up, is the container
//! running, is it healthy" and drives compose start/stop/restart/pull/build.
//! Every call returns a plain status or result value; nothing is cached
//! between calls.

pub mod config;
pub mod docker;
pub mod logging;
