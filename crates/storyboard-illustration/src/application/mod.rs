//! Application layer for the Illustration context.

pub mod command_handlers;
