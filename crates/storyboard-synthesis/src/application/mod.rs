//! Application layer for the Prompt Synthesis context.

pub mod command_handlers;
