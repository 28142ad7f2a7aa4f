//! Domain layer for the Illustration context.

pub mod commands;
pub mod filename;
pub mod plan;
