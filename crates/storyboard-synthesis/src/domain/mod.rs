//! Domain layer for the Prompt Synthesis context.

pub mod commands;
pub mod instructions;
pub mod normalizer;
