//! Storyboard Core — shared panel model and abstractions.
//!
//! This crate defines the panel model, the flat block grammar used to edit
//! it, the error taxonomy, and the provider traits that the synthesis and
//! illustration contexts depend on. It contains no infrastructure code.

pub mod block;
pub mod command;
pub mod error;
pub mod panel;
pub mod provider;
