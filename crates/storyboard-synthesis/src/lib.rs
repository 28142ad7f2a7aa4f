//! Storyboard — Prompt Synthesis context.
//!
//! Responsible for asking the completion provider to split a story into a
//! shared background and eight illustration prompts, and for normalizing
//! whatever comes back into a well-formed panel set.

pub mod application;
pub mod domain;
