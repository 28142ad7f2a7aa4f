//! Storyboard — Illustration context.
//!
//! Responsible for resolving which prompt text, mode and reference image to
//! send for a given panel, chaining consecutive panels for consistency, and
//! naming the rendered output.

pub mod application;
pub mod domain;
