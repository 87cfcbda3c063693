//! Shared helpers for the relocation pipeline.

pub mod process;
pub mod tool_detection;
