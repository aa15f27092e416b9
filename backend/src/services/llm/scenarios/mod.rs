//! Prompt scenarios built on top of the completion client

pub mod blessing;
