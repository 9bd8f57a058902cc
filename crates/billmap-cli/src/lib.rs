//! Library components of the `billmap` command-line tool.

#![deny(unsafe_code)]

pub mod logging;
pub mod pipeline;
pub mod report;
pub mod settings;
