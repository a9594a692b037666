//! Builder API for propdoc
//!
//! This module provides the orchestration entry point that wires package
//! files into the extraction engine and writes generated artifacts back.

mod package_builder;

pub use package_builder::{BuildOutput, PackageBuilder, Task};
