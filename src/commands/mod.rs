//! Command implementations.
//!
//! - **modernize**: walk a directory and rewrite every C++ source in place

pub mod modernize;

pub use modernize::{configure_thread_pool, process_file, run, run_with_fs, ModernizeOptions, RunSummary};
