//! File save infrastructure module

mod fs;

pub use fs::FsFileSaveSink;
