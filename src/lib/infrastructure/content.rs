//! Content loading implementations.

mod fs;
mod memory;

pub use fs::{ContentDirConfig, FsContentLoader};
pub use memory::MemoryContentLoader;
