//! FileSystem abstraction so scanning and eligibility checks can run against a
//! mock package tree

mod mock;
mod real;
mod r#trait;

pub use mock::MockFileSystem;
pub use r#trait::{DirEntry, FileSystem, FileType};
pub use real::RealFileSystem;
