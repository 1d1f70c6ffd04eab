//! Storage module for persisting harvested items
//!
//! This module handles everything that touches the file system:
//! - Creating one storage location per discovered category
//! - Converting item markup into artifacts through an external program

mod converter;
mod folders;
mod traits;

pub use converter::CommandConverter;
pub use folders::{ensure_category_storage, MaterializeReport};
pub use traits::Persister;
