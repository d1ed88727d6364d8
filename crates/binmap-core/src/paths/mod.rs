//! Path utilities for the binmap output directory.
//!
//! - `OutputLayout` names every artifact inside the output directory
//! - `verify_output_dir` is the fatal pre-flight check run before any write
//! - `normalize_path` gives manifests a stable absolute identity

mod atomic;
mod ensure;
mod error;
mod layout;
mod normalize;

pub use atomic::write_atomic;
pub use ensure::{verify_output_dir, verify_writable};
pub use error::PathError;
pub use layout::OutputLayout;
pub use normalize::{expand_user_path, normalize_path};
