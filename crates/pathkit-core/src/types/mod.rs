//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for shared state and stop flags.

pub mod aliases;

pub use aliases::*;
