//! # Runtime Module
//!
//! Runtime components for the service startup: the bootstrap pipeline and
//! process initialization.

pub mod bootstrap;
pub mod initialization;

pub use bootstrap::*;
pub use initialization::*;
