//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the estimation engine and the
//! outside world. Following hexagonal architecture, these traits are owned by
//! the domain and implemented by adapters: the game rules engine implements
//! [`Environment`], progress reporters implement [`Observer`].

pub mod environment;
pub mod observer;

pub use environment::Environment;
pub use observer::Observer;
