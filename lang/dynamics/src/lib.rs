#![doc = include_str!("README.md")]
#![allow(clippy::style)]
#![allow(clippy::useless_format)]

/// Runtime state and dynamic values for the machine.
pub mod syntax;
pub use syntax::{ProgKont, Runtime};
/// The store and its delta patching.
pub mod store;
pub use store::Delta;
/// Name resolution over frames and globals.
pub mod resolve;
/// Address minting, declaration, allocation, and deallocation.
pub mod alloc;
pub use alloc::AddrAlloc;
/// Identity inspection and value (de)composition.
pub mod inspect;
pub use inspect::{decompose, recompose};
/// Structured trace events.
pub mod event;
pub use event::*;
/// Error kinds for the machine's fallible operations.
pub mod err;
pub use err::*;
/// Small-step clause reduction and the drivers that iterate it.
pub mod eval;
pub use eval::*;
/// Formatting for dynamic syntax, values, and events.
pub mod fmt;
