#![allow(clippy::style)]
#![allow(clippy::useless_format)]

pub mod arena;
pub mod imc;
pub mod monoid;

pub mod prelude {
    /// Address minting.
    pub use crate::arena::{IndexAlloc, IndexLike};
    /// Data structures.
    pub use crate::{imc::Patch, monoid::Monoid};
}
