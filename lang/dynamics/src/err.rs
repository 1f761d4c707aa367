use crate::syntax::*;
use thiserror::Error;

/// Errors surfaced by the machine. Every step is a fallible transformation;
/// none of these are recovered from, and the drivers halt on the first one,
/// leaving the last good store and the accumulated trace behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MachineError {
    /// The name is unbound in every enclosing scope.
    #[error("unresolved name `{0}`")]
    NameResolution(LExpr),
    /// The place is declared but holds no identity where one was required.
    #[error("`{0}` has no allocated identity")]
    Allocation(LExpr),
    /// An identity address escaped the identity table.
    #[error("identity address {0:?} is not in the identity table")]
    IdentResolution(IdentAddr),
    /// An identity points at a stack cell that memory does not hold.
    #[error("stack address {0:?} has no cell in memory")]
    StackResolution(StackAddr),
    /// An identity points at a heap cell that memory does not hold.
    #[error("heap address {0:?} has no cell in memory")]
    HeapResolution(HeapAddr),
    /// The stack/heap cell pair does not assemble into a value.
    #[error("cannot recompose stack {0:?} with heap {1:?}")]
    Recomposition(Option<StackValue>, Option<HeapValue>),
    /// A return clause ran with no frame to pop.
    #[error("return with no frame to pop")]
    StackReturn,
    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, MachineError>;
