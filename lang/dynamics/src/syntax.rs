pub use materia_syntax::*;

use crate::{alloc::AddrAlloc, event::Event};
use derive_more::{Deref, DerefMut, From, Into};
use materia_utils::arena::new_key_type;

/* -------------------------------- Addresses -------------------------------- */

new_key_type! {
    /// Names an identity in the identity table.
    pub struct IdentAddr;
    /// Keys a stack cell in split memory.
    pub struct StackAddr;
    /// Keys a heap cell in split memory.
    pub struct HeapAddr;
}

/* ---------------------------------- Values --------------------------------- */

/// A value as reconstructed from an identity's cells.
#[derive(From, Clone, Debug, PartialEq, Eq)]
pub enum ShallowValue {
    Prim(PrimValue),
    Abs(Abstraction),
}

/// A shallow value together with the values of its dependents, for trace
/// consumers that expand synchronizations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeepValue {
    pub shallow: ShallowValue,
    pub dependents: im::OrdMap<VarName, DeepValue>,
}

/// What a stack cell holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackValue {
    Small(Sentinel),
    Large(Sentinel),
    Abs(Abstraction),
}

/// What a heap cell holds. Only large primitives spill a body to the heap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeapValue {
    Large(Sentinel),
}

/* ---------------------------------- Shares --------------------------------- */

/// A namespace entry's claim on an identity. Only ownership cascades on
/// deallocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Share {
    Owned(IdentAddr),
    Borrowed(IdentAddr),
}

/// Names bound to optionally-allocated shares. A name bound to `None` is
/// declared but not yet materialized, which is distinct from unbound.
#[derive(Clone, Debug, Default, From, Into, Deref, DerefMut, PartialEq, Eq)]
pub struct Namespace(pub im::OrdMap<VarName, Option<Share>>);

/* ------------------------------- Environment ------------------------------- */

/// The unit pushed per application and popped on return.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Declared or allocated within this frame.
    pub locals: Namespace,
    /// The capture view inherited from the applied abstraction.
    pub closure: Namespace,
}

/// Call frames over a global namespace; the most recent frame is last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Env {
    pub frames: im::Vector<Frame>,
    pub globals: Namespace,
}

/* --------------------------------- Identity -------------------------------- */

/// An identity record. Bare when both addresses are empty;
/// primitive-bearing once materialization hands it cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ident {
    pub dependents: Namespace,
    pub stack: Option<StackAddr>,
    pub heap: Option<HeapAddr>,
}

/* ---------------------------------- Memory --------------------------------- */

/// Split memory. The two tables never share an address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    pub stack: im::OrdMap<StackAddr, StackValue>,
    pub heap: im::OrdMap<HeapAddr, HeapValue>,
}

/* ---------------------------------- Store ---------------------------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Store {
    pub env: Env,
    pub idents: im::OrdMap<IdentAddr, Ident>,
    pub memory: Memory,
}

/* --------------------------------- Machine --------------------------------- */

/// The clause sequence under reduction. The stepper consumes from the
/// front and prepends generated clauses there.
#[derive(Clone, Debug, Default, From, Into, Deref, DerefMut, PartialEq, Eq)]
pub struct Program(pub im::Vector<Clause>);

/// Machine state threaded through every reduction step.
pub struct Runtime {
    pub store: Store,
    pub alloc: AddrAlloc,
    pub trace: Vec<Event>,
}

/// What a driver ran into.
#[derive(Clone, Debug)]
pub enum ProgKont {
    /// The program is exhausted.
    Done,
    /// The head clause is a synchronization, left unconsumed so the caller
    /// may inspect the configuration and resume.
    Paused(Program),
}
