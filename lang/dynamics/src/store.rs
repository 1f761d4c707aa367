use crate::{err::*, syntax::*};
use materia_utils::prelude::*;

/* ---------------------------------- Delta ---------------------------------- */

/// One reduction step's worth of store edits. Frame pushes and pops are
/// structural, so the environment component travels whole; the flat tables
/// are patched key by key with the three-valued discipline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Delta {
    pub env: Option<Env>,
    pub idents: Patch<IdentAddr, Ident>,
    pub stack: Patch<StackAddr, StackValue>,
    pub heap: Patch<HeapAddr, HeapValue>,
}

mod impls_delta {
    use super::*;
    use std::ops::Add;

    impl Delta {
        pub fn with_env(env: Env) -> Self {
            Delta { env: Some(env), ..Default::default() }
        }
        pub fn is_empty(&self) -> bool {
            self.env.is_none()
                && self.idents.is_empty()
                && self.stack.is_empty()
                && self.heap.is_empty()
        }
    }

    impl Add for Delta {
        type Output = Self;
        /// Later edits win.
        fn add(self, other: Self) -> Self {
            Delta {
                env: other.env.or(self.env),
                idents: self.idents + other.idents,
                stack: self.stack + other.stack,
                heap: self.heap + other.heap,
            }
        }
    }

    impl Monoid for Delta {}
}

/* ---------------------------------- Store ---------------------------------- */

impl Store {
    /// Fold a delta into the store.
    pub fn patched(&self, delta: Delta) -> Store {
        let Delta { env, idents, stack, heap } = delta;
        Store {
            env: env.unwrap_or_else(|| self.env.clone()),
            idents: idents.applied(self.idents.clone()),
            memory: Memory {
                stack: stack.applied(self.memory.stack.clone()),
                heap: heap.applied(self.memory.heap.clone()),
            },
        }
    }

    pub fn ident(&self, addr: IdentAddr) -> Result<&Ident> {
        self.idents.get(&addr).ok_or(MachineError::IdentResolution(addr))
    }
    pub fn stack_cell(&self, addr: StackAddr) -> Result<&StackValue> {
        self.memory.stack.get(&addr).ok_or(MachineError::StackResolution(addr))
    }
    pub fn heap_cell(&self, addr: HeapAddr) -> Result<&HeapValue> {
        self.memory.heap.get(&addr).ok_or(MachineError::HeapResolution(addr))
    }
}

/* ---------------------------------- Shares --------------------------------- */

impl Share {
    /// Share-strip: the identity address under either tag.
    pub fn addr(&self) -> IdentAddr {
        match self {
            | Share::Owned(addr) => *addr,
            | Share::Borrowed(addr) => *addr,
        }
    }
    pub fn is_owned(&self) -> bool {
        matches!(self, Share::Owned(_))
    }
}

/* ------------------------------- Environment ------------------------------- */

mod impls_env {
    use super::*;

    impl Env {
        pub fn pushed(&self, frame: Frame) -> Env {
            let mut env = self.clone();
            env.frames.push_back(frame);
            env
        }
        pub fn popped(&self) -> Option<(Frame, Env)> {
            let mut env = self.clone();
            let frame = env.frames.pop_back()?;
            Some((frame, env))
        }
        pub fn depth(&self) -> usize {
            self.frames.len()
        }
        /// Bind `name` as declared-unallocated in the top frame's locals,
        /// or in globals when no frame is live.
        pub fn declared(&self, name: VarName) -> Env {
            let mut env = self.clone();
            match env.frames.back_mut() {
                | Some(frame) => {
                    frame.locals.insert(name, None);
                }
                | None => {
                    env.globals.insert(name, None);
                }
            }
            env
        }
    }

    impl Namespace {
        pub fn singleton(name: VarName, share: Option<Share>) -> Namespace {
            Namespace(im::OrdMap::unit(name, share))
        }
    }
}
