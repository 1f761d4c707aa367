use crate::{err::*, store::Delta, syntax::*};
use materia_utils::prelude::*;
use std::collections::HashSet;

/* -------------------------------- Addresses -------------------------------- */

/// Mints every address in a run off one strictly increasing counter, so the
/// identity, stack, and heap tables never share a number.
#[derive(Debug, Default)]
pub struct AddrAlloc(IndexAlloc);

impl AddrAlloc {
    pub fn new() -> Self {
        AddrAlloc(IndexAlloc::new())
    }
    pub fn fresh<A: IndexLike>(&mut self) -> A {
        A::new(self.0.mint())
    }
    /// Fresh only where the probed slot holds an address; a slot that never
    /// had one stays empty through moves and copies.
    pub fn fresh_like<A: IndexLike, T>(&mut self, probe: Option<&T>) -> Option<A> {
        probe.map(|_| self.fresh())
    }
}

/* ------------------------------- Declaration ------------------------------- */

impl Store {
    /// Bind the place as declared-unallocated: unqualified names in the top
    /// frame's locals (globals when no frame is live), qualified names in
    /// the prefix identity's dependents.
    pub fn declare(&self, lexpr: &LExpr) -> Result<Delta> {
        match lexpr {
            | LExpr::Var(name) => Ok(Delta::with_env(self.env.declared(name.clone()))),
            | LExpr::Proj(prefix, name) => {
                let addr = self.resolve_present(prefix)?.addr();
                let mut ident = self.ident(addr)?.clone();
                ident.dependents.insert(name.clone(), None);
                let mut delta = Delta::default();
                delta.idents.set(addr, ident);
                Ok(delta)
            }
        }
    }

    /// Write a share into the declared-unallocated slot for the place.
    pub fn allocate(&self, lexpr: &LExpr, share: Share) -> Result<Delta> {
        match lexpr {
            | LExpr::Var(name) => Ok(Delta::with_env(self.env.allocated(name, share)?)),
            | LExpr::Proj(prefix, name) => {
                let addr = self.resolve_present(prefix)?.addr();
                let mut ident = self.ident(addr)?.clone();
                match ident.dependents.get(name) {
                    | None => Err(MachineError::NameResolution(lexpr.clone())),
                    | Some(Some(_)) => Err(already_allocated(name)),
                    | Some(None) => {
                        ident.dependents.insert(name.clone(), Some(share));
                        let mut delta = Delta::default();
                        delta.idents.set(addr, ident);
                        Ok(delta)
                    }
                }
            }
        }
    }
}

impl Env {
    /// The shadowing-aware slot walk. A present top-frame local is shadowed
    /// by re-entry: the share lands in a fresh frame pushed on top, leaving
    /// the outer identity intact. Otherwise the walk bubbles down to the
    /// first frame (then globals) that declared the name and fills its
    /// still-absent slot.
    pub(crate) fn allocated(&self, name: &VarName, share: Share) -> Result<Env> {
        if let Some(top) = self.frames.back() {
            if let Some(Some(_)) = top.locals.get(name) {
                let frame = Frame {
                    locals: Namespace::singleton(name.clone(), Some(share)),
                    closure: Namespace::default(),
                };
                return Ok(self.pushed(frame));
            }
        }
        let mut env = self.clone();
        for idx in (0..env.frames.len()).rev() {
            let Some(frame) = env.frames.get_mut(idx) else { continue };
            if let Some(slot) = frame.locals.get(name) {
                match slot {
                    | None => {
                        frame.locals.insert(name.clone(), Some(share));
                        return Ok(env);
                    }
                    | Some(_) => return Err(already_allocated(name)),
                }
            }
            if let Some(slot) = frame.closure.get(name) {
                match slot {
                    | None => {
                        frame.closure.insert(name.clone(), Some(share));
                        return Ok(env);
                    }
                    | Some(_) => return Err(already_allocated(name)),
                }
            }
        }
        match env.globals.get(name) {
            | Some(None) => {
                env.globals.insert(name.clone(), Some(share));
                Ok(env)
            }
            | Some(Some(_)) => Err(already_allocated(name)),
            | None => Err(MachineError::NameResolution(LExpr::Var(name.clone()))),
        }
    }
}

fn already_allocated(name: &VarName) -> MachineError {
    MachineError::Generic(format!("allocating for already allocated name `{}`", name))
}

impl Runtime {
    /// Mint a fresh identity address, allocate the place as its owner, and
    /// insert a bare identity record.
    pub fn allocate_new(&mut self, lexpr: &LExpr) -> Result<Delta> {
        let addr: IdentAddr = self.alloc.fresh();
        let mut delta = self.store.allocate(lexpr, Share::Owned(addr))?;
        delta.idents.set(addr, Ident::default());
        Ok(delta)
    }
}

/* ------------------------------ Deallocation ------------------------------- */

impl Store {
    /// Remove the identity, its cells, and transitively every owned
    /// dependent. Borrowed dependents are not followed, and a visited set
    /// cuts dependency cycles.
    pub fn deallocate(&self, addr: IdentAddr) -> Result<Delta> {
        let mut delta = Delta::default();
        let mut visited = HashSet::new();
        self.deallocate_into(addr, &mut visited, &mut delta)?;
        Ok(delta)
    }

    fn deallocate_into(
        &self, addr: IdentAddr, visited: &mut HashSet<IdentAddr>, delta: &mut Delta,
    ) -> Result<()> {
        if !visited.insert(addr) {
            return Ok(());
        }
        let ident = self.ident(addr)?;
        for (_name, share) in ident.dependents.iter() {
            if let Some(Share::Owned(dep)) = share {
                self.deallocate_into(*dep, visited, delta)?;
            }
        }
        delta.idents.unset(addr);
        if let Some(stack) = ident.stack {
            delta.stack.unset(stack);
        }
        if let Some(heap) = ident.heap {
            delta.heap.unset(heap);
        }
        Ok(())
    }
}
