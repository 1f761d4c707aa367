use crate::{err::*, syntax::*};
use std::collections::HashSet;

/* ------------------------------ Decomposition ------------------------------ */

/// Split a shallow value across the stack/heap boundary. Only large
/// primitives produce a heap half.
pub fn decompose(value: ShallowValue) -> (Option<StackValue>, Option<HeapValue>) {
    match value {
        | ShallowValue::Prim(PrimValue::Small(token)) => {
            (Some(StackValue::Small(token)), None)
        }
        | ShallowValue::Prim(PrimValue::Large(token)) => {
            (Some(StackValue::Large(token.clone())), Some(HeapValue::Large(token)))
        }
        | ShallowValue::Abs(abs) => (Some(StackValue::Abs(abs)), None),
    }
}

/// Reassemble a stack/heap cell pair. A large header must meet a heap body
/// carrying the same sentinel; every other pairing is inconsistent.
pub fn recompose(
    stack: Option<StackValue>, heap: Option<HeapValue>,
) -> Result<ShallowValue> {
    match (stack, heap) {
        | (Some(StackValue::Small(token)), None) => Ok(PrimValue::Small(token).into()),
        | (Some(StackValue::Large(token)), Some(HeapValue::Large(body)))
            if token == body =>
        {
            Ok(PrimValue::Large(token).into())
        }
        | (Some(StackValue::Abs(abs)), None) => Ok(ShallowValue::Abs(abs)),
        | (stack, heap) => Err(MachineError::Recomposition(stack, heap)),
    }
}

/* -------------------------------- Inspection ------------------------------- */

impl Store {
    /// Reconstruct the shallow value behind an identity: read its cells
    /// (an absent address reads as an absent value) and recompose.
    pub fn inspect(&self, addr: IdentAddr) -> Result<ShallowValue> {
        let ident = self.ident(addr)?;
        let stack = match ident.stack {
            | Some(addr) => Some(self.stack_cell(addr)?.clone()),
            | None => None,
        };
        let heap = match ident.heap {
            | Some(addr) => Some(self.heap_cell(addr)?.clone()),
            | None => None,
        };
        recompose(stack, heap)
    }

    /// Recursive inspection over dependents, for consumers that expand a
    /// synchronization into deep structure. Unallocated dependents are
    /// skipped; re-entering an identity cuts the recursion.
    pub fn inspect_deep(&self, addr: IdentAddr) -> Result<DeepValue> {
        let mut visited = HashSet::new();
        self.inspect_deep_into(addr, &mut visited)
    }

    fn inspect_deep_into(
        &self, addr: IdentAddr, visited: &mut HashSet<IdentAddr>,
    ) -> Result<DeepValue> {
        let shallow = self.inspect(addr)?;
        let mut dependents = im::OrdMap::new();
        if visited.insert(addr) {
            for (name, share) in self.ident(addr)?.dependents.iter() {
                let Some(share) = share else { continue };
                let deep = self.inspect_deep_into(share.addr(), visited)?;
                dependents.insert(name.clone(), deep);
            }
        }
        Ok(DeepValue { shallow, dependents })
    }
}
