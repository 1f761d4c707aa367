use crate::{err::*, syntax::*};

impl Store {
    /// Walk the top frame's locals, then its closure, then the next frame
    /// down, and globals last. The first bound entry wins, whether or not a
    /// share has been allocated into it; only a name bound nowhere is an
    /// error. Qualified places chase the prefix first, which must land on an
    /// allocated identity.
    pub fn resolve(&self, lexpr: &LExpr) -> Result<Option<Share>> {
        match lexpr {
            | LExpr::Var(name) => {
                for frame in self.env.frames.iter().rev() {
                    if let Some(share) = frame.locals.get(name) {
                        return Ok(*share);
                    }
                    if let Some(share) = frame.closure.get(name) {
                        return Ok(*share);
                    }
                }
                match self.env.globals.get(name) {
                    | Some(share) => Ok(*share),
                    | None => Err(MachineError::NameResolution(lexpr.clone())),
                }
            }
            | LExpr::Proj(prefix, name) => {
                let share = self.resolve_present(prefix)?;
                let ident = self.ident(share.addr())?;
                match ident.dependents.get(name) {
                    | Some(share) => Ok(*share),
                    | None => Err(MachineError::NameResolution(lexpr.clone())),
                }
            }
        }
    }

    /// Resolution that must land on an allocated identity.
    pub fn resolve_present(&self, lexpr: &LExpr) -> Result<Share> {
        self.resolve(lexpr)?.ok_or_else(|| MachineError::Allocation(lexpr.clone()))
    }
}
