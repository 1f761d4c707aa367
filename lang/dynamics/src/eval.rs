use crate::{alloc::AddrAlloc, err::*, event::*, inspect::decompose, store::Delta, syntax::*};
use materia_utils::prelude::*;

/* --------------------------------- Stepping -------------------------------- */

pub enum Step<T, Out> {
    Done(Out),
    Step(T),
}

pub trait Eval: Sized {
    type Out;
    fn step(self, rt: &mut Runtime) -> Result<Step<Self, Self::Out>>;
    fn eval(self, rt: &mut Runtime) -> Result<Self::Out> {
        let mut res = self;
        loop {
            match res.step(rt)? {
                | Step::Done(out) => break Ok(out),
                | Step::Step(next) => res = next,
            }
        }
    }
}

impl Eval for Program {
    type Out = ();

    fn step(mut self, rt: &mut Runtime) -> Result<Step<Self, Self::Out>> {
        let Some(clause) = self.pop_front() else {
            return Ok(Step::Done(()));
        };
        let rest = rt.step_clause(clause, self)?;
        Ok(Step::Step(rest))
    }
}

/* --------------------------------- Runtime --------------------------------- */

impl Runtime {
    pub fn new() -> Self {
        Runtime { store: Store::default(), alloc: AddrAlloc::new(), trace: Vec::new() }
    }

    /// Apply a step's delta and record the clause with its tag and the
    /// store as patched.
    fn commit(&mut self, clause: Clause, delta: Delta, tag: ClauseTag) {
        self.store = self.store.patched(delta);
        self.trace.push(ClauseEvent { clause, store: self.store.clone(), tag }.into());
    }

    /// Reduce one clause, rewriting the remaining program.
    fn step_clause(&mut self, clause: Clause, rest: Program) -> Result<Program> {
        match clause {
            | Clause::Assign(assign) => self.step_assign(assign, rest),
            | Clause::Sync(Synchronize(lexpr)) => {
                let share = self.store.resolve_present(&lexpr)?;
                let value = self.store.inspect(share.addr())?;
                self.trace.push(SyncEvent { lexpr, value }.into());
                Ok(rest)
            }
            | Clause::Ret(Return) => {
                let Some((frame, env)) = self.store.env.popped() else {
                    return Err(MachineError::StackReturn);
                };
                let mut discharges = Vec::new();
                for (_name, share) in frame.locals.iter() {
                    if let Some(Share::Owned(addr)) = share {
                        discharges.push(self.store.deallocate(*addr)?);
                    }
                }
                let delta = Delta::with_env(env).extend(discharges);
                self.commit(Return.into(), delta, ClauseTag::Return);
                Ok(rest)
            }
        }
    }

    fn step_assign(&mut self, assign: Assign, mut rest: Program) -> Result<Program> {
        let Assign { lhs, rhs } = assign;
        match rhs {
            // a synchronizing bid observes its source first
            | RExpr::Bid(Bid { target: Target::Sync(src), mater }) => {
                let bid = Bid { target: Target::Plain(src.clone()), mater };
                rest.push_front(Assign { lhs, rhs: bid.into() }.into());
                rest.push_front(Synchronize(src).into());
                Ok(rest)
            }
            // a synchronizing application observes its abstraction first
            | RExpr::App(App { target: Target::Sync(target), arg }) => {
                let app = App { target: Target::Plain(target.clone()), arg };
                rest.push_front(Assign { lhs, rhs: app.into() }.into());
                rest.push_front(Synchronize(target).into());
                Ok(rest)
            }
            | rhs => {
                let clause = Clause::from(Assign { lhs: lhs.clone(), rhs: rhs.clone() });
                match self.store.resolve(&lhs) {
                    // declaration on demand; the assignment is retried
                    | Err(MachineError::NameResolution(_)) => {
                        let delta = self.store.declare(&lhs)?;
                        self.commit(clause.clone(), delta, ClauseTag::Declaration);
                        rest.push_front(clause);
                        Ok(rest)
                    }
                    | Err(err) => Err(err),
                    | Ok(None) => match rhs {
                        // reference assignment borrows the source identity
                        | RExpr::Bid(Bid { target: Target::Plain(src), mater: Mater::Refr }) => {
                            let share = self.store.resolve_present(&src)?;
                            let delta =
                                self.store.allocate(&lhs, Share::Borrowed(share.addr()))?;
                            self.commit(clause, delta, ClauseTag::ReferenceAssignment);
                            Ok(rest)
                        }
                        // every other form allocates first, then retries
                        | _ => {
                            let delta = self.allocate_new(&lhs)?;
                            self.commit(clause.clone(), delta, ClauseTag::Allocation);
                            rest.push_front(clause);
                            Ok(rest)
                        }
                    },
                    | Ok(Some(share)) => {
                        let lid = share.addr();
                        match rhs {
                            | RExpr::Bid(Bid {
                                target: Target::Plain(src),
                                mater: Mater::Move,
                            }) => self.step_move(lhs, src, lid, rest),
                            | RExpr::Bid(Bid {
                                target: Target::Plain(src),
                                mater: Mater::Copy,
                            }) => self.step_copy(lhs, src, lid, rest),
                            | RExpr::Bid(Bid { target: Target::Plain(_), mater: Mater::Refr }) => {
                                Err(MachineError::Generic(format!(
                                    "cannot re-point `{}`: it already holds an identity",
                                    lhs
                                )))
                            }
                            | RExpr::Lit(lit) => self.step_literal(clause, lhs, lid, lit, rest),
                            | RExpr::App(App { target: Target::Plain(target), arg }) => {
                                self.step_apply(clause, lhs, target, arg, rest)
                            }
                            | RExpr::Bid(Bid { target: Target::Sync(_), .. })
                            | RExpr::App(App { target: Target::Sync(_), .. }) => {
                                Err(MachineError::Generic(format!(
                                    "synchronizing target survived desugaring"
                                )))
                            }
                        }
                    }
                }
            }
        }
    }

    /// The target identity takes over the source's heap cell and a relocated
    /// copy of its stack cell; the source keeps its addresses but loses its
    /// heap claim and stack cell. Dependents rematerialize through generated
    /// clauses, observed at the moment they move.
    fn step_move(
        &mut self, lhs: LExpr, src: LExpr, lid: IdentAddr, rest: Program,
    ) -> Result<Program> {
        let rid = self.store.resolve_present(&src)?.addr();
        let l_ident = self.store.ident(lid)?.clone();
        let r_ident = self.store.ident(rid)?.clone();
        let new_stack: Option<StackAddr> = self.alloc.fresh_like(r_ident.stack.as_ref());

        let mut delta = Delta::default();
        if let (Some(from), Some(to)) = (r_ident.stack, new_stack) {
            delta.stack.set(to, self.store.stack_cell(from)?.clone());
            delta.stack.unset(from);
        }
        if let Some(old) = l_ident.stack {
            delta.stack.unset(old);
        }
        // on a self-move the old heap cell is the one being taken over
        if let Some(old) = l_ident.heap {
            if l_ident.heap != r_ident.heap {
                delta.heap.unset(old);
            }
        }
        let mut r_after = r_ident.clone();
        r_after.heap = None;
        delta.idents.set(rid, r_after);
        let mut l_after = l_ident;
        l_after.stack = new_stack;
        l_after.heap = r_ident.heap;
        delta.idents.set(lid, l_after);
        self.store = self.store.patched(delta);

        Ok(Self::with_dependent_bids(lhs, src, &r_ident, Mater::Move, rest))
    }

    /// Like a move, but both cells are duplicated at fresh addresses and the
    /// source keeps everything it had.
    fn step_copy(
        &mut self, lhs: LExpr, src: LExpr, lid: IdentAddr, rest: Program,
    ) -> Result<Program> {
        let rid = self.store.resolve_present(&src)?.addr();
        let l_ident = self.store.ident(lid)?.clone();
        let r_ident = self.store.ident(rid)?.clone();
        let new_stack: Option<StackAddr> = self.alloc.fresh_like(r_ident.stack.as_ref());
        let new_heap: Option<HeapAddr> = self.alloc.fresh_like(r_ident.heap.as_ref());

        let mut delta = Delta::default();
        if let (Some(from), Some(to)) = (r_ident.stack, new_stack) {
            delta.stack.set(to, self.store.stack_cell(from)?.clone());
        }
        if let (Some(from), Some(to)) = (r_ident.heap, new_heap) {
            delta.heap.set(to, self.store.heap_cell(from)?.clone());
        }
        if let Some(old) = l_ident.stack {
            delta.stack.unset(old);
        }
        if let Some(old) = l_ident.heap {
            delta.heap.unset(old);
        }
        let mut l_after = l_ident;
        l_after.stack = new_stack;
        l_after.heap = new_heap;
        delta.idents.set(lid, l_after);
        self.store = self.store.patched(delta);

        Ok(Self::with_dependent_bids(lhs, src, &r_ident, Mater::Copy, rest))
    }

    /// Prepend one assignment per dependent of the source, in name order,
    /// bidding `src.d` into `lhs.d` with the same materialization. The
    /// synchronizing target makes each dependent observable as it lands.
    fn with_dependent_bids(
        lhs: LExpr, src: LExpr, r_ident: &Ident, mater: Mater, mut rest: Program,
    ) -> Program {
        let names: Vec<_> = r_ident.dependents.keys().cloned().collect();
        for name in names.into_iter().rev() {
            let bid = Bid {
                target: Target::Sync(src.clone().proj(name.clone())),
                mater,
            };
            rest.push_front(
                Assign { lhs: lhs.clone().proj(name), rhs: bid.into() }.into(),
            );
        }
        rest
    }

    /// Materialize a literal into the target identity, retiring whatever
    /// cells it held before.
    fn step_literal(
        &mut self, clause: Clause, lhs: LExpr, lid: IdentAddr, lit: Literal,
        mut rest: Program,
    ) -> Result<Program> {
        let (tag, value, captures) = match lit {
            | Literal::Prim(prim @ PrimValue::Small(_)) => {
                (ClauseTag::SmallLiteralAssignment, ShallowValue::Prim(prim), vec![])
            }
            | Literal::Prim(prim @ PrimValue::Large(_)) => {
                (ClauseTag::LargeLiteralAssignment, ShallowValue::Prim(prim), vec![])
            }
            | Literal::Capture(CaptureExpr { captures, abs }) => {
                (ClauseTag::AbstractionLiteralAssignment, ShallowValue::Abs(abs), captures)
            }
        };
        let (stack_value, heap_value) = decompose(value);
        let l_ident = self.store.ident(lid)?.clone();
        let new_stack: Option<StackAddr> = self.alloc.fresh_like(stack_value.as_ref());
        let new_heap: Option<HeapAddr> = self.alloc.fresh_like(heap_value.as_ref());

        let mut delta = Delta::default();
        if let (Some(value), Some(addr)) = (stack_value, new_stack) {
            delta.stack.set(addr, value);
        }
        if let (Some(value), Some(addr)) = (heap_value, new_heap) {
            delta.heap.set(addr, value);
        }
        if let Some(old) = l_ident.stack {
            delta.stack.unset(old);
        }
        if let Some(old) = l_ident.heap {
            delta.heap.unset(old);
        }
        let mut l_after = l_ident;
        l_after.stack = new_stack;
        l_after.heap = new_heap;
        delta.idents.set(lid, l_after);

        // captures materialize as dependents, in written order
        for (name, bid) in captures.into_iter().rev() {
            rest.push_front(
                Assign { lhs: lhs.clone().proj(name), rhs: bid.into() }.into(),
            );
        }
        self.commit(clause, delta, tag);
        Ok(rest)
    }

    /// Expand an application: bind the formal to the argument bid, run the
    /// body, assign the return expression to the caller's place, and pop.
    /// The expansion runs inside a fresh frame whose closure is the
    /// abstraction identity's dependents.
    fn step_apply(
        &mut self, clause: Clause, lhs: LExpr, target: LExpr, arg: Bid, mut rest: Program,
    ) -> Result<Program> {
        let fid = self.store.resolve_present(&target)?.addr();
        let ShallowValue::Abs(Abstraction { param, body, ret }) = self.store.inspect(fid)?
        else {
            return Err(MachineError::Generic(format!(
                "applying `{}`, which is not an abstraction",
                target
            )));
        };
        let closure = self.store.ident(fid)?.dependents.clone();

        rest.push_front(Return.into());
        rest.push_front(Assign { lhs, rhs: *ret }.into());
        for body_clause in body.into_iter().rev() {
            rest.push_front(body_clause);
        }
        rest.push_front(
            Assign { lhs: LExpr::Var(param), rhs: RExpr::Bid(arg) }.into(),
        );

        let frame = Frame { locals: Namespace::default(), closure };
        let delta = Delta::with_env(self.store.env.pushed(frame));
        self.commit(clause, delta, ClauseTag::Application);
        Ok(rest)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/* --------------------------------- Drivers --------------------------------- */

impl Runtime {
    /// Iterate the stepper until the program is exhausted. The final store
    /// and the trace stay on the machine.
    pub fn run_to_end(&mut self, program: Program) -> Result<()> {
        program.eval(self)
    }

    /// Iterate until the program is exhausted or the head clause is a
    /// synchronization; the synchronization is left unconsumed so callers
    /// may inspect the configuration and resume.
    pub fn run_to_sync(&mut self, program: Program) -> Result<ProgKont> {
        let mut program = program;
        loop {
            match program.front() {
                | None => return Ok(ProgKont::Done),
                | Some(Clause::Sync(_)) => return Ok(ProgKont::Paused(program)),
                | Some(_) => {}
            }
            match program.step(self)? {
                | Step::Done(()) => return Ok(ProgKont::Done),
                | Step::Step(next) => program = next,
            }
        }
    }
}
