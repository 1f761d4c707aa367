mod impls;

use derive_more::From;

/* --------------------------------- Names ---------------------------------- */

/// A plain source-level name.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarName(pub String);

/// The opaque payload token of a primitive value. The machine carries it
/// around and compares it for equality, but never looks inside.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sentinel(pub String);

/* --------------------------------- Values --------------------------------- */

/// A small primitive lives entirely on the stack; a large one keeps a header
/// on the stack and spills its body to the heap.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum PrimValue {
    Small(Sentinel),
    Large(Sentinel),
}

/* ------------------------------ L-expressions ----------------------------- */

/// A place: a bare name, or a dependent of another place (`l.x`).
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum LExpr {
    Var(VarName),
    Proj(Box<LExpr>, VarName),
}

/* ------------------------------ R-expressions ----------------------------- */

/// How a bid source materializes into the target place.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Mater {
    Move,
    Copy,
    Refr,
}

/// A place read on the right-hand side, observed into the trace first when
/// synchronizing.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Target {
    Sync(LExpr),
    Plain(LExpr),
}

/// `x move`, `x copy`, `x refr`
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Bid {
    pub target: Target,
    pub mater: Mater,
}

/// `f x` shaped application of the abstraction bound at `target` to the bid
/// argument.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct App {
    pub target: Target,
    pub arg: Bid,
}

/// `\param. body; ret`
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Abstraction {
    pub param: VarName,
    pub body: Vec<Clause>,
    pub ret: Box<RExpr>,
}

/// An abstraction literal together with the bids that seed its dependents.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct CaptureExpr {
    pub captures: Vec<(VarName, Bid)>,
    pub abs: Abstraction,
}

#[derive(From, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Literal {
    Prim(PrimValue),
    Capture(CaptureExpr),
}

#[derive(From, Clone, Debug, Hash, PartialEq, Eq)]
pub enum RExpr {
    Bid(Bid),
    App(App),
    Lit(Literal),
}

/* --------------------------------- Clauses --------------------------------- */

/// `l := r`
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Assign {
    pub lhs: LExpr,
    pub rhs: RExpr,
}

/// Forces the current shallow value of a place into the trace.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Synchronize(pub LExpr);

/// Pops the current frame.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Return;

#[derive(From, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Clause {
    Assign(Assign),
    Sync(Synchronize),
    Ret(Return),
}
