use crate::syntax::*;
use derive_more::From;

/// How a consumed clause was discharged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseTag {
    Declaration,
    Allocation,
    Application,
    ReferenceAssignment,
    SmallLiteralAssignment,
    LargeLiteralAssignment,
    AbstractionLiteralAssignment,
    Return,
}

impl std::fmt::Display for ClauseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            | ClauseTag::Declaration => "Declaration",
            | ClauseTag::Allocation => "Allocation",
            | ClauseTag::Application => "Application",
            | ClauseTag::ReferenceAssignment => "Assignment by Reference",
            | ClauseTag::SmallLiteralAssignment => "Small Literal Assignment",
            | ClauseTag::LargeLiteralAssignment => "Large Literal Assignment",
            | ClauseTag::AbstractionLiteralAssignment => "Abstraction Literal Assignment",
            | ClauseTag::Return => "Return",
        };
        write!(f, "{}", tag)
    }
}

/// A clause reduced, with the store as it stood after the step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClauseEvent {
    pub clause: Clause,
    pub store: Store,
    pub tag: ClauseTag,
}

/// A place observed into the trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncEvent {
    pub lexpr: LExpr,
    pub value: ShallowValue,
}

/// The trace is append-only; its order is reduction order.
#[derive(From, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Clause(ClauseEvent),
    Sync(SyncEvent),
}

impl Event {
    pub fn tag(&self) -> Option<ClauseTag> {
        match self {
            | Event::Clause(event) => Some(event.tag),
            | Event::Sync(_) => None,
        }
    }
}
