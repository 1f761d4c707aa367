use crate::{event::*, syntax::*};

/// One-line rendering for configurations, values, and events, for drivers
/// and error reports. Proper pretty-printing lives with the consumers of
/// the trace.
pub trait Ugly {
    fn ugly(&self, f: &Formatter) -> String;
}

#[derive(Default)]
pub struct Formatter;

impl Formatter {
    pub fn new() -> Self {
        Formatter
    }
}

/* --------------------------------- Syntax ---------------------------------- */

impl Ugly for VarName {
    fn ugly(&self, _: &Formatter) -> String {
        format!("{}", self)
    }
}

impl Ugly for LExpr {
    fn ugly(&self, _: &Formatter) -> String {
        format!("{}", self)
    }
}

impl Ugly for Target {
    fn ugly(&self, f: &Formatter) -> String {
        match self {
            | Target::Sync(lexpr) => format!("! {}", lexpr.ugly(f)),
            | Target::Plain(lexpr) => lexpr.ugly(f),
        }
    }
}

impl Ugly for Bid {
    fn ugly(&self, f: &Formatter) -> String {
        let Bid { target, mater } = self;
        format!("{} {}", target.ugly(f), mater)
    }
}

impl Ugly for App {
    fn ugly(&self, f: &Formatter) -> String {
        let App { target, arg } = self;
        format!("({} {})", target.ugly(f), arg.ugly(f))
    }
}

impl Ugly for Abstraction {
    fn ugly(&self, f: &Formatter) -> String {
        let Abstraction { param, body, ret } = self;
        let mut s = String::new();
        s += &format!("fn {} -> {{ ", param.ugly(f));
        for clause in body {
            s += &clause.ugly(f);
            s += "; ";
        }
        s += &ret.ugly(f);
        s += " }";
        s
    }
}

impl Ugly for PrimValue {
    fn ugly(&self, _: &Formatter) -> String {
        match self {
            | PrimValue::Small(token) => format!("small({})", token),
            | PrimValue::Large(token) => format!("large({})", token),
        }
    }
}

impl Ugly for Literal {
    fn ugly(&self, f: &Formatter) -> String {
        match self {
            | Literal::Prim(prim) => prim.ugly(f),
            | Literal::Capture(capture) => capture.ugly(f),
        }
    }
}

impl Ugly for CaptureExpr {
    fn ugly(&self, f: &Formatter) -> String {
        let CaptureExpr { captures, abs } = self;
        let mut s = abs.ugly(f);
        s += " capture {";
        for (idx, (name, bid)) in captures.iter().enumerate() {
            if idx > 0 {
                s += ",";
            }
            s += &format!(" {}: {}", name.ugly(f), bid.ugly(f));
        }
        s += " }";
        s
    }
}

impl Ugly for RExpr {
    fn ugly(&self, f: &Formatter) -> String {
        match self {
            | RExpr::Bid(bid) => bid.ugly(f),
            | RExpr::App(app) => app.ugly(f),
            | RExpr::Lit(lit) => lit.ugly(f),
        }
    }
}

impl Ugly for Clause {
    fn ugly(&self, f: &Formatter) -> String {
        match self {
            | Clause::Assign(Assign { lhs, rhs }) => {
                format!("{} := {}", lhs.ugly(f), rhs.ugly(f))
            }
            | Clause::Sync(Synchronize(lexpr)) => format!("sync {}", lexpr.ugly(f)),
            | Clause::Ret(Return) => format!("return"),
        }
    }
}

impl Ugly for Program {
    fn ugly(&self, f: &Formatter) -> String {
        self.iter().map(|clause| clause.ugly(f)).collect::<Vec<_>>().join("; ")
    }
}

/* --------------------------------- Values ---------------------------------- */

impl Ugly for ShallowValue {
    fn ugly(&self, f: &Formatter) -> String {
        match self {
            | ShallowValue::Prim(prim) => prim.ugly(f),
            | ShallowValue::Abs(abs) => abs.ugly(f),
        }
    }
}

impl Ugly for StackValue {
    fn ugly(&self, f: &Formatter) -> String {
        match self {
            | StackValue::Small(token) => format!("small({})", token),
            | StackValue::Large(token) => format!("large-header({})", token),
            | StackValue::Abs(abs) => abs.ugly(f),
        }
    }
}

impl Ugly for HeapValue {
    fn ugly(&self, _: &Formatter) -> String {
        match self {
            | HeapValue::Large(token) => format!("large-body({})", token),
        }
    }
}

impl Ugly for Share {
    fn ugly(&self, _: &Formatter) -> String {
        match self {
            | Share::Owned(addr) => format!("own {}", addr.concise()),
            | Share::Borrowed(addr) => format!("ref {}", addr.concise()),
        }
    }
}

impl Ugly for Namespace {
    fn ugly(&self, f: &Formatter) -> String {
        let mut s = String::new();
        s += "{";
        for (idx, (name, share)) in self.iter().enumerate() {
            if idx > 0 {
                s += ",";
            }
            match share {
                | Some(share) => s += &format!(" {} -> {}", name.ugly(f), share.ugly(f)),
                | None => s += &format!(" {} -> _", name.ugly(f)),
            }
        }
        s += " }";
        s
    }
}

impl Ugly for Ident {
    fn ugly(&self, f: &Formatter) -> String {
        let Ident { dependents, stack, heap } = self;
        let stack = match stack {
            | Some(addr) => addr.concise(),
            | None => "_".to_string(),
        };
        let heap = match heap {
            | Some(addr) => addr.concise(),
            | None => "_".to_string(),
        };
        format!("{{ deps: {}, stack: {}, heap: {} }}", dependents.ugly(f), stack, heap)
    }
}

impl Ugly for Store {
    fn ugly(&self, f: &Formatter) -> String {
        let mut s = String::new();
        s += "env: [";
        for (idx, frame) in self.env.frames.iter().enumerate() {
            if idx > 0 {
                s += " |";
            }
            s += &format!(
                " locals {} closure {}",
                frame.locals.ugly(f),
                frame.closure.ugly(f)
            );
        }
        s += &format!(" ] globals {}", self.env.globals.ugly(f));
        s += " idents {";
        for (addr, ident) in self.idents.iter() {
            s += &format!(" {} -> {}", addr.concise(), ident.ugly(f));
        }
        s += " } stack {";
        for (addr, cell) in self.memory.stack.iter() {
            s += &format!(" {} -> {}", addr.concise(), cell.ugly(f));
        }
        s += " } heap {";
        for (addr, cell) in self.memory.heap.iter() {
            s += &format!(" {} -> {}", addr.concise(), cell.ugly(f));
        }
        s += " }";
        s
    }
}

/* --------------------------------- Events ---------------------------------- */

impl Ugly for Event {
    fn ugly(&self, f: &Formatter) -> String {
        match self {
            | Event::Clause(ClauseEvent { clause, store: _, tag }) => {
                format!("[{}] {}", tag, clause.ugly(f))
            }
            | Event::Sync(SyncEvent { lexpr, value }) => {
                format!("[Synchronization] {} = {}", lexpr.ugly(f), value.ugly(f))
            }
        }
    }
}
