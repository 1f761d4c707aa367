/// Builders that keep scenario programs readable.
pub mod build {
    use materia_dynamics::syntax::Program;
    use materia_syntax::*;

    pub fn var(name: &str) -> LExpr {
        LExpr::Var(VarName::from(name))
    }

    pub fn assign(lhs: LExpr, rhs: impl Into<RExpr>) -> Clause {
        Assign { lhs, rhs: rhs.into() }.into()
    }

    pub fn small(token: &str) -> RExpr {
        Literal::Prim(PrimValue::Small(Sentinel::from(token))).into()
    }

    pub fn large(token: &str) -> RExpr {
        Literal::Prim(PrimValue::Large(Sentinel::from(token))).into()
    }

    pub fn bid(src: LExpr, mater: Mater) -> Bid {
        Bid { target: Target::Plain(src), mater }
    }

    pub fn moved(src: LExpr) -> RExpr {
        bid(src, Mater::Move).into()
    }

    pub fn copied(src: LExpr) -> RExpr {
        bid(src, Mater::Copy).into()
    }

    pub fn refr(src: LExpr) -> RExpr {
        bid(src, Mater::Refr).into()
    }

    pub fn apply(target: LExpr, src: LExpr, mater: Mater) -> RExpr {
        App { target: Target::Plain(target), arg: bid(src, mater) }.into()
    }

    pub fn sync(lexpr: LExpr) -> Clause {
        Synchronize(lexpr).into()
    }

    pub fn ret() -> Clause {
        Return.into()
    }

    pub fn lambda(param: &str, body: Vec<Clause>, ret: RExpr) -> Abstraction {
        Abstraction { param: VarName::from(param), body, ret: Box::new(ret) }
    }

    pub fn capture(captures: Vec<(&str, Bid)>, abs: Abstraction) -> RExpr {
        Literal::Capture(CaptureExpr {
            captures: captures
                .into_iter()
                .map(|(name, bid)| (VarName::from(name), bid))
                .collect(),
            abs,
        })
        .into()
    }

    pub fn program(clauses: Vec<Clause>) -> Program {
        Program(clauses.into())
    }
}
