use crate::*;
use std::fmt;

macro_rules! impl_name {
    ($name:ident) => {
        impl $name {
            pub fn plain(&self) -> &str {
                let $name(name) = self;
                name
            }
        }
        impl<T: AsRef<str>> From<T> for $name {
            fn from(name: T) -> Self {
                $name(name.as_ref().to_string())
            }
        }
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.plain())
            }
        }
    };
}

impl_name!(VarName);
impl_name!(Sentinel);

impl LExpr {
    /// The dependent `self.name`.
    pub fn proj(self, name: impl Into<VarName>) -> LExpr {
        LExpr::Proj(Box::new(self), name.into())
    }
}

impl fmt::Display for LExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | LExpr::Var(name) => write!(f, "{}", name),
            | LExpr::Proj(prefix, name) => write!(f, "{}.{}", prefix, name),
        }
    }
}

impl fmt::Display for Mater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | Mater::Move => write!(f, "move"),
            | Mater::Copy => write!(f, "copy"),
            | Mater::Refr => write!(f, "refr"),
        }
    }
}
