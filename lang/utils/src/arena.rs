/* ---------------------------------- Index --------------------------------- */

pub use crate::new_key_type;

/// Keys minted off an [`IndexAlloc`]. The impl must round-trip the index it
/// was constructed with; tables rely on that for lookup.
pub unsafe trait IndexLike: Clone + Copy + Eq + Ord + std::hash::Hash {
    fn new(idx: usize) -> Self;
    fn index(&self) -> usize;
}

/* -------------------------------- Allocator ------------------------------- */

/// A strictly increasing index counter. Every key type drawn from the same
/// allocator shares one number space, so no two keys ever carry the same
/// index within a run.
#[derive(Debug, Default)]
pub struct IndexAlloc(usize);

impl IndexAlloc {
    pub fn new() -> Self {
        IndexAlloc(0)
    }
    pub fn mint(&mut self) -> usize {
        let old = self.0;
        self.0 += 1;
        old
    }
}

impl Iterator for IndexAlloc {
    type Item = usize;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.mint())
    }
}

#[macro_export]
macro_rules! new_key_type {
    ( $(#[$outer:meta])* $vis:vis struct $name:ident ; $($rest:tt)* ) => {
        $(#[$outer])*
        #[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
        $vis struct $name(usize);

        unsafe impl $crate::arena::IndexLike for $name {
            fn new(idx: usize) -> Self {
                Self(idx)
            }
            fn index(&self) -> usize {
                self.0
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl $name {
            pub fn concise(&self) -> String {
                format!("#{}", self.0)
            }
        }

        $crate::new_key_type!($($rest)*);
    };

    () => {}
}
