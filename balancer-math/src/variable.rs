//! Interned parameter symbols.
//!
//! Every template parameter is a [`Variable`]: a cheap `Copy` handle into a
//! process-wide interner. Handles compare by the name they stand for, so the
//! ordering of monomials (and therefore the printed form of polynomials) does
//! not depend on the order in which names were first interned.

use lasso::{Spur, ThreadedRodeo};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

fn interner() -> &'static ThreadedRodeo {
    static INTERNER: OnceLock<ThreadedRodeo> = OnceLock::new();
    INTERNER.get_or_init(ThreadedRodeo::default)
}

/// An interned parameter symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable(Spur);

impl Variable {
    /// Intern `name` and return its handle.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Look up an already interned name without creating it.
    pub fn lookup(name: &str) -> Option<Self> {
        interner().get(name).map(Self)
    }

    /// The symbol's name.
    pub fn name(&self) -> &'static str {
        interner().resolve(&self.0)
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == other.0 {
            Ordering::Equal
        } else {
            self.name().cmp(other.name())
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_is_stable() {
        let a = Variable::new("alpha");
        let b = Variable::new("alpha");
        assert_eq!(a, b);
        assert_eq!(a.name(), "alpha");
    }

    #[test]
    fn test_order_follows_names() {
        // Intern in reverse order on purpose.
        let z = Variable::new("zz_order");
        let a = Variable::new("aa_order");
        assert!(a < z);
        assert_eq!(a.cmp(&a), Ordering::Equal);
    }

    #[test]
    fn test_lookup() {
        assert!(Variable::lookup("never_interned_symbol_xyz").is_none());
        let v = Variable::new("looked_up");
        assert_eq!(Variable::lookup("looked_up"), Some(v));
    }
}
