//! Variable eliminations produced by zero facts.

use crate::polynomial::Polynomial;
use crate::rational_function::RationalFunction;
use crate::variable::Variable;
use std::fmt;

/// `var := value`, obtained by solving some `polynomial = 0` for a variable
/// that occurs in it only linearly.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Substitution {
    var: Variable,
    value: Polynomial,
}

impl Substitution {
    /// Create a substitution.
    pub fn new(var: Variable, value: Polynomial) -> Self {
        Self { var, value }
    }

    /// The eliminated variable.
    #[inline]
    pub fn var(&self) -> Variable {
        self.var
    }

    /// The value it is replaced by.
    #[inline]
    pub fn value(&self) -> &Polynomial {
        &self.value
    }

    /// Returns true if the value mentions the eliminated variable itself.
    pub fn is_cyclic(&self) -> bool {
        self.value.contains(self.var)
    }

    /// Apply to a polynomial.
    pub fn apply(&self, poly: &Polynomial) -> Polynomial {
        poly.substitute(self.var, &self.value)
    }

    /// Apply to a rational function.
    pub fn apply_rational(&self, f: &RationalFunction) -> RationalFunction {
        f.substitute(self.var, &self.value)
    }

    /// Rewrite this substitution's value with another substitution.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        Substitution {
            var: self.var,
            value: other.apply(&self.value),
        }
    }

    /// The equation `var - value`, which is zero whenever the substitution holds.
    pub fn as_equation(&self) -> Polynomial {
        Polynomial::from_var(self.var).sub(&self.value)
    }
}

impl fmt::Debug for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} := {}", self.var, self.value)
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
