//! Sign facts about parametric rational functions.
//!
//! An [`Assumption`] pairs a [`RationalFunction`] with an [`AssumptionType`]
//! and is normalized on construction so that proportional functions share a
//! representative: the scalar content is cancelled out of the function and a
//! negative scalar flips the type. `-2p <= 0` and `p >= 0` are therefore the
//! same assumption, and comparing two assumptions never needs an oracle.

mod kind;
mod set;

pub use kind::AssumptionType;
pub use set::AssumptionSet;

use balancer_math::{BigRational, RationalFunction, Substitution, Variable};
use num_traits::{Signed, Zero};
use rustc_hash::FxHashMap;
use std::fmt;

/// How one assumption relates to another with respect to the same function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssumptionRelation {
    /// Together they are unsatisfiable.
    Contradicts,
    /// Same function, same type.
    IsSameAs,
    /// The other assumption already implies this one.
    Weakens,
    /// This assumption implies the other one.
    Strengthens,
    /// Both are needed; their conjunction is strictly stronger than either.
    Refines,
    /// The functions are not proportional.
    DoesNotCompareTo,
}

impl AssumptionRelation {
    /// Whether adding an assumption with this relation adds nothing.
    pub fn is_implied(self) -> bool {
        matches!(self, Self::IsSameAs | Self::Weakens)
    }
}

/// `function ⋈ 0` for the operator named by `kind`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Assumption {
    function: RationalFunction,
    kind: AssumptionType,
}

impl Assumption {
    /// Create a normalized assumption.
    ///
    /// A constant function is decided right away: the result is `1 ⋈ TRUE`
    /// or `1 ⋈ FALSE`.
    pub fn new(function: RationalFunction, kind: AssumptionType) -> Self {
        if let Some(value) = function.constant_value() {
            let holds = kind.admits(value.cmp(&BigRational::zero()));
            return Self {
                function: RationalFunction::one(),
                kind: if holds {
                    AssumptionType::TRUE
                } else {
                    AssumptionType::FALSE
                },
            };
        }

        let (scalar, function) = function.cancel_scalar_content();
        let kind = if scalar.is_negative() { kind.flip() } else { kind };
        Self { function, kind }
    }

    /// Shorthand for a polynomial-valued function.
    pub fn from_polynomial(poly: balancer_math::Polynomial, kind: AssumptionType) -> Self {
        Self::new(RationalFunction::from_polynomial(poly), kind)
    }

    /// The normalized function.
    #[inline]
    pub fn function(&self) -> &RationalFunction {
        &self.function
    }

    /// The sign constraint.
    #[inline]
    pub fn kind(&self) -> AssumptionType {
        self.kind
    }

    /// Returns true if the assumption says nothing.
    pub fn is_trivial(&self) -> bool {
        self.kind.is_true()
    }

    /// Returns true if the assumption cannot hold.
    pub fn is_false(&self) -> bool {
        self.kind.is_false()
    }

    /// The complementary assumption about the same function.
    #[must_use]
    pub fn negate(&self) -> Assumption {
        Self {
            function: self.function.clone(),
            kind: self.kind.negate(),
        }
    }

    /// Whether the two functions are equal or additive inverses.
    pub fn is_comparable(&self, other: &Assumption) -> bool {
        self.orientation(other).is_some()
    }

    /// `Some(false)` if the functions are equal, `Some(true)` if they are
    /// additive inverses.
    fn orientation(&self, other: &Assumption) -> Option<bool> {
        if self.function == other.function {
            Some(false)
        } else if self.function == other.function.neg() {
            Some(true)
        } else {
            None
        }
    }

    /// The other assumption's type expressed on this assumption's function.
    fn aligned_kind(&self, other: &Assumption) -> Option<AssumptionType> {
        self.orientation(other)
            .map(|flipped| if flipped { other.kind.flip() } else { other.kind })
    }

    /// The conjunction of two comparable assumptions, or `None`.
    pub fn strengthen(&self, other: &Assumption) -> Option<Assumption> {
        let other_kind = self.aligned_kind(other)?;
        Some(Self {
            function: self.function.clone(),
            kind: self.kind.conjoin(other_kind),
        })
    }

    /// Classify this assumption against another.
    pub fn match_against(&self, other: &Assumption) -> AssumptionRelation {
        let Some(other_kind) = self.aligned_kind(other) else {
            return AssumptionRelation::DoesNotCompareTo;
        };
        let conj = self.kind.conjoin(other_kind);
        if conj.is_false() {
            AssumptionRelation::Contradicts
        } else if self.kind == other_kind {
            AssumptionRelation::IsSameAs
        } else if conj == other_kind {
            AssumptionRelation::Weakens
        } else if conj == self.kind {
            AssumptionRelation::Strengthens
        } else {
            AssumptionRelation::Refines
        }
    }

    /// Apply a substitution and re-normalize.
    #[must_use]
    pub fn substitute(&self, sub: &Substitution) -> Assumption {
        if self.function.is_constant() {
            return self.clone();
        }
        Self::new(sub.apply_rational(&self.function), self.kind)
    }

    /// Whether the assumption holds under an assignment; `None` if a variable
    /// is unbound or a denominator vanishes.
    pub fn eval(&self, assignment: &FxHashMap<Variable, BigRational>) -> Option<bool> {
        let value = self.function.eval(assignment)?;
        Some(self.kind.admits(value.cmp(&BigRational::zero())))
    }

    /// The relational atoms of the oracle language.
    ///
    /// `n/d ⋈ 0` is rendered as `n*d ⋈ 0`, with `d <> 0` added whenever the
    /// denominator is not constant.
    pub fn render(&self) -> Vec<String> {
        let Some(op) = self.kind.operator() else {
            return vec![self.kind.name().to_string()];
        };
        let num = self.function.numerator();
        let den = self.function.denominator();
        if den.is_constant() {
            vec![format!("{num} {op} 0")]
        } else {
            vec![
                format!("{} {op} 0", num.mul(den)),
                format!("{den} <> 0"),
            ]
        }
    }
}

impl fmt::Debug for Assumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.operator() {
            Some(op) => write!(f, "{} {op} 0", self.function),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl fmt::Display for Assumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
