//! Collections of assumptions with one member per function.

use super::{Assumption, AssumptionRelation, AssumptionType};
use balancer_math::{BigRational, RationalFunction, Substitution, Variable};
use num_traits::{Signed, Zero};
use rustc_hash::FxHashMap;
use std::fmt;

/// An ordered set of assumptions, merged per function.
///
/// Backed by a persistent vector so that cloning (taking a checkpoint) is
/// constant time.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AssumptionSet {
    members: im::Vector<Assumption>,
}

impl AssumptionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over the members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Assumption> {
        self.members.iter()
    }

    /// Returns true if some member is `FALSE`.
    pub fn is_false(&self) -> bool {
        self.members.iter().any(Assumption::is_false)
    }

    /// Insert an assumption, merging it into a comparable member if one exists.
    ///
    /// Returns whether the affected member is still satisfiable. Trivial
    /// assumptions are dropped.
    pub fn add(&mut self, assumption: Assumption) -> bool {
        if assumption.is_trivial() {
            return true;
        }
        let merged = self
            .members
            .iter()
            .enumerate()
            .find_map(|(i, member)| member.strengthen(&assumption).map(|m| (i, m)));
        match merged {
            Some((i, strengthened)) => {
                let ok = !strengthened.is_false();
                self.members.set(i, strengthened);
                ok
            }
            None => {
                let ok = !assumption.is_false();
                self.members.push_back(assumption);
                ok
            }
        }
    }

    /// Insert several assumptions; returns false if any insertion failed.
    pub fn add_all(&mut self, assumptions: impl IntoIterator<Item = Assumption>) -> bool {
        let mut ok = true;
        for assumption in assumptions {
            ok &= self.add(assumption);
        }
        ok
    }

    /// Insert every member of another set.
    pub fn extend_from(&mut self, other: &AssumptionSet) -> bool {
        self.add_all(other.iter().cloned())
    }

    /// How `assumption` relates to what is on file.
    pub fn match_against(&self, assumption: &Assumption) -> AssumptionRelation {
        if assumption.is_trivial() {
            return AssumptionRelation::Weakens;
        }
        if assumption.is_false() {
            return AssumptionRelation::Contradicts;
        }
        self.members
            .iter()
            .map(|member| assumption.match_against(member))
            .find(|relation| *relation != AssumptionRelation::DoesNotCompareTo)
            .unwrap_or(AssumptionRelation::DoesNotCompareTo)
    }

    /// The strongest sign fact on file about `f` (`TRUE` if none).
    ///
    /// Constant functions are answered exactly.
    pub fn query(&self, f: &RationalFunction) -> AssumptionType {
        if let Some(value) = f.constant_value() {
            return if value.is_zero() {
                AssumptionType::ZERO
            } else if value.is_positive() {
                AssumptionType::POSITIVE
            } else {
                AssumptionType::NEGATIVE
            };
        }
        let (scalar, normal) = f.cancel_scalar_content();
        self.members
            .iter()
            .find(|member| member.function() == &normal)
            .map(|member| {
                if scalar.is_negative() {
                    member.kind().flip()
                } else {
                    member.kind()
                }
            })
            .unwrap_or(AssumptionType::TRUE)
    }

    /// Returns true if `f` is known to be zero.
    pub fn is_known_zero(&self, f: &RationalFunction) -> bool {
        self.query(f).implies(AssumptionType::ZERO)
    }

    /// Rewrite every member with a substitution.
    ///
    /// Returns false if the rewrite produced a contradiction.
    pub fn substitute(&mut self, sub: &Substitution) -> bool {
        let old = std::mem::take(&mut self.members);
        let mut ok = true;
        for member in old {
            ok &= self.add(member.substitute(sub));
        }
        ok
    }

    /// Whether every member holds under an assignment; `None` if some member
    /// cannot be evaluated.
    pub fn eval(&self, assignment: &FxHashMap<Variable, BigRational>) -> Option<bool> {
        let mut all = true;
        for member in &self.members {
            all &= member.eval(assignment)?;
        }
        Some(all)
    }

    /// Parameters mentioned by any member, sorted.
    pub fn vars(&self) -> Vec<Variable> {
        let mut vars: Vec<Variable> = self
            .members
            .iter()
            .flat_map(|member| member.function().vars())
            .collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// Relational atoms of all members.
    pub fn atoms(&self) -> Vec<String> {
        self.members.iter().flat_map(Assumption::render).collect()
    }

    /// The existential elimination request `rlex(...)` for this set.
    pub fn to_query(&self) -> String {
        let atoms = self.atoms();
        if atoms.is_empty() {
            "rlex(true)".to_string()
        } else {
            format!("rlex({})", atoms.join(" and "))
        }
    }
}

impl FromIterator<Assumption> for AssumptionSet {
    fn from_iter<I: IntoIterator<Item = Assumption>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_all(iter);
        set
    }
}

impl fmt::Debug for AssumptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.members.iter()).finish()
    }
}

impl fmt::Display for AssumptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.members.is_empty() {
            return write!(f, "true");
        }
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, " and ")?;
            }
            write!(f, "{member}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balancer_math::Polynomial;

    fn p1() -> Polynomial {
        Polynomial::from_coeffs_int(&[(1, &[("p", 1)]), (-1, &[("q", 1)])])
    }

    #[test]
    fn test_positive_then_nonnegative_merges() {
        let mut set = AssumptionSet::new();
        assert!(set.add(Assumption::from_polynomial(p1(), AssumptionType::POSITIVE)));
        assert!(set.add(Assumption::from_polynomial(p1(), AssumptionType::NONNEGATIVE)));
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.iter().next(),
            Some(&Assumption::from_polynomial(p1(), AssumptionType::POSITIVE))
        );
    }

    #[test]
    fn test_positive_then_negative_is_false() {
        let mut set = AssumptionSet::new();
        assert!(set.add(Assumption::from_polynomial(p1(), AssumptionType::POSITIVE)));
        assert!(!set.add(Assumption::from_polynomial(p1(), AssumptionType::NEGATIVE)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(Assumption::kind), Some(AssumptionType::FALSE));
        assert!(set.is_false());
    }

    #[test]
    fn test_query_scaled_and_negated() {
        let mut set = AssumptionSet::new();
        set.add(Assumption::from_polynomial(p1(), AssumptionType::POSITIVE));

        let scaled = RationalFunction::from_polynomial(p1().scale(&BigRational::from_integer((-3).into())));
        assert_eq!(set.query(&scaled), AssumptionType::NEGATIVE);
        assert_eq!(set.query(&RationalFunction::from_var(Variable::new("r"))), AssumptionType::TRUE);
        assert_eq!(set.query(&RationalFunction::zero()), AssumptionType::ZERO);
        assert_eq!(set.query(&RationalFunction::from_integer(-2)), AssumptionType::NEGATIVE);
    }

    #[test]
    fn test_substitute_detects_contradiction() {
        let mut set = AssumptionSet::new();
        set.add(Assumption::from_polynomial(p1(), AssumptionType::POSITIVE));
        // p := q makes p - q identically zero
        let sub = Substitution::new(Variable::new("p"), Polynomial::from_var(Variable::new("q")));
        assert!(!set.substitute(&sub));
        assert!(set.is_false());
    }

    #[test]
    fn test_query_string() {
        let mut set = AssumptionSet::new();
        assert_eq!(set.to_query(), "rlex(true)");
        set.add(Assumption::from_polynomial(p1(), AssumptionType::NONNEGATIVE));
        set.add(Assumption::from_polynomial(
            Polynomial::from_var(Variable::new("r")),
            AssumptionType::NONZERO,
        ));
        assert_eq!(set.to_query(), "rlex(p - q >= 0 and r <> 0)");
    }
}
