//! Closed lists of variable eliminations.

use crate::assumption::Assumption;
use crate::matrix::Matrix;
use balancer_math::{BigRational, Polynomial, RationalFunction, Substitution, Variable};
use rustc_hash::FxHashMap;

/// Substitutions kept closed under each other: no value mentions an
/// eliminated variable, so applying them in any order gives the same result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionManager {
    subs: im::Vector<Substitution>,
}

impl SubstitutionManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of eliminated variables.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Returns true if nothing has been eliminated.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// The closed substitutions, in elimination order.
    pub fn iter(&self) -> impl Iterator<Item = &Substitution> {
        self.subs.iter()
    }

    /// Eliminated variables.
    pub fn eliminated(&self) -> Vec<Variable> {
        self.subs.iter().map(Substitution::var).collect()
    }

    /// Add a substitution and close the list.
    ///
    /// The new value is rewritten with the existing substitutions, then every
    /// existing value is rewritten with the new one. Returns the closed form
    /// of the new substitution, or `None` if it became cyclic or eliminates a
    /// variable that is already gone.
    pub fn push(&mut self, sub: Substitution) -> Option<Substitution> {
        if self.subs.iter().any(|s| s.var() == sub.var()) {
            return None;
        }
        let closed = self.subs.iter().fold(sub, |acc, s| acc.compose(s));
        if closed.is_cyclic() {
            return None;
        }
        self.subs = self.subs.iter().map(|s| s.compose(&closed)).collect();
        self.subs.push_back(closed.clone());
        Some(closed)
    }

    /// Apply every substitution to a polynomial.
    pub fn apply(&self, poly: &Polynomial) -> Polynomial {
        self.subs.iter().fold(poly.clone(), |acc, s| s.apply(&acc))
    }

    /// Apply every substitution to a rational function.
    pub fn apply_rational(&self, f: &RationalFunction) -> RationalFunction {
        self.subs.iter().fold(f.clone(), |acc, s| s.apply_rational(&acc))
    }

    /// Apply every substitution to an assumption.
    pub fn apply_assumption(&self, a: &Assumption) -> Assumption {
        self.subs.iter().fold(a.clone(), |acc, s| acc.substitute(s))
    }

    /// Apply every substitution to a matrix.
    pub fn apply_matrix(&self, matrix: &mut Matrix) {
        for s in &self.subs {
            matrix.substitute(s);
        }
    }

    /// The equations `var - value` of all substitutions.
    pub fn equations(&self) -> Vec<Polynomial> {
        self.subs.iter().map(Substitution::as_equation).collect()
    }

    /// Values of the eliminated variables under an assignment of the others.
    ///
    /// Substitutions whose value mentions an unbound variable are skipped.
    pub fn resolve(&self, values: &FxHashMap<Variable, BigRational>) -> FxHashMap<Variable, BigRational> {
        self.subs
            .iter()
            .filter_map(|s| s.value().eval(values).map(|v| (s.var(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(coeffs: &[(i64, &[(&str, u32)])]) -> Polynomial {
        Polynomial::from_coeffs_int(coeffs)
    }

    #[test]
    fn test_chained_eliminations_collapse() {
        let mut subs = SubstitutionManager::new();
        // a := b + 1, then b := 2
        subs.push(Substitution::new(Variable::new("a"), p(&[(1, &[("b", 1)]), (1, &[])])))
            .expect("fresh");
        subs.push(Substitution::new(Variable::new("b"), Polynomial::from_integer(2)))
            .expect("fresh");

        let values: Vec<_> = subs.iter().map(|s| s.value().clone()).collect();
        assert_eq!(values, vec![Polynomial::from_integer(3), Polynomial::from_integer(2)]);
        assert_eq!(
            subs.apply(&p(&[(1, &[("a", 1)]), (1, &[("b", 1)]), (1, &[("c", 1)])])),
            p(&[(1, &[("c", 1)]), (5, &[])])
        );
    }

    #[test]
    fn test_new_value_is_closed_under_existing() {
        let mut subs = SubstitutionManager::new();
        subs.push(Substitution::new(Variable::new("b"), Polynomial::from_integer(2)))
            .expect("fresh");
        let closed = subs
            .push(Substitution::new(Variable::new("a"), p(&[(3, &[("b", 1)])])))
            .expect("fresh");
        assert_eq!(closed.value(), &Polynomial::from_integer(6));
        assert!(subs
            .push(Substitution::new(Variable::new("a"), Polynomial::zero()))
            .is_none());
    }

    #[test]
    fn test_resolve() {
        let mut subs = SubstitutionManager::new();
        subs.push(Substitution::new(Variable::new("a"), p(&[(2, &[("c", 1)])])))
            .expect("fresh");
        let mut values = FxHashMap::default();
        values.insert(Variable::new("c"), BigRational::from_integer(5.into()));
        let resolved = subs.resolve(&values);
        assert_eq!(
            resolved.get(&Variable::new("a")),
            Some(&BigRational::from_integer(10.into()))
        );
        assert!(subs.resolve(&FxHashMap::default()).is_empty());
    }
}
