//! Linear constraints with parametric coefficients.
//!
//! Program variables appear linearly; their coefficients and the bound are
//! polynomials over the template parameters. A [`Formula`] is a conjunction
//! of such constraints.

use crate::template::ParameterValues;
use balancer_core::{BalanceError, Result};
use balancer_math::{Polynomial, Variable};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Relation between the linear form and the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `<=`
    Le,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `>`
    Gt,
    /// `=`
    Eq,
}

impl Relation {
    /// Printed operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Le => "<=",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::Eq => "=",
        }
    }

    /// Whether the relation excludes equality.
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Lt | Self::Gt)
    }
}

/// `Σ coeff_x·x ⋈ bound`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    coeffs: BTreeMap<Variable, Polynomial>,
    relation: Relation,
    bound: Polynomial,
}

impl LinearConstraint {
    /// A constraint without program variables.
    pub fn new(relation: Relation, bound: Polynomial) -> Self {
        Self {
            coeffs: BTreeMap::new(),
            relation,
            bound,
        }
    }

    /// Add `coeff·var` to the left-hand side.
    #[must_use]
    pub fn with_term(mut self, var: Variable, coeff: Polynomial) -> Self {
        let sum = match self.coeffs.remove(&var) {
            Some(old) => old.add(&coeff),
            None => coeff,
        };
        if !sum.is_zero() {
            self.coeffs.insert(var, sum);
        }
        self
    }

    /// A constraint with integer coefficients, e.g. `[(1, "x"), (-2, "y")] <= 3`.
    pub fn from_ints(terms: &[(i64, &str)], relation: Relation, bound: i64) -> Self {
        terms.iter().fold(
            Self::new(relation, Polynomial::from_integer(bound)),
            |acc, (c, name)| acc.with_term(Variable::new(name), Polynomial::from_integer(*c)),
        )
    }

    /// The relation.
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// The right-hand side.
    pub fn bound(&self) -> &Polynomial {
        &self.bound
    }

    /// Coefficient of `var` (zero if absent).
    pub fn coeff(&self, var: Variable) -> Polynomial {
        self.coeffs.get(&var).cloned().unwrap_or_else(Polynomial::zero)
    }

    /// Non-zero terms, ordered by variable.
    pub fn terms(&self) -> impl Iterator<Item = (Variable, &Polynomial)> {
        self.coeffs.iter().map(|(v, c)| (*v, c))
    }

    /// Program variables with a non-zero coefficient.
    pub fn program_vars(&self) -> BTreeSet<Variable> {
        self.coeffs.keys().copied().collect()
    }

    /// Parameters occurring in coefficients or the bound.
    pub fn parameters(&self) -> BTreeSet<Variable> {
        self.coeffs
            .values()
            .chain(std::iter::once(&self.bound))
            .flat_map(Polynomial::vars)
            .collect()
    }

    fn negated_sides(&self, relation: Relation) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|(v, c)| (*v, c.neg())).collect(),
            relation,
            bound: self.bound.neg(),
        }
    }

    /// Rewrite into `<=` / `<` constraints; an equation becomes two.
    pub fn normalized(&self) -> Vec<LinearConstraint> {
        match self.relation {
            Relation::Le | Relation::Lt => vec![self.clone()],
            Relation::Ge => vec![self.negated_sides(Relation::Le)],
            Relation::Gt => vec![self.negated_sides(Relation::Lt)],
            Relation::Eq => vec![
                Self {
                    relation: Relation::Le,
                    ..self.clone()
                },
                self.negated_sides(Relation::Le),
            ],
        }
    }

    /// Rename every program variable `x` to `x'`.
    pub fn primed(&self) -> Self {
        Self {
            coeffs: self
                .coeffs
                .iter()
                .map(|(v, c)| (Variable::new(&format!("{}'", v.name())), c.clone()))
                .collect(),
            relation: self.relation,
            bound: self.bound.clone(),
        }
    }

    /// Replace every parameter by its value.
    pub fn instantiate(&self, values: &ParameterValues) -> Result<Self> {
        let subst = |p: &Polynomial| -> Result<Polynomial> {
            p.vars().into_iter().try_fold(p.clone(), |acc, param| {
                let value = values.get(&param).ok_or_else(|| {
                    BalanceError::Evaluation(format!("parameter {param} is unbound"))
                })?;
                Ok(acc.substitute(param, &Polynomial::constant(value.clone())))
            })
        };
        let mut out = Self::new(self.relation, subst(&self.bound)?);
        for (v, c) in &self.coeffs {
            out = out.with_term(*v, subst(c)?);
        }
        Ok(out)
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coeffs.is_empty() {
            write!(f, "0")?;
        }
        for (i, (v, c)) in self.coeffs.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if c.is_unity() {
                write!(f, "{v}")?;
            } else if c.is_constant() {
                write!(f, "{c}*{v}")?;
            } else {
                write!(f, "({c})*{v}")?;
            }
        }
        write!(f, " {} {}", self.relation.symbol(), self.bound)
    }
}

/// A conjunction of linear constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    constraints: Vec<LinearConstraint>,
}

impl Formula {
    /// The empty conjunction.
    pub fn truth() -> Self {
        Self::default()
    }

    /// `0 < 0`
    pub fn falsum() -> Self {
        Self::from_constraints(vec![LinearConstraint::new(Relation::Lt, Polynomial::zero())])
    }

    /// Conjunction of `constraints`.
    pub fn from_constraints(constraints: Vec<LinearConstraint>) -> Self {
        Self { constraints }
    }

    /// Add a conjunct.
    #[must_use]
    pub fn and(mut self, constraint: LinearConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Conjunction of both formulas.
    pub fn conjoin(&self, other: &Formula) -> Self {
        Self {
            constraints: self.constraints.iter().chain(&other.constraints).cloned().collect(),
        }
    }

    /// The conjuncts.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Whether this is the empty conjunction.
    pub fn is_truth(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Prime every program variable.
    pub fn primed(&self) -> Self {
        Self {
            constraints: self.constraints.iter().map(LinearConstraint::primed).collect(),
        }
    }

    /// Program variables of all conjuncts.
    pub fn program_vars(&self) -> BTreeSet<Variable> {
        self.constraints.iter().flat_map(LinearConstraint::program_vars).collect()
    }

    /// Parameters of all conjuncts.
    pub fn parameters(&self) -> BTreeSet<Variable> {
        self.constraints.iter().flat_map(LinearConstraint::parameters).collect()
    }

    /// Replace every parameter by its value.
    pub fn instantiate(&self, values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            constraints: self
                .constraints
                .iter()
                .map(|c| c.instantiate(values))
                .collect::<Result<_>>()?,
        })
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_empty() {
            return write!(f, "true");
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if i > 0 {
                write!(f, " and ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
