//! Farkas encodings of implications between linear formulas.
//!
//! For an antecedent `A·x <= b` and one consequent conjunct `c·x <= d`,
//! Farkas' lemma makes the implication valid iff some `λ >= 0` satisfies
//! `λᵀA = c` and `λᵀb <= d`. Each consequent conjunct becomes one matrix
//! whose unknowns are the multipliers `λ_i`: one equation row per program
//! variable and a trailing inequality row for the bounds.
//!
//! Strict antecedent atoms are weakened, which keeps the encoding sound. An
//! antecedent equation contributes two multipliers; a consequent equation
//! yields two matrices.

use balancer_core::{Matrix, MatriciserKind, Result, Strictness};
use balancer_math::{Polynomial, RationalFunction, Variable};
use std::collections::BTreeSet;

use crate::formula::{Formula, LinearConstraint, Relation};

/// Builds Farkas matrices for implications.
pub trait Matriciser {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// One matrix per normalized consequent conjunct.
    fn build_matrices(&self, antecedent: &Formula, consequent: &Formula) -> Result<Vec<Matrix>>;
}

/// The matriciser selected by `kind`.
pub fn matriciser_for(kind: MatriciserKind) -> Box<dyn Matriciser> {
    match kind {
        MatriciserKind::InequalityRow => Box::new(InequalityRowMatriciser),
        MatriciserKind::Slack => Box::new(SlackMatriciser),
    }
}

/// Conjuncts in `<=` / `<` form. Strictness is ignored on the antecedent side.
fn atoms(formula: &Formula) -> Vec<LinearConstraint> {
    formula
        .constraints()
        .iter()
        .flat_map(LinearConstraint::normalized)
        .collect()
}

fn program_vars(atoms: &[LinearConstraint], goal: &LinearConstraint) -> BTreeSet<Variable> {
    atoms
        .iter()
        .flat_map(LinearConstraint::program_vars)
        .chain(goal.program_vars())
        .collect()
}

fn entry(p: &Polynomial) -> RationalFunction {
    RationalFunction::from_polynomial(p.clone())
}

/// Equation rows `Σ λ_i·a_i[x] (+ 0·slack) = c[x]`, one per program variable.
fn equation_rows(
    atoms: &[LinearConstraint],
    goal: &LinearConstraint,
    slack: bool,
) -> Vec<Vec<RationalFunction>> {
    program_vars(atoms, goal)
        .into_iter()
        .map(|x| {
            let mut row: Vec<RationalFunction> = atoms.iter().map(|a| entry(&a.coeff(x))).collect();
            if slack {
                row.push(RationalFunction::zero());
            }
            row.push(entry(&goal.coeff(x)));
            row
        })
        .collect()
}

fn bound_row(atoms: &[LinearConstraint], goal: &LinearConstraint) -> Vec<RationalFunction> {
    atoms
        .iter()
        .map(|a| entry(a.bound()))
        .chain(std::iter::once(entry(goal.bound())))
        .collect()
}

/// Farkas matrices with a trailing inequality row `Σ λ_i·b_i <= d`
/// (`<` for a strict consequent).
#[derive(Debug, Clone, Copy, Default)]
pub struct InequalityRowMatriciser;

impl Matriciser for InequalityRowMatriciser {
    fn name(&self) -> &'static str {
        "inequality-row"
    }

    fn build_matrices(&self, antecedent: &Formula, consequent: &Formula) -> Result<Vec<Matrix>> {
        let antecedent_atoms = atoms(antecedent);
        atoms(consequent)
            .iter()
            .map(|goal| {
                let mut rows = equation_rows(&antecedent_atoms, goal, false);
                rows.push(bound_row(&antecedent_atoms, goal));
                let strictness = if goal.relation() == Relation::Lt {
                    Strictness::Strict
                } else {
                    Strictness::Weak
                };
                Ok(Matrix::new(rows, 1)?.with_inequality(strictness))
            })
            .collect()
    }
}

/// Farkas matrices where a weak bound row gets an explicit slack unknown,
/// `Σ λ_i·b_i + s = d`, so every row is an equation. Strict consequents keep
/// the strict trailing row.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlackMatriciser;

impl Matriciser for SlackMatriciser {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn build_matrices(&self, antecedent: &Formula, consequent: &Formula) -> Result<Vec<Matrix>> {
        let antecedent_atoms = atoms(antecedent);
        atoms(consequent)
            .iter()
            .map(|goal| {
                if goal.relation() == Relation::Lt {
                    return InequalityRowMatriciser.build_matrices(
                        antecedent,
                        &Formula::from_constraints(vec![goal.clone()]),
                    );
                }
                let mut rows = equation_rows(&antecedent_atoms, goal, true);
                let mut bounds = bound_row(&antecedent_atoms, goal);
                bounds.insert(antecedent_atoms.len(), RationalFunction::one());
                rows.push(bounds);
                Ok(vec![Matrix::new(rows, 1)?])
            })
            .collect::<Result<Vec<_>>>()
            .map(|nested| nested.into_iter().flatten().collect())
    }
}
