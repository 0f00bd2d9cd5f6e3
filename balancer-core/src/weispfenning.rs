//! Substitution-based feasibility search.
//!
//! Solves the same per-matrix problem as elimination plus pivot-row analysis,
//! without bringing the matrix into reduced form. The matrix (one augmented
//! column at a time) is read as a linear system over the unknowns:
//!
//! - every equation row `Σ m_k·y_k = aug` becomes `Σ m_k·y_k - aug = 0`;
//! - every unknown contributes `y_k >= 0`;
//! - a trailing row `Σ e_k·y_k <= aug` becomes `aug - Σ e_k·y_k >= 0` (`> 0`
//!   if strict).
//!
//! An unknown is eliminated by making one of the rows containing it tight and
//! substituting the solved value into every other row. A strict row is never
//! made tight. Rows left without unknowns turn into sign facts about their
//! constants. Once no unknown remains, the collected facts form a candidate
//! assumption set: any parameter values satisfying it make the system
//! feasible. The choices of `(unknown, row)` are explored depth first, so the
//! search yields one candidate after another.
//!
//! Candidates are only checked for the contradictions that merging them into
//! an [`AssumptionSet`] exposes; they are not otherwise proven satisfiable.

use crate::assumption::{Assumption, AssumptionSet, AssumptionType};
use crate::matrix::{Matrix, Strictness};
use balancer_math::RationalFunction;
use std::collections::VecDeque;
use tracing::trace;

/// Statistics for the search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeispfenningStats {
    /// Unknowns eliminated.
    pub eliminations: u64,
    /// Candidate sets produced.
    pub candidates: u64,
    /// Branches abandoned.
    pub dead_ends: u64,
}

/// What a row asserts about its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// `= 0`
    Equation,
    /// `>= 0`
    Weak,
    /// `> 0`
    Strict,
}

impl RowKind {
    fn required_sign(self) -> AssumptionType {
        match self {
            Self::Equation => AssumptionType::ZERO,
            Self::Weak => AssumptionType::NONNEGATIVE,
            Self::Strict => AssumptionType::POSITIVE,
        }
    }
}

/// `Σ coeffs[k]·y_k + constant ⋈ 0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearRow {
    /// Coefficient per unknown.
    pub coeffs: Vec<RationalFunction>,
    /// Constant part.
    pub constant: RationalFunction,
    /// Relation to zero.
    pub kind: RowKind,
}

impl LinearRow {
    fn mentions(&self, var: usize) -> bool {
        !self.coeffs[var].is_zero()
    }

    fn has_unknowns(&self) -> bool {
        self.coeffs.iter().any(|c| !c.is_zero())
    }

    /// `self - factor * other`
    fn subtract_multiple(&mut self, factor: &RationalFunction, other: &LinearRow) {
        for (c, o) in self.coeffs.iter_mut().zip(&other.coeffs) {
            if !o.is_zero() {
                *c = c.sub(&factor.mul(o));
            }
        }
        self.constant = self.constant.sub(&factor.mul(&other.constant));
    }
}

#[derive(Debug, Clone)]
struct Node {
    rows: Vec<LinearRow>,
    facts: AssumptionSet,
    choices: VecDeque<(usize, usize)>,
}

impl Node {
    /// Move variable-free rows into the facts. Returns false on contradiction.
    fn settle(&mut self) -> bool {
        let mut ok = true;
        let facts = &mut self.facts;
        self.rows.retain(|row| {
            if row.has_unknowns() {
                return true;
            }
            ok &= facts.add(Assumption::new(row.constant.clone(), row.kind.required_sign()));
            false
        });
        ok
    }

    fn plan_choices(&mut self) {
        let unknowns = self.rows.first().map_or(0, |row| row.coeffs.len());
        self.choices = (0..unknowns)
            .flat_map(|var| {
                self.rows
                    .iter()
                    .enumerate()
                    .filter(move |(_, row)| row.kind != RowKind::Strict && row.mentions(var))
                    .map(move |(r, _)| (var, r))
            })
            .collect();
    }

    fn is_terminal(&self) -> bool {
        self.rows.is_empty()
    }

    /// Make row `r` tight and eliminate `var` with it.
    fn eliminate(&self, var: usize, r: usize) -> Option<Node> {
        let pivot_row = &self.rows[r];
        let pivot = &pivot_row.coeffs[var];
        let mut facts = self.facts.clone();
        if !pivot.has_constant_numerator()
            && !facts.add(Assumption::from_polynomial(
                pivot.numerator().clone(),
                AssumptionType::NONZERO,
            ))
        {
            return None;
        }

        let mut rows = Vec::with_capacity(self.rows.len() - 1);
        for (i, row) in self.rows.iter().enumerate() {
            if i == r {
                continue;
            }
            let mut row = row.clone();
            if row.mentions(var) {
                let factor = row.coeffs[var].div(pivot)?;
                row.subtract_multiple(&factor, pivot_row);
                row.coeffs[var] = RationalFunction::zero();
            }
            rows.push(row);
        }

        let mut child = Node {
            rows,
            facts,
            choices: VecDeque::new(),
        };
        if !child.settle() {
            return None;
        }
        child.plan_choices();
        Some(child)
    }
}

/// Depth-first enumeration of candidate assumption sets for one matrix.
#[derive(Debug, Clone)]
pub struct WeispfenningSearch {
    stack: Vec<Node>,
    emitted: Vec<AssumptionSet>,
    max_candidates: usize,
    stats: WeispfenningStats,
}

impl WeispfenningSearch {
    /// Search over the first augmented column of `matrix`.
    pub fn new(matrix: &Matrix, max_candidates: usize) -> Self {
        Self::for_column(matrix, matrix.aug_start(), max_candidates)
    }

    /// Search over augmented column `aug_col` of `matrix`.
    ///
    /// A matrix without augmented columns is read with a zero right-hand side.
    pub fn for_column(matrix: &Matrix, aug_col: usize, max_candidates: usize) -> Self {
        Self::from_rows(Self::rows_of(matrix, aug_col), max_candidates)
    }

    /// Search over an explicit system.
    pub fn from_rows(rows: Vec<LinearRow>, max_candidates: usize) -> Self {
        let mut root = Node {
            rows,
            facts: AssumptionSet::new(),
            choices: VecDeque::new(),
        };
        let mut stats = WeispfenningStats::default();
        let stack = if root.settle() {
            root.plan_choices();
            vec![root]
        } else {
            stats.dead_ends += 1;
            Vec::new()
        };
        Self {
            stack,
            emitted: Vec::new(),
            max_candidates,
            stats,
        }
    }

    /// The linear system for one augmented column.
    pub fn rows_of(matrix: &Matrix, aug_col: usize) -> Vec<LinearRow> {
        let unknowns = matrix.aug_start();
        let rhs = |i: usize| {
            if aug_col < matrix.num_cols() {
                matrix.entry(i, aug_col).clone()
            } else {
                RationalFunction::zero()
            }
        };

        let mut rows: Vec<LinearRow> = (0..matrix.num_equations())
            .map(|i| LinearRow {
                coeffs: matrix.row(i)[..unknowns].to_vec(),
                constant: rhs(i).neg(),
                kind: RowKind::Equation,
            })
            .collect();
        rows.extend((0..unknowns).map(|k| LinearRow {
            coeffs: (0..unknowns)
                .map(|j| {
                    if j == k {
                        RationalFunction::one()
                    } else {
                        RationalFunction::zero()
                    }
                })
                .collect(),
            constant: RationalFunction::zero(),
            kind: RowKind::Weak,
        }));
        if let (Some(strictness), Some(i)) = (matrix.inequality(), matrix.inequality_row()) {
            rows.push(LinearRow {
                coeffs: matrix.row(i)[..unknowns].iter().map(RationalFunction::neg).collect(),
                constant: rhs(i),
                kind: match strictness {
                    Strictness::Weak => RowKind::Weak,
                    Strictness::Strict => RowKind::Strict,
                },
            });
        }
        rows
    }

    /// Search statistics.
    pub fn stats(&self) -> &WeispfenningStats {
        &self.stats
    }
}

impl Iterator for WeispfenningSearch {
    type Item = AssumptionSet;

    fn next(&mut self) -> Option<AssumptionSet> {
        loop {
            if self.emitted.len() >= self.max_candidates {
                return None;
            }
            let node = self.stack.last_mut()?;

            if node.is_terminal() {
                let facts = std::mem::take(&mut node.facts);
                self.stack.pop();
                if facts.is_false() {
                    self.stats.dead_ends += 1;
                    continue;
                }
                if self.emitted.contains(&facts) {
                    continue;
                }
                self.stats.candidates += 1;
                trace!(candidate = %facts, "weispfenning candidate");
                self.emitted.push(facts.clone());
                return Some(facts);
            }

            match node.choices.pop_front() {
                None => {
                    self.stack.pop();
                    self.stats.dead_ends += 1;
                }
                Some((var, row)) => {
                    self.stats.eliminations += 1;
                    match node.eliminate(var, row) {
                        Some(child) => self.stack.push(child),
                        None => self.stats.dead_ends += 1,
                    }
                }
            }
        }
    }
}
