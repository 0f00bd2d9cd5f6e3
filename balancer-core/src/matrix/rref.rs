//! Parametric Gauss-Jordan elimination.
//!
//! Pivots are chosen by free pivoting over the not yet reduced submatrix:
//! constant entries first, then entries with a constant numerator, then
//! fully parametric entries; within a kind the smaller height wins, then a
//! positive entry, then the earlier position. Taking a pivot whose numerator
//! is not constant is only sound if that numerator is non-zero, so each such
//! pivot yields the fact `numerator <> 0`.
//!
//! The search position `(i0, j0)` persists on the matrix, so a halted
//! elimination can be resumed later by any of the three drivers:
//! [`Matrix::put_in_rref`], [`Matrix::put_in_rref_halting`], or a caller
//! that picks among [`Matrix::pivot_candidates`] itself and calls
//! [`Matrix::apply_pivot`].

use super::Matrix;
use crate::assumption::{Assumption, AssumptionSet, AssumptionType};
use balancer_math::{BigInt, RationalFunction};
use num_traits::Signed;
use std::cmp::Ordering;

/// Statistics for elimination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RrefStats {
    /// Pivots taken.
    pub pivots: u64,
    /// Row operations `row_i -= f * pivot_row`.
    pub row_operations: u64,
    /// Row and column swaps.
    pub swaps: u64,
    /// Pivots that required a non-zero fact.
    pub nonzero_facts: u64,
}

/// Preference class of a pivot entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PivotKind {
    /// A non-zero rational constant.
    Constant,
    /// Constant numerator over a parametric denominator.
    ConstantNumerator,
    /// Parametric numerator.
    Variable,
}

/// A possible pivot of the unreduced submatrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotCandidate {
    /// Row of the entry.
    pub row: usize,
    /// Column of the entry.
    pub col: usize,
    /// The entry itself.
    pub entry: RationalFunction,
    /// Preference class.
    pub kind: PivotKind,
    /// Size measure; smaller is preferred.
    pub height: BigInt,
    /// Whether the entry is (or leads with) a positive value.
    pub positive: bool,
}

impl PivotCandidate {
    fn classify(row: usize, col: usize, entry: &RationalFunction) -> Self {
        let (kind, height, positive) = if let Some(c) = entry.constant_value() {
            let height = c.numer().abs().max(c.denom().abs());
            (PivotKind::Constant, height, c.is_positive())
        } else if let Some(n) = entry.numerator().constant_value() {
            let height = n.numer().abs().max(n.denom().abs());
            (PivotKind::ConstantNumerator, height, n.is_positive())
        } else {
            (
                PivotKind::Variable,
                BigInt::from(entry.num_terms()),
                entry.numerator().leading_coeff().is_positive(),
            )
        };
        Self {
            row,
            col,
            entry: entry.clone(),
            kind,
            height,
            positive,
        }
    }

    /// Ranking order; `Less` is the better pivot.
    pub fn cmp_rank(&self, other: &PivotCandidate) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.height.cmp(&other.height))
            .then_with(|| other.positive.cmp(&self.positive))
            .then_with(|| (self.row, self.col).cmp(&(other.row, other.col)))
    }

    /// The fact this pivot relies on, if any.
    pub fn nonzero_fact(&self) -> Option<Assumption> {
        nonzero_fact(&self.entry)
    }

    /// Whether taking this pivot needs no assumption.
    pub fn is_free(&self) -> bool {
        self.kind != PivotKind::Variable
    }
}

fn nonzero_fact(entry: &RationalFunction) -> Option<Assumption> {
    if entry.has_constant_numerator() {
        return None;
    }
    Some(Assumption::from_polynomial(
        entry.numerator().clone(),
        AssumptionType::NONZERO,
    ))
}

impl Matrix {
    /// Current search position `(i0, j0)`.
    #[inline]
    pub fn search_position(&self) -> (usize, usize) {
        (self.i0, self.j0)
    }

    /// The non-augmented columns without a pivot.
    pub fn free_columns(&self) -> std::ops::Range<usize> {
        self.j0..self.aug_start
    }

    /// All non-vanishing entries of the unreduced submatrix, best first.
    ///
    /// Entries that `known` proves zero are skipped.
    pub fn pivot_candidates(&self, known: Option<&AssumptionSet>) -> Vec<PivotCandidate> {
        let mut candidates = Vec::new();
        for i in self.i0..self.num_equations() {
            for j in self.j0..self.aug_start {
                let entry = &self.rows[i][j];
                if !Self::vanishes(entry, known) {
                    candidates.push(PivotCandidate::classify(i, j, entry));
                }
            }
        }
        candidates.sort_by(PivotCandidate::cmp_rank);
        candidates
    }

    /// Whether no pivot candidate is left.
    pub fn is_reduced(&self, known: Option<&AssumptionSet>) -> bool {
        self.pivot_candidates(known).is_empty()
    }

    /// Take a pivot: swap it to `(i0, j0)`, scale its row to a unit pivot
    /// and clear the column in every other row, trailing row included.
    ///
    /// Returns the non-zero fact the pivot relies on. A candidate that is
    /// stale (outside the unreduced submatrix, or now zero) is ignored.
    pub fn apply_pivot(&mut self, candidate: &PivotCandidate) -> Option<Assumption> {
        let (i0, j0) = (self.i0, self.j0);
        let (row, col) = (candidate.row, candidate.col);
        if row < i0 || row >= self.num_equations() || col < j0 || col >= self.aug_start {
            return None;
        }
        let inverse = self.rows[row][col].inverse()?;

        if row != i0 {
            self.rows.swap(row, i0);
            self.stats.swaps += 1;
        }
        if col != j0 {
            for r in &mut self.rows {
                r.swap(col, j0);
            }
            self.column_origin.swap(col, j0);
            self.stats.swaps += 1;
        }

        let fact = nonzero_fact(&self.rows[i0][j0]);

        if !inverse.is_unity() {
            for entry in self.rows[i0].iter_mut() {
                if !entry.is_zero() {
                    *entry = entry.mul(&inverse);
                }
            }
        }
        self.rows[i0][j0] = RationalFunction::one();

        let pivot_row = self.rows[i0].clone();
        let mut operations = 0;
        for (r, target) in self.rows.iter_mut().enumerate() {
            if r == i0 || target[j0].is_zero() {
                continue;
            }
            let factor = target[j0].clone();
            for (entry, p) in target.iter_mut().zip(&pivot_row) {
                if !p.is_zero() {
                    *entry = entry.sub(&factor.mul(p));
                }
            }
            target[j0] = RationalFunction::zero();
            operations += 1;
        }

        self.pivots.push(j0);
        self.i0 += 1;
        self.j0 += 1;
        self.stats.pivots += 1;
        self.stats.row_operations += operations;
        if fact.is_some() {
            self.stats.nonzero_facts += 1;
        }
        tracing::trace!(
            row = i0,
            col = self.column_origin[j0],
            kind = ?candidate.kind,
            "pivot"
        );
        fact
    }

    /// Eliminate to completion, always taking the best-ranked pivot.
    ///
    /// Returns the non-zero facts the chosen pivots rely on.
    pub fn put_in_rref(&mut self) -> AssumptionSet {
        let mut facts = AssumptionSet::new();
        while let Some(best) = self.pivot_candidates(None).into_iter().next() {
            if let Some(fact) = self.apply_pivot(&best) {
                facts.add(fact);
            }
        }
        facts
    }

    /// Eliminate with free pivots only.
    ///
    /// Stops as soon as every remaining candidate has a parametric numerator;
    /// the position is kept so elimination can resume. Returns true if the
    /// matrix is fully reduced.
    pub fn put_in_rref_halting(&mut self) -> bool {
        loop {
            match self.pivot_candidates(None).into_iter().next() {
                None => return true,
                Some(best) if !best.is_free() => return false,
                Some(best) => {
                    self.apply_pivot(&best);
                }
            }
        }
    }
}
