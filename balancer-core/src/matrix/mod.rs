//! Augmented matrices over parametric rational functions.
//!
//! A [`Matrix`] encodes one Farkas implication. Its columns split into the
//! unknowns (`y_k >= 0`, columns `0..aug_start`) and an augmentation block
//! holding right-hand sides. Every row is an equation `Σ m_k·y_k = aug`,
//! except for an optional trailing inequality row `Σ e_k·y_k <= aug` (or `<`)
//! that is never used as a pivot row but is cleared by every pivot.
//!
//! Elimination lives in [`rref`].

pub mod rref;

pub use rref::{PivotCandidate, PivotKind, RrefStats};

use crate::assumption::{Assumption, AssumptionSet, AssumptionType};
use balancer_math::{RationalFunction, Substitution, Variable};
use std::fmt;
use thiserror::Error;

/// Malformed matrix input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// Rows of different length.
    #[error("row {row} has {found} entries, expected {expected}")]
    Ragged {
        /// Offending row.
        row: usize,
        /// Its length.
        found: usize,
        /// Length of the first row.
        expected: usize,
    },
    /// More augmented columns than columns.
    #[error("{aug} augmented columns requested but the matrix has {cols} columns")]
    Augmentation {
        /// Requested augmentation width.
        aug: usize,
        /// Total columns.
        cols: usize,
    },
    /// Augmenting with a matrix of different height.
    #[error("cannot augment a {left_rows}-row matrix with a {right_rows}-row matrix")]
    Height {
        /// Rows on the left.
        left_rows: usize,
        /// Rows on the right.
        right_rows: usize,
    },
    /// Stacking matrices of different shape.
    #[error("cannot combine a {left_cols}-column matrix with a {right_cols}-column matrix")]
    Mismatch {
        /// Columns on the left.
        left_cols: usize,
        /// Columns on the right.
        right_cols: usize,
    },
}

/// Whether a trailing inequality row is weak (`<=`) or strict (`<`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strictness {
    /// `Σ e_k·y_k <= aug`
    Weak,
    /// `Σ e_k·y_k < aug`
    Strict,
}

impl Strictness {
    /// The sign an almost-zero trailing row forces on its augmented entries.
    pub fn required_sign(self) -> AssumptionType {
        match self {
            Self::Weak => AssumptionType::NONNEGATIVE,
            Self::Strict => AssumptionType::POSITIVE,
        }
    }
}

/// An augmented matrix with parametric entries.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vec<RationalFunction>>,
    cols: usize,
    aug_start: usize,
    inequality: Option<Strictness>,
    /// Original index of each current column.
    column_origin: Vec<usize>,
    /// Pivot column of each pivot row; pivot `k` sits in row `k`.
    pivots: Vec<usize>,
    i0: usize,
    j0: usize,
    stats: RrefStats,
}

impl Matrix {
    /// Build a matrix whose last `aug_columns` columns form the augmentation.
    pub fn new(rows: Vec<Vec<RationalFunction>>, aug_columns: usize) -> Result<Self, ShapeError> {
        let cols = rows.first().map_or(aug_columns, Vec::len);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ShapeError::Ragged {
                    row: i,
                    found: row.len(),
                    expected: cols,
                });
            }
        }
        if aug_columns > cols {
            return Err(ShapeError::Augmentation {
                aug: aug_columns,
                cols,
            });
        }
        Ok(Self {
            rows,
            cols,
            aug_start: cols - aug_columns,
            inequality: None,
            column_origin: (0..cols).collect(),
            pivots: Vec::new(),
            i0: 0,
            j0: 0,
            stats: RrefStats::default(),
        })
    }

    /// Build from integer entries; handy for tests and benchmarks.
    pub fn from_integers(rows: &[&[i64]], aug_columns: usize) -> Result<Self, ShapeError> {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|&n| RationalFunction::from_integer(n)).collect())
                .collect(),
            aug_columns,
        )
    }

    /// Mark the last row as a trailing inequality row.
    #[must_use]
    pub fn with_inequality(mut self, strictness: Strictness) -> Self {
        if !self.rows.is_empty() {
            self.inequality = Some(strictness);
        }
        self
    }

    /// Number of rows, trailing row included.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, augmentation included.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// First augmented column (= number of unknowns).
    #[inline]
    pub fn aug_start(&self) -> usize {
        self.aug_start
    }

    /// Number of rows that are equations.
    #[inline]
    pub fn num_equations(&self) -> usize {
        self.rows.len() - usize::from(self.inequality.is_some())
    }

    /// Strictness of the trailing row, if there is one.
    #[inline]
    pub fn inequality(&self) -> Option<Strictness> {
        self.inequality
    }

    /// Index of the trailing inequality row.
    pub fn inequality_row(&self) -> Option<usize> {
        self.inequality.map(|_| self.rows.len() - 1)
    }

    /// Entry at `(i, j)`.
    #[inline]
    pub fn entry(&self, i: usize, j: usize) -> &RationalFunction {
        &self.rows[i][j]
    }

    /// Row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[RationalFunction] {
        &self.rows[i]
    }

    /// Pivot column of every pivot row, in row order.
    #[inline]
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// Number of pivots taken so far.
    #[inline]
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    /// Original index of current column `j`.
    pub fn column_origin(&self, j: usize) -> usize {
        self.column_origin[j]
    }

    /// Elimination statistics.
    pub fn stats(&self) -> &RrefStats {
        &self.stats
    }

    /// Append `other`'s columns as further augmented columns.
    pub fn augment(&mut self, other: &Matrix) -> Result<(), ShapeError> {
        if other.rows.len() != self.rows.len() {
            return Err(ShapeError::Height {
                left_rows: self.rows.len(),
                right_rows: other.rows.len(),
            });
        }
        for (row, extra) in self.rows.iter_mut().zip(&other.rows) {
            row.extend(extra.iter().cloned());
        }
        let first_new = self.cols;
        self.cols += other.cols;
        self.column_origin.extend(first_new..self.cols);
        Ok(())
    }

    /// Stack `other`'s rows below this matrix's equation rows.
    ///
    /// A trailing inequality row stays last; `other`'s own trailing row is dropped.
    pub fn concat(&mut self, other: &Matrix) -> Result<(), ShapeError> {
        if other.cols != self.cols || other.aug_start != self.aug_start {
            return Err(ShapeError::Mismatch {
                left_cols: self.cols,
                right_cols: other.cols,
            });
        }
        let at = self.num_equations();
        let extra = other.rows[..other.num_equations()].iter().cloned();
        self.rows.splice(at..at, extra);
        Ok(())
    }

    /// Apply a substitution to every entry.
    pub fn substitute(&mut self, sub: &Substitution) {
        for row in &mut self.rows {
            for entry in row.iter_mut() {
                *entry = sub.apply_rational(entry);
            }
        }
    }

    /// Parameters mentioned by any entry, sorted.
    pub fn parameters(&self) -> Vec<Variable> {
        let mut vars: Vec<Variable> = self
            .rows
            .iter()
            .flat_map(|row| row.iter().flat_map(RationalFunction::vars))
            .collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// Whether `f` is zero, either structurally or by what `known` says.
    pub(crate) fn vanishes(f: &RationalFunction, known: Option<&AssumptionSet>) -> bool {
        f.is_zero() || known.is_some_and(|set| set.is_known_zero(f))
    }

    /// Whether row `i` has nothing but zeros left of the augmentation.
    pub fn is_almost_zero_row(&self, i: usize, known: Option<&AssumptionSet>) -> bool {
        self.rows[i][..self.aug_start]
            .iter()
            .all(|entry| Self::vanishes(entry, known))
    }

    /// Necessary consequences of almost-zero rows.
    ///
    /// An almost-zero equation row forces its augmented entries to zero; an
    /// almost-zero trailing row forces them non-negative (positive if strict).
    pub fn almost_zero_facts(&self, known: Option<&AssumptionSet>) -> Vec<Assumption> {
        let mut facts = Vec::new();
        for i in 0..self.num_equations() {
            if self.is_almost_zero_row(i, known) {
                facts.extend(
                    self.rows[i][self.aug_start..]
                        .iter()
                        .map(|entry| Assumption::new(entry.clone(), AssumptionType::ZERO)),
                );
            }
        }
        if let (Some(strictness), Some(i)) = (self.inequality, self.inequality_row()) {
            if self.is_almost_zero_row(i, known) {
                facts.extend(
                    self.rows[i][self.aug_start..]
                        .iter()
                        .map(|entry| Assumption::new(entry.clone(), strictness.required_sign())),
                );
            }
        }
        facts.retain(|fact| !fact.is_trivial());
        facts
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trailing = self.inequality_row();
        for (i, row) in self.rows.iter().enumerate() {
            write!(f, "[")?;
            for (j, entry) in row.iter().enumerate() {
                if j == self.aug_start {
                    write!(f, " |")?;
                }
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{entry}")?;
            }
            write!(f, "]")?;
            if Some(i) == trailing {
                match self.inequality {
                    Some(Strictness::Strict) => write!(f, " <")?,
                    _ => write!(f, " <=")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balancer_math::Polynomial;

    #[test]
    fn test_shape_errors() {
        let ragged = Matrix::new(
            vec![
                vec![RationalFunction::one(), RationalFunction::one()],
                vec![RationalFunction::one()],
            ],
            1,
        );
        assert!(matches!(ragged, Err(ShapeError::Ragged { row: 1, .. })));
        assert!(matches!(
            Matrix::from_integers(&[&[1, 2]], 3),
            Err(ShapeError::Augmentation { .. })
        ));
    }

    #[test]
    fn test_augment_and_concat() {
        let mut m = Matrix::from_integers(&[&[1, 2], &[3, 4]], 0).expect("shape");
        let rhs = Matrix::from_integers(&[&[5], &[6]], 0).expect("shape");
        m.augment(&rhs).expect("same height");
        assert_eq!(m.num_cols(), 3);
        assert_eq!(m.aug_start(), 2);
        assert_eq!(m.entry(1, 2), &RationalFunction::from_integer(6));

        let mut top = Matrix::from_integers(&[&[1, 0, 1], &[0, 1, 1]], 1)
            .expect("shape")
            .with_inequality(Strictness::Weak);
        let bottom = Matrix::from_integers(&[&[2, 2, 2]], 1).expect("shape");
        top.concat(&bottom).expect("same width");
        assert_eq!(top.num_rows(), 3);
        assert_eq!(top.inequality_row(), Some(2));
        assert_eq!(top.entry(1, 0), &RationalFunction::from_integer(2));
    }

    #[test]
    fn test_almost_zero_facts() {
        let p = RationalFunction::from_var(Variable::new("p"));
        let q = RationalFunction::from_var(Variable::new("q"));
        let zero = RationalFunction::zero();
        let m = Matrix::new(
            vec![
                vec![RationalFunction::one(), p.clone()],
                vec![zero.clone(), q.clone()],
                vec![zero, p.neg()],
            ],
            1,
        )
        .expect("shape")
        .with_inequality(Strictness::Strict);

        let facts = m.almost_zero_facts(None);
        assert_eq!(
            facts,
            vec![
                Assumption::new(q, AssumptionType::ZERO),
                Assumption::new(p, AssumptionType::NEGATIVE),
            ]
        );
    }

    #[test]
    fn test_substitute_entries() {
        let p = Variable::new("p");
        let mut m = Matrix::new(
            vec![vec![RationalFunction::from_var(p), RationalFunction::one()]],
            1,
        )
        .expect("shape");
        m.substitute(&Substitution::new(p, Polynomial::from_integer(0)));
        assert!(m.is_almost_zero_row(0, None));
        assert_eq!(m.parameters(), Vec::<Variable>::new());
    }
}
