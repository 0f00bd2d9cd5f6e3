//! Feasibility analysis of a reduced matrix.
//!
//! After elimination every pivot unknown is expressed through the free ones:
//! `y_k = aug_k - Σ m_kj·y_j`. The matrix is feasible if the free unknowns can
//! be chosen non-negative so that every pivot unknown is non-negative too.
//! This module does not solve that problem exactly. It classifies each free
//! column's contribution `-m_kj` to each row and derives, row by row, either
//! that the row is harmless, that it can be repaired by raising one free
//! column, that its augmented entries must satisfy a sign condition, or that
//! the matrix is infeasible. A row that only a parametric column could
//! repair yields a candidate assumption instead: the caller may branch on
//! the contribution being positive.
//!
//! A trailing inequality row that is not almost zero takes part as one more
//! row with an implicit slack unknown; a strict row needs a positive slack.

use crate::assumption::{Assumption, AssumptionSet, AssumptionType};
use crate::error::{BacktrackSignal, SearchResult};
use crate::matrix::Matrix;
use balancer_math::RationalFunction;

/// Sign class of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryCode {
    /// Zero.
    Zero,
    /// Known positive.
    PositiveConstant,
    /// Sign unknown.
    Variable,
    /// Known negative.
    NegativeConstant,
}

impl EntryCode {
    /// Classify `f`, using `known` to sharpen parametric entries.
    pub fn of(f: &RationalFunction, known: Option<&AssumptionSet>) -> Self {
        if Matrix::vanishes(f, known) {
            return Self::Zero;
        }
        let kind = known_sign(f, known);
        if kind.implies(AssumptionType::POSITIVE) {
            Self::PositiveConstant
        } else if kind.implies(AssumptionType::NEGATIVE) {
            Self::NegativeConstant
        } else {
            Self::Variable
        }
    }

    /// The code of the negated entry.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::PositiveConstant => Self::NegativeConstant,
            Self::NegativeConstant => Self::PositiveConstant,
            other => other,
        }
    }
}

/// The strongest sign fact about `f`; constants are answered exactly.
fn known_sign(f: &RationalFunction, known: Option<&AssumptionSet>) -> AssumptionType {
    match known {
        Some(set) => set.query(f),
        None if f.is_zero() => AssumptionType::ZERO,
        None if f.is_positive() => AssumptionType::POSITIVE,
        None if f.is_negative() => AssumptionType::NEGATIVE,
        None => AssumptionType::TRUE,
    }
}

/// How freely a free column may be raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnStatus {
    /// Raising it never lowers any row.
    AbsolutelyUnblocked,
    /// Raising it lowers some rows by known amounts.
    ConditionallyUnblocked,
    /// Some row depends on it with unknown sign.
    Blocked,
}

/// Which free columns could repair which rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTable {
    columns: Vec<usize>,
    rows: Vec<(usize, Vec<bool>)>,
}

impl OptionTable {
    /// A table over the given free columns.
    pub fn new(columns: Vec<usize>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Record which columns are viable for `row`.
    pub fn add_row(&mut self, row: usize, viable: Vec<bool>) {
        self.rows.push((row, viable));
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no row needed an option.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Viable columns for `row`, in column order.
    pub fn viable_columns(&self, row: usize) -> Vec<usize> {
        self.rows
            .iter()
            .find(|(r, _)| *r == row)
            .map(|(_, viable)| {
                viable
                    .iter()
                    .zip(&self.columns)
                    .filter_map(|(ok, &col)| ok.then_some(col))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pick a column for every row: the first viable one, if any.
    ///
    /// Rows with several viable columns are resolved greedily; combinations
    /// are not searched.
    pub fn resolve(&self) -> Vec<(usize, Option<usize>)> {
        self.rows
            .iter()
            .map(|(row, _)| {
                let viable = self.viable_columns(*row);
                if viable.len() > 1 {
                    tracing::trace!(row, options = viable.len(), "greedy column choice");
                }
                (*row, viable.first().copied())
            })
            .collect()
    }
}

/// Result of pivot-row analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotRowReport {
    /// Necessary sign conditions on augmented entries.
    pub facts: Vec<Assumption>,
    /// Rows found harmless.
    pub discarded: Vec<usize>,
    /// Rows repaired by raising a free column, as `(row, column)`.
    pub resolved: Vec<(usize, usize)>,
    /// The second-pass option table.
    pub options: OptionTable,
    /// Positivity of a parametric contribution that would repair a row.
    /// Not necessary; a caller that commits one must also try its negation.
    pub candidates: Vec<Assumption>,
}

#[derive(Debug)]
struct AnalysedRow {
    index: usize,
    required: AssumptionType,
    contributions: Vec<EntryCode>,
    /// `-m_kj` per free column.
    terms: Vec<RationalFunction>,
    aug: Vec<RationalFunction>,
}

/// Sign state of one augmented entry relative to what its row requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AugState {
    Satisfied,
    Violated,
    Open,
}

/// Analyses the pivot rows of a reduced matrix.
pub struct PivotRowHandler<'a> {
    known: Option<&'a AssumptionSet>,
    free_columns: Vec<usize>,
    rows: Vec<AnalysedRow>,
    status: Vec<ColumnStatus>,
}

impl<'a> PivotRowHandler<'a> {
    /// Prepare the analysis of `matrix`.
    pub fn new(matrix: &'a Matrix, known: Option<&'a AssumptionSet>) -> Self {
        let free_columns: Vec<usize> = matrix.free_columns().collect();
        let analysed = |i: usize, required: AssumptionType| AnalysedRow {
            index: i,
            required,
            contributions: free_columns
                .iter()
                .map(|&j| EntryCode::of(matrix.entry(i, j), known).flip())
                .collect(),
            terms: free_columns.iter().map(|&j| matrix.entry(i, j).neg()).collect(),
            aug: matrix.row(i)[matrix.aug_start()..].to_vec(),
        };

        let mut rows: Vec<AnalysedRow> = (0..matrix.rank())
            .map(|i| analysed(i, AssumptionType::NONNEGATIVE))
            .collect();
        if let (Some(strictness), Some(i)) = (matrix.inequality(), matrix.inequality_row()) {
            if !matrix.is_almost_zero_row(i, known) {
                rows.push(analysed(i, strictness.required_sign()));
            }
        }

        let status = (0..free_columns.len())
            .map(|c| {
                let codes = rows.iter().map(|row| row.contributions[c]);
                let mut status = ColumnStatus::AbsolutelyUnblocked;
                for code in codes {
                    match code {
                        EntryCode::Variable => return ColumnStatus::Blocked,
                        EntryCode::NegativeConstant => status = ColumnStatus::ConditionallyUnblocked,
                        _ => {}
                    }
                }
                status
            })
            .collect();

        Self {
            known,
            free_columns,
            rows,
            status,
        }
    }

    /// Status of the `c`-th free column.
    pub fn column_status(&self, c: usize) -> ColumnStatus {
        self.status[c]
    }

    fn aug_state(&self, f: &RationalFunction, required: AssumptionType) -> AugState {
        let kind = known_sign(f, self.known);
        if kind.implies(required) {
            AugState::Satisfied
        } else if kind.conjoin(required).is_false() {
            AugState::Violated
        } else {
            AugState::Open
        }
    }

    /// Free columns whose contribution to `row` has unknown sign but may be
    /// positive.
    fn parametric_raisers(&self, row: &AnalysedRow) -> Vec<usize> {
        row.contributions
            .iter()
            .zip(&row.terms)
            .enumerate()
            .filter(|(_, (code, term))| {
                **code == EntryCode::Variable
                    && !known_sign(term, self.known).implies(AssumptionType::NONPOSITIVE)
            })
            .map(|(c, _)| c)
            .collect()
    }

    fn require(&self, row: &AnalysedRow, report: &mut PivotRowReport) -> SearchResult<()> {
        for f in &row.aug {
            match self.aug_state(f, row.required) {
                AugState::Satisfied => {}
                AugState::Violated => return Err(BacktrackSignal::Infeasible { row: row.index }),
                AugState::Open => report.facts.push(Assumption::new(f.clone(), row.required)),
            }
        }
        Ok(())
    }

    /// Run both passes.
    ///
    /// Fails with [`BacktrackSignal::Infeasible`] if some row has a violated
    /// augmented entry that no free column can repair.
    pub fn analyse(&self) -> SearchResult<PivotRowReport> {
        let mut report = PivotRowReport {
            options: OptionTable::new(self.free_columns.clone()),
            ..PivotRowReport::default()
        };
        let mut second_pass = Vec::new();

        for row in &self.rows {
            let states: Vec<AugState> = row
                .aug
                .iter()
                .map(|f| self.aug_state(f, row.required))
                .collect();
            if states.iter().all(|s| *s == AugState::Satisfied) {
                report.discarded.push(row.index);
                continue;
            }
            let violated = states.contains(&AugState::Violated);
            let absorbed = row
                .contributions
                .iter()
                .zip(&self.status)
                .any(|(code, status)| {
                    *code == EntryCode::PositiveConstant
                        && *status == ColumnStatus::AbsolutelyUnblocked
                });
            if violated && absorbed {
                report.discarded.push(row.index);
                continue;
            }
            let raising = row.contributions.contains(&EntryCode::PositiveConstant);
            if !raising && self.parametric_raisers(row).is_empty() {
                self.require(row, &mut report)?;
                continue;
            }
            second_pass.push(row);
        }

        for row in &second_pass {
            let viable = row
                .contributions
                .iter()
                .zip(&self.status)
                .map(|(code, status)| {
                    *code == EntryCode::PositiveConstant && *status != ColumnStatus::Blocked
                })
                .collect();
            report.options.add_row(row.index, viable);
        }
        for (row, choice) in report.options.resolve() {
            match choice {
                Some(col) => report.resolved.push((row, col)),
                None => {
                    let Some(analysed) = second_pass.iter().find(|r| r.index == row) else {
                        continue;
                    };
                    match self.parametric_raisers(analysed).first() {
                        Some(&c) => report.candidates.push(Assumption::new(
                            analysed.terms[c].clone(),
                            AssumptionType::POSITIVE,
                        )),
                        None => self.require(analysed, &mut report)?,
                    }
                }
            }
        }

        Ok(report)
    }

    /// Sign conditions under which every free unknown may stay at zero:
    /// each row's augmented entries must meet the row's sign on their own.
    ///
    /// Sufficient for feasibility, not necessary. Used when the full
    /// analysis is switched off.
    pub fn basic_solution_facts(&self) -> SearchResult<Vec<Assumption>> {
        let mut report = PivotRowReport::default();
        for row in &self.rows {
            self.require(row, &mut report)?;
        }
        Ok(report.facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Strictness;
    use balancer_math::Variable;

    fn int(n: i64) -> RationalFunction {
        RationalFunction::from_integer(n)
    }

    fn var(name: &str) -> RationalFunction {
        RationalFunction::from_var(Variable::new(name))
    }

    fn reduced(rows: Vec<Vec<RationalFunction>>, aug: usize) -> Matrix {
        let mut m = Matrix::new(rows, aug).expect("shape");
        m.put_in_rref();
        m
    }

    #[test]
    fn test_nonnegative_constants_are_discarded() {
        let m = reduced(vec![vec![int(1), int(1), int(2)]], 1);
        let report = PivotRowHandler::new(&m, None).analyse().expect("feasible");
        assert_eq!(report.discarded, vec![0]);
        assert!(report.facts.is_empty());
    }

    #[test]
    fn test_negative_constant_absorbed_by_free_column() {
        // y0 = -2 + y1
        let m = reduced(vec![vec![int(1), int(-1), int(-2)]], 1);
        let handler = PivotRowHandler::new(&m, None);
        assert_eq!(handler.column_status(0), ColumnStatus::AbsolutelyUnblocked);
        let report = handler.analyse().expect("feasible");
        assert_eq!(report.discarded, vec![0]);
    }

    #[test]
    fn test_unrepairable_row_is_infeasible() {
        // y0 = -1 - y1
        let m = reduced(vec![vec![int(1), int(1), int(-1)]], 1);
        assert_eq!(
            PivotRowHandler::new(&m, None).analyse(),
            Err(BacktrackSignal::Infeasible { row: 0 })
        );
    }

    #[test]
    fn test_parametric_aug_must_be_nonnegative() {
        // y0 = p
        let m = reduced(vec![vec![int(1), var("p")]], 1);
        let report = PivotRowHandler::new(&m, None).analyse().expect("feasible");
        assert_eq!(
            report.facts,
            vec![Assumption::new(var("p"), AssumptionType::NONNEGATIVE)]
        );
    }

    #[test]
    fn test_known_sign_satisfies_row() {
        let m = reduced(vec![vec![int(1), var("p")]], 1);
        let mut known = AssumptionSet::new();
        known.add(Assumption::new(var("p"), AssumptionType::POSITIVE));
        let report = PivotRowHandler::new(&m, Some(&known)).analyse().expect("feasible");
        assert!(report.facts.is_empty());
        assert_eq!(report.discarded, vec![0]);

        let mut known = AssumptionSet::new();
        known.add(Assumption::new(var("p"), AssumptionType::NEGATIVE));
        assert!(PivotRowHandler::new(&m, Some(&known)).analyse().is_err());
    }

    #[test]
    fn test_strict_trailing_row_requires_positive() {
        // y0 = 1, y1 < p
        let mut m = Matrix::new(
            vec![vec![int(1), int(0), int(1)], vec![int(0), int(1), var("p")]],
            1,
        )
        .expect("shape")
        .with_inequality(Strictness::Strict);
        m.put_in_rref();
        let handler = PivotRowHandler::new(&m, None);
        assert_eq!(handler.column_status(0), ColumnStatus::ConditionallyUnblocked);
        let report = handler.analyse().expect("feasible");
        assert_eq!(report.discarded, vec![0]);
        assert_eq!(
            report.facts,
            vec![Assumption::new(var("p"), AssumptionType::POSITIVE)]
        );
    }

    #[test]
    fn test_several_viable_columns_pick_the_first() {
        // y0 = -1 + y2 + y3, y1 = 5 - y2 - y3
        let m = reduced(
            vec![
                vec![int(1), int(0), int(-1), int(-1), int(-1)],
                vec![int(0), int(1), int(1), int(1), int(5)],
            ],
            1,
        );
        let report = PivotRowHandler::new(&m, None).analyse().expect("feasible");
        assert_eq!(report.discarded, vec![1]);
        assert_eq!(report.options.viable_columns(0), vec![2, 3]);
        assert_eq!(report.resolved, vec![(0, 2)]);
        assert!(report.facts.is_empty());
    }

    #[test]
    fn test_parametric_column_opens_a_candidate() {
        // y0 = -1 + p*y1, feasible whenever p > 0
        let m = reduced(vec![vec![int(1), var("p").neg(), int(-1)]], 1);
        let report = PivotRowHandler::new(&m, None).analyse().expect("not decided yet");
        assert!(report.facts.is_empty());
        assert_eq!(
            report.candidates,
            vec![Assumption::new(var("p"), AssumptionType::POSITIVE)]
        );

        let mut known = AssumptionSet::new();
        known.add(Assumption::new(var("p"), AssumptionType::POSITIVE));
        let report = PivotRowHandler::new(&m, Some(&known)).analyse().expect("feasible");
        assert_eq!(report.discarded, vec![0]);
        assert!(report.candidates.is_empty());

        let mut known = AssumptionSet::new();
        known.add(Assumption::new(var("p"), AssumptionType::NONPOSITIVE));
        assert_eq!(
            PivotRowHandler::new(&m, Some(&known)).analyse(),
            Err(BacktrackSignal::Infeasible { row: 0 })
        );
    }

    #[test]
    fn test_basic_solution_facts() {
        // y0 = p - y1: with y1 = 0 only p >= 0 is needed
        let m = reduced(vec![vec![int(1), int(1), var("p")]], 1);
        assert_eq!(
            PivotRowHandler::new(&m, None).basic_solution_facts(),
            Ok(vec![Assumption::new(var("p"), AssumptionType::NONNEGATIVE)])
        );

        // y0 = -1 + p*y1 is not feasible at y1 = 0
        let m = reduced(vec![vec![int(1), var("p").neg(), int(-1)]], 1);
        assert_eq!(
            PivotRowHandler::new(&m, None).basic_solution_facts(),
            Err(BacktrackSignal::Infeasible { row: 0 })
        );
    }
}
