//! Backtracking search over non-zero choices.
//!
//! The [`AssumptionManager`] owns a queue of matrices and reduces them one by
//! one. Whenever only parametric pivots remain it has to assume some
//! numerator non-zero; such an assumption is *speculative*: a [`Frame`]
//! snapshot of the search state tagged with the negated assumption is pushed
//! first, and [`AssumptionManager::next_branch`] later restores the snapshot
//! and commits the negation instead. Consequences derived from the matrices
//! (almost-zero rows, pivot-row facts, negations on backtrack) are
//! *necessary* and never open a choice point. A pivot row that only a
//! parametric column can repair is the exception: its contribution is
//! assumed positive speculatively, and the negation leaves the row to its
//! own sign condition.
//!
//! Zero facts whose numerator has a linear variable turn into substitutions
//! that eliminate the variable from the assumption set and every matrix.

pub mod stack;
pub mod substitution;

pub use stack::{AssumptionStack, Frame};
pub use substitution::SubstitutionManager;

use crate::assumption::{Assumption, AssumptionRelation, AssumptionSet, AssumptionType};
use crate::config::BalancerConfig;
use crate::error::{BacktrackSignal, SearchResult};
use crate::matrix::{Matrix, PivotCandidate};
use crate::pivot_rows::PivotRowHandler;
use std::sync::Arc;
use tracing::{debug, trace};

/// Statistics for the backtracking search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerStats {
    /// Speculative assumptions committed.
    pub frames_pushed: u64,
    /// Frames popped by `next_branch`.
    pub backtracks: u64,
    /// Variables eliminated by zero facts.
    pub substitutions: u64,
    /// Matrices fully processed.
    pub matrices_processed: u64,
}

/// Drives elimination of a matrix queue with chronological backtracking.
#[derive(Debug, Clone)]
pub struct AssumptionManager {
    set: AssumptionSet,
    queue: im::Vector<Arc<Matrix>>,
    current: Option<Arc<Matrix>>,
    substitutions: SubstitutionManager,
    stack: AssumptionStack,
    pivot_row_analysis: bool,
    max_backtracks: u64,
    stats: ManagerStats,
}

impl Default for AssumptionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AssumptionManager {
    /// Create a manager with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&BalancerConfig::default())
    }

    /// Create a manager honouring `pivot_row_analysis` and `max_backtracks`.
    pub fn with_config(config: &BalancerConfig) -> Self {
        Self {
            set: AssumptionSet::new(),
            queue: im::Vector::new(),
            current: None,
            substitutions: SubstitutionManager::new(),
            stack: AssumptionStack::new(),
            pivot_row_analysis: config.pivot_row_analysis,
            max_backtracks: config.max_backtracks,
            stats: ManagerStats::default(),
        }
    }

    /// Queue a matrix after taking all of its free pivots.
    pub fn add_matrix(&mut self, mut matrix: Matrix) {
        self.substitutions.apply_matrix(&mut matrix);
        matrix.put_in_rref_halting();
        self.queue.push_back(Arc::new(matrix));
    }

    /// The assumptions committed on the current branch.
    pub fn assumptions(&self) -> &AssumptionSet {
        &self.set
    }

    /// The eliminations made on the current branch.
    pub fn substitutions(&self) -> &SubstitutionManager {
        &self.substitutions
    }

    /// The matrix being reduced, if any.
    pub fn current_matrix(&self) -> Option<&Matrix> {
        self.current.as_deref()
    }

    /// Matrices waiting to be reduced.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of open choice points.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Search statistics.
    pub fn stats(&self) -> &ManagerStats {
        &self.stats
    }

    fn snapshot(&self, negation: Assumption) -> Frame {
        Frame {
            set: self.set.clone(),
            queue: self.queue.clone(),
            current: self.current.clone(),
            substitutions: self.substitutions.clone(),
            negation,
        }
    }

    fn restore(&mut self, frame: Frame) -> Assumption {
        self.set = frame.set;
        self.queue = frame.queue;
        self.current = frame.current;
        self.substitutions = frame.substitutions;
        frame.negation
    }

    /// Commit an assumption that may later turn out to be unnecessary.
    ///
    /// Contradicting assumptions fail right away and implied ones are
    /// ignored; anything else opens a choice point whose alternative is the
    /// negation.
    pub fn add_possibly_unnecessary_assumption(&mut self, assumption: Assumption) -> SearchResult<()> {
        let assumption = self.substitutions.apply_assumption(&assumption);
        match self.set.match_against(&assumption) {
            AssumptionRelation::Contradicts => {
                Err(BacktrackSignal::Contradiction(assumption.to_string()))
            }
            relation if relation.is_implied() => Ok(()),
            _ => {
                trace!(%assumption, depth = self.stack.depth(), "speculating");
                let frame = self.snapshot(assumption.negate());
                self.stack.push(frame);
                self.stats.frames_pushed += 1;
                self.commit(assumption)
            }
        }
    }

    /// Commit an assumption unconditionally.
    pub fn add_necessary_assumption(&mut self, assumption: Assumption) -> SearchResult<()> {
        let assumption = self.substitutions.apply_assumption(&assumption);
        self.commit(assumption)
    }

    /// Commit several assumptions unconditionally.
    pub fn add_necessary_assumptions(
        &mut self,
        assumptions: impl IntoIterator<Item = Assumption>,
    ) -> SearchResult<()> {
        for assumption in assumptions {
            self.add_necessary_assumption(assumption)?;
        }
        Ok(())
    }

    fn commit(&mut self, assumption: Assumption) -> SearchResult<()> {
        trace!(%assumption, "assuming");
        if !self.set.add(assumption.clone()) {
            return Err(BacktrackSignal::Contradiction(assumption.to_string()));
        }
        self.propagate_zeros()
    }

    /// Turn zero facts into eliminations until none is left.
    fn propagate_zeros(&mut self) -> SearchResult<()> {
        loop {
            let Some(sub) = self
                .set
                .iter()
                .filter(|a| a.kind() == AssumptionType::ZERO)
                .find_map(|a| a.function().numerator().linear_isolate_first())
            else {
                return Ok(());
            };
            let Some(closed) = self.substitutions.push(sub) else {
                return Ok(());
            };
            trace!(substitution = %closed, "eliminating");
            self.stats.substitutions += 1;
            if !self.set.substitute(&closed) {
                return Err(BacktrackSignal::Contradiction(format!(
                    "{closed} contradicts the assumptions"
                )));
            }
            if let Some(current) = &mut self.current {
                Arc::make_mut(current).substitute(&closed);
            }
        }
    }

    /// Return to the most recent choice point and take its other branch.
    ///
    /// Returns false once no choice point is left (or the backtrack budget is
    /// spent).
    pub fn next_branch(&mut self) -> bool {
        while let Some(frame) = self.stack.pop() {
            if self.max_backtracks != 0 && self.stats.backtracks >= self.max_backtracks {
                debug!(limit = self.max_backtracks, "backtrack budget exhausted");
                self.stack.clear();
                return false;
            }
            self.stats.backtracks += 1;
            let negation = self.restore(frame);
            debug!(%negation, depth = self.stack.depth(), "backtracking");
            match self.add_necessary_assumption(negation) {
                Ok(()) => return true,
                Err(signal) => trace!(%signal, "negation failed"),
            }
        }
        false
    }

    /// Choose among `candidates` (best first) the pivot to take.
    ///
    /// Free pivots are taken as they are. Otherwise a pivot whose non-zero
    /// fact is already implied wins; failing that, the first one whose fact
    /// is consistent is taken speculatively.
    pub fn get_next_var_num_pivot(&mut self, candidates: &[PivotCandidate]) -> SearchResult<usize> {
        let mut fresh = None;
        for (i, candidate) in candidates.iter().enumerate() {
            let Some(fact) = candidate.nonzero_fact() else {
                return Ok(i);
            };
            match self.set.match_against(&fact) {
                relation if relation.is_implied() => return Ok(i),
                AssumptionRelation::Contradicts => {}
                _ => {
                    if fresh.is_none() {
                        fresh = Some((i, fact));
                    }
                }
            }
        }
        let (i, fact) = fresh.ok_or(BacktrackSignal::NoPivotOptions)?;
        self.add_possibly_unnecessary_assumption(fact)?;
        Ok(i)
    }

    fn process_current(&mut self) -> SearchResult<()> {
        loop {
            let Some(current) = self.current.as_deref() else {
                return Ok(());
            };
            let candidates = current.pivot_candidates(Some(&self.set));
            if candidates.is_empty() {
                break;
            }
            let choice = self.get_next_var_num_pivot(&candidates)?;
            if let Some(current) = &mut self.current {
                Arc::make_mut(current).apply_pivot(&candidates[choice]);
            }
        }

        let Some(current) = self.current.clone() else {
            return Ok(());
        };
        self.add_necessary_assumptions(current.almost_zero_facts(Some(&self.set)))?;
        if !self.pivot_row_analysis {
            let Some(current) = self.current.clone() else {
                return Ok(());
            };
            let facts = PivotRowHandler::new(&current, Some(&self.set)).basic_solution_facts()?;
            return self.add_necessary_assumptions(facts);
        }
        // each committed candidate fixes one contribution's sign, so this ends
        loop {
            let Some(current) = self.current.clone() else {
                return Ok(());
            };
            let report = PivotRowHandler::new(&current, Some(&self.set)).analyse()?;
            self.add_necessary_assumptions(report.facts)?;
            let Some(candidate) = report.candidates.into_iter().next() else {
                return Ok(());
            };
            self.add_possibly_unnecessary_assumption(candidate)?;
        }
    }

    fn run(&mut self) -> SearchResult<()> {
        loop {
            if self.current.is_none() {
                let Some(next) = self.queue.pop_front() else {
                    return Ok(());
                };
                let mut matrix = Arc::unwrap_or_clone(next);
                self.substitutions.apply_matrix(&mut matrix);
                self.current = Some(Arc::new(matrix));
            }
            self.process_current()?;
            self.current = None;
            self.stats.matrices_processed += 1;
        }
    }

    /// Reduce every queued matrix, backtracking as needed.
    ///
    /// Returns the assumption set of the first consistent branch, or `None`
    /// once every branch failed. The search can be resumed after a success:
    /// call [`next_branch`](Self::next_branch) and then `solve` again.
    pub fn solve(&mut self) -> Option<AssumptionSet> {
        loop {
            match self.run() {
                Ok(()) => {
                    debug!(
                        assumptions = self.set.len(),
                        depth = self.stack.depth(),
                        "branch consistent"
                    );
                    return Some(self.set.clone());
                }
                Err(signal) => {
                    debug!(%signal, "dead branch");
                    if !self.next_branch() {
                        return None;
                    }
                }
            }
        }
    }
}
