//! Checkpoints of the search.

use super::substitution::SubstitutionManager;
use crate::assumption::{Assumption, AssumptionSet};
use crate::matrix::Matrix;
use std::sync::Arc;

/// The search state before a speculative assumption, plus what to assume
/// instead when the speculation fails.
///
/// All collections are persistent or reference-counted, so taking a frame
/// copies no matrix.
#[derive(Debug, Clone)]
pub struct Frame {
    pub(crate) set: AssumptionSet,
    pub(crate) queue: im::Vector<Arc<Matrix>>,
    pub(crate) current: Option<Arc<Matrix>>,
    pub(crate) substitutions: SubstitutionManager,
    pub(crate) negation: Assumption,
}

impl Frame {
    /// The assumption to commit on backtrack.
    pub fn negation(&self) -> &Assumption {
        &self.negation
    }

    /// The assumption set at the time of the checkpoint.
    pub fn set(&self) -> &AssumptionSet {
        &self.set
    }
}

/// Chronological stack of frames.
#[derive(Debug, Clone, Default)]
pub struct AssumptionStack {
    frames: Vec<Frame>,
}

impl AssumptionStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a checkpoint.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pop the most recent checkpoint.
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// The most recent checkpoint.
    pub fn peek(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Number of open checkpoints.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no checkpoint is open.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every checkpoint.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumption::AssumptionType;
    use balancer_math::{RationalFunction, Variable};

    fn frame(name: &str) -> Frame {
        Frame {
            set: AssumptionSet::new(),
            queue: im::Vector::new(),
            current: None,
            substitutions: SubstitutionManager::new(),
            negation: Assumption::new(
                RationalFunction::from_var(Variable::new(name)),
                AssumptionType::ZERO,
            ),
        }
    }

    #[test]
    fn test_lifo_order() {
        let mut stack = AssumptionStack::new();
        stack.push(frame("a"));
        stack.push(frame("b"));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.peek().map(|f| f.negation().to_string()), Some("b = 0".into()));
        assert_eq!(stack.pop().map(|f| f.negation().to_string()), Some("b = 0".into()));
        assert_eq!(stack.pop().map(|f| f.negation().to_string()), Some("a = 0".into()));
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }
}
