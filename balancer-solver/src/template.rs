//! Template networks: locations carrying parametric invariant templates and
//! the transitions between them.

use crate::formula::Formula;
use balancer_core::Result;
use balancer_math::{BigRational, Variable};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::fmt;

/// An assignment of rational values to parameters.
pub type ParameterValues = FxHashMap<Variable, BigRational>;

/// Index of a location in its network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub usize);

/// A program location.
#[derive(Debug, Clone)]
pub struct Location {
    /// Display name.
    pub name: String,
    /// Parametric invariant template.
    pub template: Formula,
    /// Initial condition, for entry locations.
    pub initial: Option<Formula>,
}

/// A transition; `target == None` marks an error transition.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Source location.
    pub source: LocationId,
    /// Target location.
    pub target: Option<LocationId>,
    /// Path constraint over unprimed (pre) and primed (post) variables.
    pub path: Formula,
}

/// One implication the balancer has to make valid.
#[derive(Debug, Clone)]
pub struct Implication {
    /// Where it comes from, for logging.
    pub label: String,
    /// Left-hand side.
    pub antecedent: Formula,
    /// Right-hand side.
    pub consequent: Formula,
}

/// A template instantiated with concrete parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invariant {
    /// Location name.
    pub location: String,
    /// The instantiated template.
    pub formula: Formula,
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.formula)
    }
}

/// Locations and transitions to balance.
#[derive(Debug, Clone, Default)]
pub struct TemplateNetwork {
    locations: Vec<Location>,
    transitions: Vec<Transition>,
}

impl TemplateNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location with its template.
    pub fn add_location(&mut self, name: impl Into<String>, template: Formula) -> LocationId {
        self.locations.push(Location {
            name: name.into(),
            template,
            initial: None,
        });
        LocationId(self.locations.len() - 1)
    }

    /// Mark `loc` as an entry location with initial condition `initial`.
    pub fn set_initial(&mut self, loc: LocationId, initial: Formula) {
        if let Some(location) = self.locations.get_mut(loc.0) {
            location.initial = Some(initial);
        }
    }

    /// Add a transition between two locations.
    pub fn add_transition(&mut self, source: LocationId, target: LocationId, path: Formula) {
        self.transitions.push(Transition {
            source,
            target: Some(target),
            path,
        });
    }

    /// Add a transition into the error state.
    pub fn add_error_transition(&mut self, source: LocationId, path: Formula) {
        self.transitions.push(Transition {
            source,
            target: None,
            path,
        });
    }

    /// All locations.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// All transitions.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The location behind `id`.
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.0)
    }

    /// Every parameter of every template, sorted by name.
    pub fn parameters(&self) -> Vec<Variable> {
        let params: BTreeSet<Variable> = self
            .locations
            .iter()
            .flat_map(|loc| loc.template.parameters())
            .collect();
        params.into_iter().collect()
    }

    /// The implications that make the templates inductive and safe:
    /// initiation, consecution per transition, and `false` for error
    /// transitions.
    pub fn implications(&self) -> Vec<Implication> {
        let mut out = Vec::new();
        for loc in &self.locations {
            if let Some(initial) = &loc.initial {
                out.push(Implication {
                    label: format!("init {}", loc.name),
                    antecedent: initial.clone(),
                    consequent: loc.template.clone(),
                });
            }
        }
        for t in &self.transitions {
            let Some(source) = self.location(t.source) else {
                continue;
            };
            let antecedent = source.template.conjoin(&t.path);
            match t.target.and_then(|id| self.location(id)) {
                Some(target) => out.push(Implication {
                    label: format!("{} -> {}", source.name, target.name),
                    antecedent,
                    consequent: target.template.primed(),
                }),
                None => out.push(Implication {
                    label: format!("{} -> error", source.name),
                    antecedent,
                    consequent: Formula::falsum(),
                }),
            }
        }
        out
    }

    /// Instantiate every template; fails if a parameter is unbound.
    pub fn evaluate(&self, values: &ParameterValues) -> Result<Vec<Invariant>> {
        self.locations
            .iter()
            .map(|loc| {
                Ok(Invariant {
                    location: loc.name.clone(),
                    formula: loc.template.instantiate(values)?,
                })
            })
            .collect()
    }
}
