//! Quantifier-elimination oracles.
//!
//! Once the search has settled on an assumption set, the free parameters are
//! existentially quantified and an oracle is asked for witnesses. The request
//! is the textual form `rlex(<atom> and <atom> ...)`; the answer is either a
//! truth value or a list of `name = value` bindings.

pub mod command;
pub mod sampling;

pub use command::CommandOracle;
pub use sampling::SamplingOracle;

use crate::template::ParameterValues;
use balancer_core::{AssumptionSet, BalanceError, SubstitutionManager};
use balancer_math::{BigInt, BigRational, Polynomial, Variable};
use num_traits::{One, Signed, Zero};
use std::time::Instant;
use thiserror::Error;

/// Oracle failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The deadline passed before an answer arrived.
    #[error("oracle timed out after {elapsed_ms} ms (limit {limit_ms} ms)")]
    Timeout {
        /// Measured duration.
        elapsed_ms: u64,
        /// Allowed duration.
        limit_ms: u64,
    },
    /// The oracle process could not be run.
    #[error("oracle process failed: {0}")]
    Process(String),
    /// The answer was not understood.
    #[error("cannot parse oracle answer: {0}")]
    Parse(String),
}

impl From<OracleError> for BalanceError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::Timeout {
                elapsed_ms,
                limit_ms,
            } => BalanceError::Timeout {
                elapsed_ms,
                limit_ms,
            },
            other => BalanceError::Oracle(other.to_string()),
        }
    }
}

/// What an oracle answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleAnswer {
    /// A bare truth value.
    Truth(bool),
    /// Witness values for (some of) the parameters.
    Bindings(ParameterValues),
}

/// Oracle interface.
pub trait QeOracle {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Eliminate the quantifiers of `query`, giving up at `deadline`.
    fn eliminate(
        &mut self,
        query: &QeQuery,
        deadline: Option<Instant>,
    ) -> Result<OracleAnswer, OracleError>;
}

impl<O: QeOracle + ?Sized> QeOracle for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn eliminate(
        &mut self,
        query: &QeQuery,
        deadline: Option<Instant>,
    ) -> Result<OracleAnswer, OracleError> {
        (**self).eliminate(query, deadline)
    }
}

/// An existential query over the free parameters.
#[derive(Debug, Clone)]
pub struct QeQuery {
    assumptions: AssumptionSet,
    substitutions: SubstitutionManager,
    free: Vec<Variable>,
}

impl QeQuery {
    /// Query for `assumptions`, with `substitutions` having eliminated some
    /// of `parameters`.
    pub fn new(
        assumptions: &AssumptionSet,
        substitutions: &SubstitutionManager,
        parameters: &[Variable],
    ) -> Self {
        let eliminated = substitutions.eliminated();
        let mut free: Vec<Variable> = parameters
            .iter()
            .copied()
            .chain(assumptions.vars())
            .filter(|v| !eliminated.contains(v))
            .collect();
        free.sort();
        free.dedup();
        Self {
            assumptions: assumptions.clone(),
            substitutions: substitutions.clone(),
            free,
        }
    }

    /// The assumption set being queried.
    pub fn assumptions(&self) -> &AssumptionSet {
        &self.assumptions
    }

    /// Parameters the oracle has to find values for.
    pub fn free_parameters(&self) -> &[Variable] {
        &self.free
    }

    /// The relational atoms of the request.
    pub fn atoms(&self) -> Vec<String> {
        self.assumptions.atoms()
    }

    /// Equations `var - value` of the eliminated parameters.
    pub fn equations(&self) -> Vec<Polynomial> {
        self.substitutions.equations()
    }

    /// The request text.
    pub fn request(&self) -> String {
        self.assumptions.to_query()
    }

    /// Turn oracle bindings into a full assignment.
    ///
    /// Free parameters left unbound become zero when `default_to_zero` is set
    /// (otherwise the bindings are rejected); eliminated parameters are
    /// computed from their substitutions. Returns `None` unless the result
    /// satisfies every assumption.
    pub fn complete(&self, bindings: &ParameterValues, default_to_zero: bool) -> Option<ParameterValues> {
        let mut values = bindings.clone();
        for v in &self.free {
            if !values.contains_key(v) {
                if !default_to_zero {
                    return None;
                }
                values.insert(*v, BigRational::zero());
            }
        }
        values.extend(self.substitutions.resolve(&values));
        match self.assumptions.eval(&values) {
            Some(true) => Some(values),
            _ => None,
        }
    }
}

fn parse_rational(text: &str) -> Option<BigRational> {
    let text = text.trim();
    if let Some((num, den)) = text.split_once('/') {
        let num: BigInt = num.trim().parse().ok()?;
        let den: BigInt = den.trim().parse().ok()?;
        if den.is_zero() {
            return None;
        }
        return Some(BigRational::new(num, den));
    }
    if let Some((int, frac)) = text.split_once('.') {
        let negative = int.trim_start().starts_with('-');
        let int: BigInt = match int.trim() {
            "" | "-" | "+" => BigInt::zero(),
            digits => digits.parse().ok()?,
        };
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let scale = num_traits::pow(BigInt::from(10), frac.len());
        let frac: BigInt = frac.parse().ok()?;
        let magnitude = BigRational::from_integer(int.abs() * &scale + frac) / BigRational::from_integer(scale);
        return Some(if negative { -magnitude } else { magnitude });
    }
    text.parse::<BigInt>().ok().map(BigRational::from_integer)
}

/// Parse an oracle answer.
///
/// Accepts `true`, `false`, and lists of `name = value` pairs separated by
/// commas, semicolons or newlines, optionally wrapped in braces or brackets
/// and optionally mixed with a `true` marker, e.g. `{true, {p = 1/2, q = 0}}`.
pub fn parse_answer(text: &str) -> Result<OracleAnswer, OracleError> {
    let mut bindings = ParameterValues::default();
    let mut truth_seen = false;
    let cleaned: String = text
        .chars()
        .map(|c| if matches!(c, '{' | '}' | '[' | ']') { ',' } else { c })
        .collect();

    for piece in cleaned.split([',', ';', '\n']) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        match piece.to_ascii_lowercase().as_str() {
            "true" => {
                truth_seen = true;
                continue;
            }
            "false" => return Ok(OracleAnswer::Truth(false)),
            _ => {}
        }
        let (name, value) = piece
            .split_once('=')
            .ok_or_else(|| OracleError::Parse(format!("unexpected `{piece}`")))?;
        let name = name.trim();
        if name.is_empty() || name.ends_with(['<', '>']) {
            return Err(OracleError::Parse(format!("not a binding: `{piece}`")));
        }
        let value = parse_rational(value)
            .ok_or_else(|| OracleError::Parse(format!("not a rational: `{}`", value.trim())))?;
        bindings.insert(Variable::new(name), value);
    }

    if !bindings.is_empty() {
        Ok(OracleAnswer::Bindings(bindings))
    } else if truth_seen {
        Ok(OracleAnswer::Truth(true))
    } else {
        Err(OracleError::Parse(format!("empty answer `{}`", text.trim())))
    }
}

/// Grid of small rationals, simplest first: `0, 1, -1, 2, -2, 1/2, -1/2, ...`.
pub(crate) fn sample_values(max_magnitude: i64) -> Vec<BigRational> {
    let mut values = vec![BigRational::zero()];
    for n in 1..=max_magnitude.max(1) {
        let n = BigRational::from_integer(BigInt::from(n));
        values.push(n.clone());
        values.push(-n);
    }
    for d in 2..=max_magnitude.max(1) {
        let inv = BigRational::one() / BigRational::from_integer(BigInt::from(d));
        values.push(inv.clone());
        values.push(-inv);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use balancer_core::{Assumption, AssumptionType};
    use balancer_math::{RationalFunction, Substitution};

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_parse_truth_values() {
        assert_eq!(parse_answer("true"), Ok(OracleAnswer::Truth(true)));
        assert_eq!(parse_answer(" FALSE \n"), Ok(OracleAnswer::Truth(false)));
        assert!(parse_answer("").is_err());
        assert!(parse_answer("maybe").is_err());
    }

    #[test]
    fn test_parse_bindings() {
        let answer = parse_answer("{true, {p = 1/2, q = -3}}").expect("parses");
        let OracleAnswer::Bindings(values) = answer else {
            panic!("expected bindings");
        };
        assert_eq!(values.get(&Variable::new("p")), Some(&rat(1, 2)));
        assert_eq!(values.get(&Variable::new("q")), Some(&rat(-3, 1)));

        let answer = parse_answer("p = -0.25\nr = 2").expect("parses");
        let OracleAnswer::Bindings(values) = answer else {
            panic!("expected bindings");
        };
        assert_eq!(values.get(&Variable::new("p")), Some(&rat(-1, 4)));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_parse_rejects_relations() {
        assert!(parse_answer("p <= 3").is_err());
        assert!(parse_answer("p = 1/0").is_err());
    }

    #[test]
    fn test_query_request_and_completion() {
        let p = Variable::new("p");
        let q = Variable::new("q");
        let r = Variable::new("r");
        let mut set = AssumptionSet::new();
        set.add(Assumption::new(RationalFunction::from_var(p), AssumptionType::POSITIVE));
        let mut subs = SubstitutionManager::new();
        // r := p + 1
        subs.push(Substitution::new(
            r,
            Polynomial::from_coeffs_int(&[(1, &[("p", 1)]), (1, &[])]),
        ));

        let query = QeQuery::new(&set, &subs, &[p, q, r]);
        assert_eq!(query.request(), "rlex(p > 0)");
        assert_eq!(query.free_parameters(), &[p, q]);

        let mut bindings = ParameterValues::default();
        bindings.insert(p, rat(2, 1));
        let values = query.complete(&bindings, true).expect("satisfying");
        assert_eq!(values.get(&q), Some(&BigRational::zero()));
        assert_eq!(values.get(&r), Some(&rat(3, 1)));
        assert!(query.complete(&bindings, false).is_none());

        bindings.insert(p, rat(-1, 1));
        assert!(query.complete(&bindings, true).is_none());
    }

    #[test]
    fn test_sample_values_order() {
        let values = sample_values(2);
        assert_eq!(
            values,
            vec![rat(0, 1), rat(1, 1), rat(-1, 1), rat(2, 1), rat(-2, 1), rat(1, 2), rat(-1, 2)]
        );
    }
}
