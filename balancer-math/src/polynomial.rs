//! Multivariate polynomials over the rationals.
//!
//! Polynomials are kept *collected*: at most one term per monomial, no zero
//! coefficients, terms sorted by graded lexicographic order (largest first).
//! Every constructor and every arithmetic operation re-establishes that form,
//! so structural equality is polynomial equality.

use crate::substitution::Substitution;
use crate::variable::Variable;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::ops;

/// Power of a variable (variable, exponent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarPower {
    /// The variable.
    pub var: Variable,
    /// The exponent, always positive inside a monomial.
    pub power: u32,
}

impl VarPower {
    /// Create a new variable power.
    #[inline]
    pub fn new(var: Variable, power: u32) -> Self {
        Self { var, power }
    }
}

/// A product of variables with positive exponents.
///
/// Stored as a list of (variable, power) pairs sorted by variable; the
/// constant monomial `1` is the empty list.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Monomial {
    vars: SmallVec<[VarPower; 4]>,
    total_degree: u32,
}

impl Monomial {
    /// The constant monomial `1`.
    #[inline]
    pub fn unit() -> Self {
        Self {
            vars: SmallVec::new(),
            total_degree: 0,
        }
    }

    /// `var^1`.
    #[inline]
    pub fn from_var(var: Variable) -> Self {
        Self::from_var_power(var, 1)
    }

    /// `var^power`.
    pub fn from_var_power(var: Variable, power: u32) -> Self {
        if power == 0 {
            return Self::unit();
        }
        let mut vars = SmallVec::new();
        vars.push(VarPower::new(var, power));
        Self {
            vars,
            total_degree: power,
        }
    }

    /// Build a monomial from (variable, power) pairs in any order; repeats add up.
    fn from_powers(powers: impl IntoIterator<Item = (Variable, u32)>) -> Self {
        let mut pairs: SmallVec<[VarPower; 4]> = powers
            .into_iter()
            .filter(|&(_, power)| power > 0)
            .map(|(var, power)| VarPower::new(var, power))
            .collect();
        pairs.sort_by_key(|vp| vp.var);
        let mut vars: SmallVec<[VarPower; 4]> = SmallVec::with_capacity(pairs.len());
        for vp in pairs {
            match vars.last_mut() {
                Some(last) if last.var == vp.var => last.power += vp.power,
                _ => vars.push(vp),
            }
        }
        Self::from_sorted(vars)
    }

    fn from_sorted(vars: SmallVec<[VarPower; 4]>) -> Self {
        let total_degree = vars.iter().map(|vp| vp.power).sum();
        Self { vars, total_degree }
    }

    /// Returns true for the constant monomial.
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.vars.is_empty()
    }

    /// Sum of all exponents.
    #[inline]
    pub fn total_degree(&self) -> u32 {
        self.total_degree
    }

    /// The (variable, power) pairs, sorted by variable.
    #[inline]
    pub fn vars(&self) -> &[VarPower] {
        &self.vars
    }

    /// Exponent of `var` (0 if absent).
    pub fn degree(&self, var: Variable) -> u32 {
        self.vars
            .iter()
            .find(|vp| vp.var == var)
            .map(|vp| vp.power)
            .unwrap_or(0)
    }

    /// Exponents of both monomials side by side, over the union of their
    /// variables in sorted order; a missing variable has exponent 0.
    fn aligned(&self, other: &Monomial) -> SmallVec<[(Variable, u32, u32); 8]> {
        let mut lhs = self.vars.iter().peekable();
        let mut rhs = other.vars.iter().peekable();
        let mut out = SmallVec::new();
        loop {
            let entry = match (lhs.peek().copied(), rhs.peek().copied()) {
                (Some(a), Some(b)) if a.var == b.var => {
                    lhs.next();
                    rhs.next();
                    (a.var, a.power, b.power)
                }
                (Some(a), Some(b)) if a.var < b.var => {
                    lhs.next();
                    (a.var, a.power, 0)
                }
                (Some(a), None) => {
                    lhs.next();
                    (a.var, a.power, 0)
                }
                (_, Some(b)) => {
                    rhs.next();
                    (b.var, 0, b.power)
                }
                (None, None) => return out,
            };
            out.push(entry);
        }
    }

    /// Multiply two monomials.
    pub fn mul(&self, other: &Monomial) -> Monomial {
        let vars = self
            .aligned(other)
            .into_iter()
            .map(|(var, a, b)| VarPower::new(var, a + b))
            .collect();
        Monomial::from_sorted(vars)
    }

    /// Quotient `self / other`, if `other` divides `self`.
    pub fn div(&self, other: &Monomial) -> Option<Monomial> {
        let mut vars = SmallVec::new();
        for (var, a, b) in self.aligned(other) {
            match a.checked_sub(b)? {
                0 => {}
                rest => vars.push(VarPower::new(var, rest)),
            }
        }
        Some(Monomial::from_sorted(vars))
    }

    /// Greatest common divisor of two monomials.
    pub fn gcd(&self, other: &Monomial) -> Monomial {
        let vars = self
            .aligned(other)
            .into_iter()
            .filter(|&(_, a, b)| a > 0 && b > 0)
            .map(|(var, a, b)| VarPower::new(var, a.min(b)))
            .collect();
        Monomial::from_sorted(vars)
    }

    /// The monomial with `var` removed.
    pub fn without(&self, var: Variable) -> Monomial {
        let vars = self.vars.iter().filter(|vp| vp.var != var).copied().collect();
        Monomial::from_sorted(vars)
    }

    /// Graded order: higher total degree first, ties broken by the exponent
    /// of the smallest variable where the two differ.
    fn graded_cmp(&self, other: &Monomial) -> Ordering {
        self.total_degree.cmp(&other.total_degree).then_with(|| {
            let mut lhs = self.vars.iter();
            let mut rhs = other.vars.iter();
            loop {
                return match (lhs.next(), rhs.next()) {
                    (Some(a), Some(b)) if a == b => continue,
                    // a variable missing on one side has exponent 0 there
                    (Some(a), Some(b)) if a.var == b.var => a.power.cmp(&b.power),
                    (Some(a), Some(b)) => b.var.cmp(&a.var),
                    (Some(_), None) => Ordering::Greater,
                    (None, Some(_)) => Ordering::Less,
                    (None, None) => Ordering::Equal,
                };
            }
        })
    }
}

impl fmt::Debug for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unit() {
            return write!(f, "1");
        }
        for (i, vp) in self.vars.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            if vp.power == 1 {
                write!(f, "{}", vp.var)?;
            } else {
                write!(f, "{}^{}", vp.var, vp.power)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A coefficient multiplied by a monomial.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Term {
    /// The coefficient.
    pub coeff: BigRational,
    /// The monomial.
    pub monomial: Monomial,
}

impl Term {
    /// Create a new term.
    #[inline]
    pub fn new(coeff: BigRational, monomial: Monomial) -> Self {
        Self { coeff, monomial }
    }

    /// A constant term.
    #[inline]
    pub fn constant(c: BigRational) -> Self {
        Self::new(c, Monomial::unit())
    }

    /// `1 * var`.
    #[inline]
    pub fn from_var(var: Variable) -> Self {
        Self::new(BigRational::one(), Monomial::from_var(var))
    }

    /// A term is zero iff its coefficient is zero, whatever its monomial.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coeff.is_zero()
    }

    /// Returns true if the monomial is `1`.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.monomial.is_unit()
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.monomial.is_unit() {
            write!(f, "{}", self.coeff)
        } else if self.coeff.is_one() {
            write!(f, "{:?}", self.monomial)
        } else if self.coeff == -BigRational::one() {
            write!(f, "-{:?}", self.monomial)
        } else {
            write!(f, "{}*{:?}", self.coeff, self.monomial)
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A collected multivariate polynomial with rational coefficients.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Polynomial {
    /// Terms in decreasing graded lexicographic order.
    terms: Vec<Term>,
}

impl Polynomial {
    /// The zero polynomial.
    #[inline]
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// The constant `1`.
    #[inline]
    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    /// A constant polynomial.
    pub fn constant(c: BigRational) -> Self {
        if c.is_zero() {
            Self::zero()
        } else {
            Self {
                terms: vec![Term::constant(c)],
            }
        }
    }

    /// A constant polynomial from an integer.
    pub fn from_integer(n: i64) -> Self {
        Self::constant(BigRational::from_integer(BigInt::from(n)))
    }

    /// The polynomial `var`.
    pub fn from_var(var: Variable) -> Self {
        Self {
            terms: vec![Term::from_var(var)],
        }
    }

    /// The polynomial `var^power`.
    pub fn from_var_power(var: Variable, power: u32) -> Self {
        Self {
            terms: vec![Term::new(
                BigRational::one(),
                Monomial::from_var_power(var, power),
            )],
        }
    }

    /// Collect arbitrary terms: combine like monomials and drop zeros.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut poly = Self {
            terms: terms.into_iter().filter(|t| !t.is_zero()).collect(),
        };
        poly.collect();
        poly
    }

    /// Build a polynomial from integer coefficients and named powers.
    ///
    /// `&[(3, &[("p", 2)]), (-1, &[])]` is `3*p^2 - 1`.
    pub fn from_coeffs_int(coeffs: &[(i64, &[(&str, u32)])]) -> Self {
        let terms = coeffs.iter().map(|(c, powers)| {
            Term::new(
                BigRational::from_integer(BigInt::from(*c)),
                Monomial::from_powers(powers.iter().map(|(name, p)| (Variable::new(name), *p))),
            )
        });
        Self::from_terms(terms)
    }

    /// `a1*x1 + a2*x2 + ... + c`.
    pub fn linear(coeffs: &[(BigRational, Variable)], constant: BigRational) -> Self {
        let mut terms: Vec<Term> = coeffs
            .iter()
            .map(|(c, v)| Term::new(c.clone(), Monomial::from_var(*v)))
            .collect();
        terms.push(Term::constant(constant));
        Self::from_terms(terms)
    }

    /// Sort by monomial order and combine like terms.
    fn collect(&mut self) {
        if self.terms.is_empty() {
            return;
        }

        self.terms
            .sort_by(|a, b| b.monomial.graded_cmp(&a.monomial));

        let mut collected: Vec<Term> = Vec::with_capacity(self.terms.len());
        for term in self.terms.drain(..) {
            match collected.last_mut() {
                Some(last) if last.monomial == term.monomial => last.coeff += term.coeff,
                _ => collected.push(term),
            }
        }
        collected.retain(|t| !t.coeff.is_zero());
        self.terms = collected;
    }

    /// Returns true for the zero polynomial.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true if the polynomial has no variables (zero included).
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty() || (self.terms.len() == 1 && self.terms[0].monomial.is_unit())
    }

    /// The value of a constant polynomial.
    pub fn constant_value(&self) -> Option<BigRational> {
        match self.terms.as_slice() {
            [] => Some(BigRational::zero()),
            [t] if t.monomial.is_unit() => Some(t.coeff.clone()),
            _ => None,
        }
    }

    /// Returns true for the constant `1`.
    pub fn is_unity(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].monomial.is_unit() && self.terms[0].coeff.is_one()
    }

    /// Returns true for a positive constant.
    pub fn is_positive(&self) -> bool {
        self.constant_value().is_some_and(|c| c.is_positive())
    }

    /// Returns true for a negative constant.
    pub fn is_negative(&self) -> bool {
        self.constant_value().is_some_and(|c| c.is_negative())
    }

    /// Returns true if every term has total degree at most one.
    pub fn is_linear(&self) -> bool {
        self.terms.iter().all(|t| t.monomial.total_degree() <= 1)
    }

    /// Number of terms.
    #[inline]
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The collected terms, largest monomial first.
    #[inline]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Total degree (0 for constants).
    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|t| t.monomial.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Degree in `var`.
    pub fn degree(&self, var: Variable) -> u32 {
        self.terms
            .iter()
            .map(|t| t.monomial.degree(var))
            .max()
            .unwrap_or(0)
    }

    /// Returns true if `var` occurs in some term.
    pub fn contains(&self, var: Variable) -> bool {
        self.terms.iter().any(|t| t.monomial.degree(var) > 0)
    }

    /// All variables, sorted and deduplicated.
    pub fn vars(&self) -> Vec<Variable> {
        let mut vars: Vec<Variable> = self
            .terms
            .iter()
            .flat_map(|t| t.monomial.vars().iter().map(|vp| vp.var))
            .collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// The leading term.
    #[inline]
    pub fn leading_term(&self) -> Option<&Term> {
        self.terms.first()
    }

    /// The leading coefficient (0 for the zero polynomial).
    pub fn leading_coeff(&self) -> BigRational {
        self.terms
            .first()
            .map(|t| t.coeff.clone())
            .unwrap_or_else(BigRational::zero)
    }

    /// The constant term.
    pub fn constant_term(&self) -> BigRational {
        self.terms
            .iter()
            .find(|t| t.monomial.is_unit())
            .map(|t| t.coeff.clone())
            .unwrap_or_else(BigRational::zero)
    }

    /// Negate.
    pub fn neg(&self) -> Polynomial {
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(-t.coeff.clone(), t.monomial.clone()))
                .collect(),
        }
    }

    /// Add.
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        if other.is_zero() {
            return self.clone();
        }
        if self.is_zero() {
            return other.clone();
        }
        let mut terms: Vec<Term> = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Polynomial::from_terms(terms)
    }

    /// Subtract.
    pub fn sub(&self, other: &Polynomial) -> Polynomial {
        self.add(&other.neg())
    }

    /// Multiply by a scalar.
    pub fn scale(&self, c: &BigRational) -> Polynomial {
        if c.is_zero() {
            return Polynomial::zero();
        }
        if c.is_one() {
            return self.clone();
        }
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(&t.coeff * c, t.monomial.clone()))
                .collect(),
        }
    }

    /// Multiply.
    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }

        let mut terms: Vec<Term> = Vec::with_capacity(self.terms.len() * other.terms.len());
        for t1 in &self.terms {
            for t2 in &other.terms {
                terms.push(Term::new(
                    &t1.coeff * &t2.coeff,
                    t1.monomial.mul(&t2.monomial),
                ));
            }
        }

        Polynomial::from_terms(terms)
    }

    /// Multiply by a single term.
    pub fn mul_term(&self, term: &Term) -> Polynomial {
        if term.is_zero() {
            return Polynomial::zero();
        }
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(&t.coeff * &term.coeff, t.monomial.mul(&term.monomial)))
                .collect(),
        }
    }

    /// Divide every term by a monomial, if it divides all of them.
    pub fn div_monomial(&self, m: &Monomial) -> Option<Polynomial> {
        if m.is_unit() {
            return Some(self.clone());
        }
        let terms = self
            .terms
            .iter()
            .map(|t| t.monomial.div(m).map(|q| Term::new(t.coeff.clone(), q)))
            .collect::<Option<Vec<_>>>()?;
        // Dividing every monomial by the same factor preserves their order.
        Some(Polynomial { terms })
    }

    /// `self^k` by binary exponentiation.
    pub fn pow(&self, k: u32) -> Polynomial {
        if k == 0 {
            return Polynomial::one();
        }
        if k == 1 {
            return self.clone();
        }
        if self.is_zero() {
            return Polynomial::zero();
        }

        let mut result = Polynomial::one();
        let mut base = self.clone();
        let mut exp = k;

        while exp > 0 {
            if exp & 1 == 1 {
                result = Polynomial::mul(&result, &base);
            }
            exp >>= 1;
            if exp > 0 {
                base = Polynomial::mul(&base, &base);
            }
        }

        result
    }

    /// Exact division: the quotient if `divisor` divides `self`, else `None`.
    ///
    /// With a single divisor the leading-term reduction is a Gröbner reduction,
    /// so a leading term that `divisor` cannot reduce proves a non-zero
    /// remainder.
    pub fn exact_div(&self, divisor: &Polynomial) -> Option<Polynomial> {
        let lead = divisor.leading_term()?;
        if let Some(c) = divisor.constant_value() {
            return Some(self.scale(&c.recip()));
        }

        let mut remainder = self.clone();
        let mut quotient_terms = Vec::new();

        while let Some(rt) = remainder.leading_term() {
            let monomial = rt.monomial.div(&lead.monomial)?;
            let factor = Term::new(&rt.coeff / &lead.coeff, monomial);
            remainder = remainder.sub(&divisor.mul_term(&factor));
            quotient_terms.push(factor);
        }

        Some(Polynomial::from_terms(quotient_terms))
    }

    /// Substitute a polynomial for a variable.
    pub fn substitute(&self, var: Variable, replacement: &Polynomial) -> Polynomial {
        if !self.contains(var) {
            return self.clone();
        }

        let mut untouched = Vec::new();
        let mut result = Polynomial::zero();
        let mut powers: FxHashMap<u32, Polynomial> = FxHashMap::default();

        for term in &self.terms {
            let d = term.monomial.degree(var);
            if d == 0 {
                untouched.push(term.clone());
            } else {
                let rest = Term::new(term.coeff.clone(), term.monomial.without(var));
                let rep_pow = powers.entry(d).or_insert_with(|| replacement.pow(d));
                result = result.add(&rep_pow.mul_term(&rest));
            }
        }

        result.add(&Polynomial::from_terms(untouched))
    }

    /// Evaluate under an assignment; `None` if some variable is unbound.
    pub fn eval(&self, assignment: &FxHashMap<Variable, BigRational>) -> Option<BigRational> {
        let mut sum = BigRational::zero();
        for term in &self.terms {
            let mut value = term.coeff.clone();
            for vp in term.monomial.vars() {
                let base = assignment.get(&vp.var)?;
                value *= num_traits::pow(base.clone(), vp.power as usize);
            }
            sum += value;
        }
        Some(sum)
    }

    /// `±1` according to the sign of the leading coefficient (`1` for zero).
    pub fn unit_content(&self) -> BigRational {
        if self.leading_coeff().is_negative() {
            -BigRational::one()
        } else {
            BigRational::one()
        }
    }

    /// GCD of the coefficient numerators (`1` for zero).
    pub fn integer_content(&self) -> BigInt {
        let mut gcd: Option<BigInt> = None;
        for term in &self.terms {
            let num = term.coeff.numer().abs();
            gcd = Some(match gcd {
                None => num,
                Some(g) => gcd_bigint(g, num),
            });
        }
        gcd.unwrap_or_else(BigInt::one)
    }

    /// The signed scalar `c` for which `self / c` has coprime integer
    /// coefficients and a positive leading coefficient (`1` for zero).
    pub fn rational_content(&self) -> BigRational {
        if self.terms.is_empty() {
            return BigRational::one();
        }

        let mut den_lcm = BigInt::one();
        for term in &self.terms {
            let d = term.coeff.denom();
            let g = gcd_bigint(den_lcm.clone(), d.clone());
            den_lcm = (&den_lcm * d) / g;
        }

        BigRational::new(self.integer_content(), den_lcm) * self.unit_content()
    }

    /// GCD of all monomials (`1` for zero).
    pub fn monomial_content(&self) -> Monomial {
        let mut iter = self.terms.iter();
        let Some(first) = iter.next() else {
            return Monomial::unit();
        };
        let mut gcd = first.monomial.clone();
        for term in iter {
            if gcd.is_unit() {
                break;
            }
            gcd = gcd.gcd(&term.monomial);
        }
        gcd
    }

    /// Split into `(c, p)` with `self = c * p` and `c = rational_content()`.
    pub fn cancel_rational_content(&self) -> (BigRational, Polynomial) {
        let c = self.rational_content();
        let p = self.scale(&c.recip());
        (c, p)
    }

    /// Split into `(m, p)` with `self = m * p` and `m = monomial_content()`.
    pub fn cancel_monomial_content(&self) -> (Monomial, Polynomial) {
        let m = self.monomial_content();
        match self.div_monomial(&m) {
            Some(p) => (m, p),
            None => (Monomial::unit(), self.clone()),
        }
    }

    /// Solve `self = 0` for the first variable that occurs only linearly.
    ///
    /// Scans the terms for one of the form `c*v` such that no other term
    /// mentions `v`; then `v = -(self - c*v) / c`.
    pub fn linear_isolate_first(&self) -> Option<Substitution> {
        for (i, term) in self.terms.iter().enumerate() {
            let [vp] = term.monomial.vars() else {
                continue;
            };
            if vp.power != 1 {
                continue;
            }
            let var = vp.var;
            let elsewhere = self
                .terms
                .iter()
                .enumerate()
                .any(|(j, t)| j != i && t.monomial.degree(var) > 0);
            if elsewhere {
                continue;
            }

            let rest = Polynomial {
                terms: self
                    .terms
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, t)| t.clone())
                    .collect(),
            };
            let value = rest.scale(&(-term.coeff.recip()));
            return Some(Substitution::new(var, value));
        }
        None
    }
}

/// GCD of two BigInts using the Euclidean algorithm.
pub(crate) fn gcd_bigint(mut a: BigInt, mut b: BigInt) -> BigInt {
    while !b.is_zero() {
        let t = &a % &b;
        a = b;
        b = t;
    }
    a.abs()
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i == 0 {
                write!(f, "{:?}", term)?;
            } else if term.coeff.is_negative() {
                write!(
                    f,
                    " - {:?}",
                    Term::new(-term.coeff.clone(), term.monomial.clone())
                )?;
            } else {
                write!(f, " + {:?}", term)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Variable> for Polynomial {
    fn from(var: Variable) -> Self {
        Polynomial::from_var(var)
    }
}

impl From<BigRational> for Polynomial {
    fn from(c: BigRational) -> Self {
        Polynomial::constant(c)
    }
}

impl ops::Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Self::Output {
        Polynomial::neg(&self)
    }
}

impl ops::Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Self::Output {
        Polynomial::neg(self)
    }
}

impl ops::Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Self::Output {
        Polynomial::add(&self, &rhs)
    }
}

impl ops::Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Self::Output {
        Polynomial::add(self, rhs)
    }
}

impl ops::Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Self) -> Self::Output {
        Polynomial::sub(&self, &rhs)
    }
}

impl ops::Sub<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Self::Output {
        Polynomial::sub(self, rhs)
    }
}

impl ops::Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Self::Output {
        Polynomial::mul(&self, &rhs)
    }
}

impl ops::Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Self::Output {
        Polynomial::mul(self, rhs)
    }
}
