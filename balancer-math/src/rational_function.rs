//! Quotients of polynomials in reduced normal form.
//!
//! A [`RationalFunction`] is always stored simplified:
//!
//! - a zero numerator forces the denominator to `1`;
//! - the monomial content shared by numerator and denominator is cancelled;
//! - the denominator is primitive (coprime integer coefficients, positive
//!   leading coefficient) and all scalar content lives in the numerator;
//! - a denominator that divides the numerator exactly is folded away, which
//!   in particular collapses `±d/d` to `±1` and constant denominators to `1`.
//!
//! Because of this, two functions that are rational multiples of each other
//! have the same denominator and numerators differing by that scalar, which
//! is what [`RationalFunction::cancel_scalar_content`] exposes. Equality of
//! the normal forms is a sound but incomplete test for equality of functions.

use crate::polynomial::{Monomial, Polynomial};
use crate::variable::Variable;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rustc_hash::FxHashMap;
use std::fmt;
use std::ops;

/// A quotient of two polynomials.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RationalFunction {
    num: Polynomial,
    den: Polynomial,
}

impl RationalFunction {
    /// `num / den`, or `None` if `den` is zero.
    pub fn new(num: Polynomial, den: Polynomial) -> Option<Self> {
        if den.is_zero() {
            return None;
        }
        let mut f = Self { num, den };
        f.simplify();
        Some(f)
    }

    /// The zero function.
    pub fn zero() -> Self {
        Self {
            num: Polynomial::zero(),
            den: Polynomial::one(),
        }
    }

    /// The constant `1`.
    pub fn one() -> Self {
        Self {
            num: Polynomial::one(),
            den: Polynomial::one(),
        }
    }

    /// A constant.
    pub fn constant(c: BigRational) -> Self {
        Self {
            num: Polynomial::constant(c),
            den: Polynomial::one(),
        }
    }

    /// A constant from an integer.
    pub fn from_integer(n: i64) -> Self {
        Self::constant(BigRational::from_integer(BigInt::from(n)))
    }

    /// A polynomial over `1`.
    pub fn from_polynomial(num: Polynomial) -> Self {
        Self {
            num,
            den: Polynomial::one(),
        }
    }

    /// The function `var`.
    pub fn from_var(var: Variable) -> Self {
        Self::from_polynomial(Polynomial::from_var(var))
    }

    /// The numerator.
    #[inline]
    pub fn numerator(&self) -> &Polynomial {
        &self.num
    }

    /// The denominator.
    #[inline]
    pub fn denominator(&self) -> &Polynomial {
        &self.den
    }

    /// Bring into normal form.
    fn simplify(&mut self) {
        if self.num.is_zero() {
            self.den = Polynomial::one();
            return;
        }

        let shared = self
            .num
            .monomial_content()
            .gcd(&self.den.monomial_content());
        if !shared.is_unit() {
            self.num = divide_out(&self.num, &shared);
            self.den = divide_out(&self.den, &shared);
        }

        let (num_content, num_prim) = self.num.cancel_rational_content();
        let (den_content, den_prim) = self.den.cancel_rational_content();
        let scalar = num_content / den_content;

        match num_prim.exact_div(&den_prim) {
            Some(quotient) => {
                self.num = quotient.scale(&scalar);
                self.den = Polynomial::one();
            }
            None => {
                self.num = num_prim.scale(&scalar);
                self.den = den_prim;
            }
        }
    }

    /// Returns true for the zero function.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Returns true for the constant `1`.
    pub fn is_unity(&self) -> bool {
        self.num.is_unity() && self.den.is_unity()
    }

    /// Returns true if the function has no variables.
    pub fn is_constant(&self) -> bool {
        self.num.is_constant() && self.den.is_constant()
    }

    /// The value of a constant function.
    pub fn constant_value(&self) -> Option<BigRational> {
        let n = self.num.constant_value()?;
        let d = self.den.constant_value()?;
        Some(n / d)
    }

    /// Returns true if the numerator has no variables.
    pub fn has_constant_numerator(&self) -> bool {
        self.num.is_constant()
    }

    /// Returns true for a positive constant.
    pub fn is_positive(&self) -> bool {
        self.constant_value().is_some_and(|c| c.is_positive())
    }

    /// Returns true for a negative constant.
    pub fn is_negative(&self) -> bool {
        self.constant_value().is_some_and(|c| c.is_negative())
    }

    /// Total number of terms in numerator and denominator.
    pub fn num_terms(&self) -> usize {
        self.num.num_terms() + self.den.num_terms()
    }

    /// Variables of numerator and denominator, sorted.
    pub fn vars(&self) -> Vec<Variable> {
        let mut vars = self.num.vars();
        vars.extend(self.den.vars());
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// Negate.
    pub fn neg(&self) -> RationalFunction {
        Self {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    /// Add.
    pub fn add(&self, other: &RationalFunction) -> RationalFunction {
        if other.is_zero() {
            return self.clone();
        }
        if self.is_zero() {
            return other.clone();
        }
        let (num, den) = if self.den == other.den {
            (self.num.add(&other.num), self.den.clone())
        } else {
            (
                self.num.mul(&other.den).add(&other.num.mul(&self.den)),
                self.den.mul(&other.den),
            )
        };
        let mut f = Self { num, den };
        f.simplify();
        f
    }

    /// Subtract.
    pub fn sub(&self, other: &RationalFunction) -> RationalFunction {
        self.add(&other.neg())
    }

    /// Multiply.
    pub fn mul(&self, other: &RationalFunction) -> RationalFunction {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        if self.is_unity() {
            return other.clone();
        }
        if other.is_unity() {
            return self.clone();
        }
        let mut f = Self {
            num: self.num.mul(&other.num),
            den: self.den.mul(&other.den),
        };
        f.simplify();
        f
    }

    /// Multiply by a scalar.
    pub fn scale(&self, c: &BigRational) -> RationalFunction {
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            num: self.num.scale(c),
            den: self.den.clone(),
        }
    }

    /// Reciprocal, or `None` for zero.
    pub fn inverse(&self) -> Option<RationalFunction> {
        Self::new(self.den.clone(), self.num.clone())
    }

    /// Divide, or `None` when dividing by zero.
    pub fn div(&self, other: &RationalFunction) -> Option<RationalFunction> {
        Some(self.mul(&other.inverse()?))
    }

    /// `self^k`.
    pub fn pow(&self, k: u32) -> RationalFunction {
        let mut f = Self {
            num: self.num.pow(k),
            den: self.den.pow(k),
        };
        f.simplify();
        f
    }

    /// Split into `(c, g)` with `self = c * g`, where `g`'s numerator is
    /// primitive with a positive leading coefficient.
    ///
    /// Functions that are rational multiples of one another share `g`.
    pub fn cancel_scalar_content(&self) -> (BigRational, RationalFunction) {
        if self.is_zero() {
            return (BigRational::one(), self.clone());
        }
        let (c, num) = self.num.cancel_rational_content();
        (
            c,
            Self {
                num,
                den: self.den.clone(),
            },
        )
    }

    /// Substitute a polynomial for a variable.
    ///
    /// A substitution that makes the denominator vanish leaves the function
    /// unchanged.
    pub fn substitute(&self, var: Variable, value: &Polynomial) -> RationalFunction {
        if !self.num.contains(var) && !self.den.contains(var) {
            return self.clone();
        }
        let num = self.num.substitute(var, value);
        let den = self.den.substitute(var, value);
        Self::new(num, den).unwrap_or_else(|| self.clone())
    }

    /// Evaluate; `None` if a variable is unbound or the denominator vanishes.
    pub fn eval(&self, assignment: &FxHashMap<Variable, BigRational>) -> Option<BigRational> {
        let d = self.den.eval(assignment)?;
        if d.is_zero() {
            return None;
        }
        Some(self.num.eval(assignment)? / d)
    }
}

fn divide_out(poly: &Polynomial, m: &Monomial) -> Polynomial {
    poly.div_monomial(m).unwrap_or_else(|| poly.clone())
}

impl Default for RationalFunction {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_unity() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "({})/({})", self.num, self.den)
        }
    }
}

impl fmt::Display for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Polynomial> for RationalFunction {
    fn from(p: Polynomial) -> Self {
        Self::from_polynomial(p)
    }
}

impl From<BigRational> for RationalFunction {
    fn from(c: BigRational) -> Self {
        Self::constant(c)
    }
}

impl ops::Neg for &RationalFunction {
    type Output = RationalFunction;

    fn neg(self) -> Self::Output {
        RationalFunction::neg(self)
    }
}

impl ops::Neg for RationalFunction {
    type Output = RationalFunction;

    fn neg(self) -> Self::Output {
        RationalFunction::neg(&self)
    }
}

impl ops::Add<&RationalFunction> for &RationalFunction {
    type Output = RationalFunction;

    fn add(self, rhs: &RationalFunction) -> Self::Output {
        RationalFunction::add(self, rhs)
    }
}

impl ops::Sub<&RationalFunction> for &RationalFunction {
    type Output = RationalFunction;

    fn sub(self, rhs: &RationalFunction) -> Self::Output {
        RationalFunction::sub(self, rhs)
    }
}

impl ops::Mul<&RationalFunction> for &RationalFunction {
    type Output = RationalFunction;

    fn mul(self, rhs: &RationalFunction) -> Self::Output {
        RationalFunction::mul(self, rhs)
    }
}
