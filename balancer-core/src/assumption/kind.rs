//! The eight-element sign lattice.

use std::fmt;

const NEG: u8 = 0b100;
const POS: u8 = 0b010;
const ZERO: u8 = 0b001;

/// The set of signs a quantity may still take.
///
/// Encoded as a subset of `{negative, positive, zero}`; conjunction is
/// intersection and negation is complement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssumptionType(u8);

impl AssumptionType {
    /// No information.
    pub const TRUE: Self = Self(NEG | POS | ZERO);
    /// Unsatisfiable.
    pub const FALSE: Self = Self(0);
    /// `= 0`
    pub const ZERO: Self = Self(ZERO);
    /// `<> 0`
    pub const NONZERO: Self = Self(NEG | POS);
    /// `> 0`
    pub const POSITIVE: Self = Self(POS);
    /// `< 0`
    pub const NEGATIVE: Self = Self(NEG);
    /// `>= 0`
    pub const NONNEGATIVE: Self = Self(POS | ZERO);
    /// `<= 0`
    pub const NONPOSITIVE: Self = Self(NEG | ZERO);

    /// All eight types.
    pub const ALL: [Self; 8] = [
        Self::TRUE,
        Self::FALSE,
        Self::ZERO,
        Self::NONZERO,
        Self::POSITIVE,
        Self::NEGATIVE,
        Self::NONNEGATIVE,
        Self::NONPOSITIVE,
    ];

    /// Decode from the 3-bit representation.
    pub fn from_code(code: u8) -> Option<Self> {
        (code <= 0b111).then_some(Self(code))
    }

    /// The 3-bit representation.
    #[inline]
    pub fn code(self) -> u8 {
        self.0
    }

    /// Intersection.
    #[inline]
    #[must_use]
    pub fn conjoin(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Union.
    #[inline]
    #[must_use]
    pub fn disjoin(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Complement.
    #[inline]
    #[must_use]
    pub fn negate(self) -> Self {
        Self(!self.0 & 0b111)
    }

    /// The type of `-f` given the type of `f`.
    #[inline]
    #[must_use]
    pub fn flip(self) -> Self {
        let neg = (self.0 & NEG) >> 1;
        let pos = (self.0 & POS) << 1;
        Self(neg | pos | (self.0 & ZERO))
    }

    /// Whether every sign allowed by `self` is allowed by `other`.
    #[inline]
    pub fn implies(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Returns true for `FALSE`.
    #[inline]
    pub fn is_false(self) -> bool {
        self.0 == 0
    }

    /// Returns true for `TRUE`.
    #[inline]
    pub fn is_true(self) -> bool {
        self == Self::TRUE
    }

    /// Whether a value with the given sign is admitted.
    pub fn admits(self, sign: std::cmp::Ordering) -> bool {
        let bit = match sign {
            std::cmp::Ordering::Less => NEG,
            std::cmp::Ordering::Greater => POS,
            std::cmp::Ordering::Equal => ZERO,
        };
        self.0 & bit != 0
    }

    /// The relational operator for `f ⋈ 0`, or `None` for `TRUE`/`FALSE`.
    pub fn operator(self) -> Option<&'static str> {
        match self {
            Self::ZERO => Some("="),
            Self::NONZERO => Some("<>"),
            Self::POSITIVE => Some(">"),
            Self::NEGATIVE => Some("<"),
            Self::NONNEGATIVE => Some(">="),
            Self::NONPOSITIVE => Some("<="),
            _ => None,
        }
    }

    /// Lower-case name.
    pub fn name(self) -> &'static str {
        match self.0 {
            0b111 => "true",
            0b000 => "false",
            0b001 => "zero",
            0b110 => "nonzero",
            0b010 => "positive",
            0b100 => "negative",
            0b011 => "nonnegative",
            _ => "nonpositive",
        }
    }
}

impl fmt::Debug for AssumptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_uppercase())
    }
}

impl fmt::Display for AssumptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_conjoin_table() {
        use AssumptionType as T;
        assert_eq!(T::POSITIVE.conjoin(T::NONNEGATIVE), T::POSITIVE);
        assert_eq!(T::NONNEGATIVE.conjoin(T::NONPOSITIVE), T::ZERO);
        assert_eq!(T::NONZERO.conjoin(T::NONNEGATIVE), T::POSITIVE);
        assert_eq!(T::POSITIVE.conjoin(T::NEGATIVE), T::FALSE);
        assert_eq!(T::TRUE.conjoin(T::NEGATIVE), T::NEGATIVE);
    }

    #[test]
    fn test_negate_and_flip() {
        use AssumptionType as T;
        assert_eq!(T::ZERO.negate(), T::NONZERO);
        assert_eq!(T::POSITIVE.negate(), T::NONPOSITIVE);
        assert_eq!(T::TRUE.negate(), T::FALSE);

        assert_eq!(T::POSITIVE.flip(), T::NEGATIVE);
        assert_eq!(T::NONNEGATIVE.flip(), T::NONPOSITIVE);
        for t in [T::TRUE, T::FALSE, T::ZERO, T::NONZERO] {
            assert_eq!(t.flip(), t);
        }
    }

    #[test]
    fn test_implies_and_admits() {
        use AssumptionType as T;
        assert!(T::POSITIVE.implies(T::NONNEGATIVE));
        assert!(T::ZERO.implies(T::NONPOSITIVE));
        assert!(!T::NONNEGATIVE.implies(T::POSITIVE));
        assert!(T::FALSE.implies(T::ZERO));

        assert!(T::NONNEGATIVE.admits(Ordering::Equal));
        assert!(!T::NONZERO.admits(Ordering::Equal));
        assert!(T::NONZERO.admits(Ordering::Less));
    }

    #[test]
    fn test_operators() {
        assert_eq!(AssumptionType::NONPOSITIVE.operator(), Some("<="));
        assert_eq!(AssumptionType::NONZERO.operator(), Some("<>"));
        assert_eq!(AssumptionType::TRUE.operator(), None);
        assert_eq!(AssumptionType::from_code(0b011), Some(AssumptionType::NONNEGATIVE));
        assert_eq!(AssumptionType::from_code(8), None);
    }
}
