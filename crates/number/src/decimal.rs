//! A decimal number that can be "not a number".
//!
//! View computations over chain data need a way to express "this value cannot
//! be computed yet" without failing, and to carry that through further
//! arithmetic. [`Decimal::NaN`] plays that role: any operation involving it,
//! as well as a division by zero, yields `NaN` again.

use {
    crate::conversions,
    bigdecimal::{BigDecimal, Zero},
    std::{
        fmt::{self, Display, Formatter},
        ops::{Add, Div, Mul, Sub},
        str::FromStr,
    },
};

/// An arbitrary precision decimal or `NaN`.
///
/// Unlike IEEE floats two `NaN` values compare equal, which keeps derived
/// values structurally comparable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decimal {
    Finite(BigDecimal),
    NaN,
}

impl Decimal {
    pub fn nan() -> Self {
        Self::NaN
    }

    pub fn zero() -> Self {
        Self::Finite(BigDecimal::zero())
    }

    pub fn one() -> Self {
        Self::Finite(BigDecimal::from(1))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Self::NaN)
    }

    /// Rounds half-even to `digits` fractional digits.
    pub fn round(&self, digits: i64) -> Self {
        self.map(|value| value.round(digits))
    }

    /// Strictly greater than. `NaN` is never greater nor smaller than
    /// anything.
    pub fn gt(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => a > b,
            _ => false,
        }
    }

    fn map(&self, f: impl FnOnce(&BigDecimal) -> BigDecimal) -> Self {
        match self {
            Self::Finite(value) => Self::Finite(f(value)),
            Self::NaN => Self::NaN,
        }
    }

    fn zip(&self, other: &Self, f: impl FnOnce(&BigDecimal, &BigDecimal) -> Self) -> Self {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => f(a, b),
            _ => Self::NaN,
        }
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigDecimal> for Decimal {
    fn from(value: BigDecimal) -> Self {
        Self::Finite(value)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::Finite(BigDecimal::from(value))
    }
}

impl FromStr for Decimal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "NaN" {
            return Ok(Self::NaN);
        }
        conversions::decimal_from_str(s).map(Self::Finite)
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{value}"),
            Self::NaN => f.write_str("NaN"),
        }
    }
}

impl Add for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: Self) -> Decimal {
        self.zip(rhs, |a, b| Decimal::Finite(a + b))
    }
}

impl Sub for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Self) -> Decimal {
        self.zip(rhs, |a, b| Decimal::Finite(a - b))
    }
}

impl Mul for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Self) -> Decimal {
        self.zip(rhs, |a, b| Decimal::Finite(a * b))
    }
}

/// Division by zero yields `NaN` instead of panicking.
impl Div for &Decimal {
    type Output = Decimal;

    fn div(self, rhs: Self) -> Decimal {
        self.zip(rhs, |a, b| {
            if b.is_zero() {
                Decimal::NaN
            } else {
                Decimal::Finite(a / b)
            }
        })
    }
}

macro_rules! forward_owned_op {
    ($trait:ident, $method:ident) => {
        impl $trait for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: Self) -> Decimal {
                (&self).$method(&rhs)
            }
        }
    };
}

forward_owned_op!(Add, add);
forward_owned_op!(Sub, sub);
forward_owned_op!(Mul, mul);
forward_owned_op!(Div, div);
