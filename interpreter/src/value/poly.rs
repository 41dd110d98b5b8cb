use std::fmt::Display;

use num_traits::{ToPrimitive, Zero};

use crate::error::ErrorKind;

use super::{Expression, MAX_DEGREE};

/// `a0 + a1*x + ... + an*x^n`, coefficients stored by ascending power.
///
/// Every constructor and every arithmetic result is simplified: the leading
/// coefficient is non-zero, except for the zero polynomial `[0]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Self::constant(0.0)
    }

    pub fn one() -> Self {
        Self::constant(1.0)
    }

    pub fn constant(value: f64) -> Self {
        Polynomial {
            coefficients: vec![value],
        }
    }

    pub fn variable() -> Self {
        Polynomial {
            coefficients: vec![0.0, 1.0],
        }
    }

    pub fn from_coefficients(coefficients: impl Into<Vec<f64>>) -> Self {
        Polynomial {
            coefficients: coefficients.into(),
        }
        .simplify()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn coefficient(&self, power: usize) -> f64 {
        self.coefficients.get(power).copied().unwrap_or(0.0)
    }

    pub fn is_simplified(&self) -> bool {
        match self.coefficients.split_last() {
            Some((_, [])) => true,
            Some((leading, _)) => !leading.is_zero(),
            None => false,
        }
    }

    pub fn simplify(mut self) -> Self {
        while self.coefficients.len() > 1
            && self.coefficients.last().map_or(false, Zero::is_zero)
        {
            self.coefficients.pop();
        }
        if self.coefficients.is_empty() {
            self.coefficients.push(0.0);
        }
        self
    }

    fn checked(self) -> Result<Self, ErrorKind> {
        let simplified = self.simplify();
        if simplified.degree() >= MAX_DEGREE {
            Err(ErrorKind::DegreeTooLarge)
        } else {
            Ok(simplified)
        }
    }

    fn zip_with(&self, other: &Self, op: impl Fn(f64, f64) -> f64) -> Result<Self, ErrorKind> {
        let len = self.coefficients.len().max(other.coefficients.len());
        Polynomial {
            coefficients: (0..len)
                .map(|i| op(self.coefficient(i), other.coefficient(i)))
                .collect(),
        }
        .checked()
    }

    pub fn add(&self, other: &Self) -> Result<Self, ErrorKind> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn subtract(&self, other: &Self) -> Result<Self, ErrorKind> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn multiply(&self, other: &Self) -> Result<Self, ErrorKind> {
        let mut coefficients = vec![0.0; self.degree() + other.degree() + 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        Polynomial { coefficients }.checked()
    }

    pub fn divide(&self, divisor: &Self) -> Result<Self, ErrorKind> {
        let divisor = divisor.as_num().ok_or(ErrorKind::NonConstantDivisor)?;
        if divisor.is_zero() {
            return Err(ErrorKind::DivideByZero);
        }
        Polynomial {
            coefficients: self.coefficients.iter().map(|c| c / divisor).collect(),
        }
        .checked()
    }

    /// Truncating remainder: the quotient is rounded toward zero, so the
    /// result takes the sign of the dividend.
    pub fn modulo(&self, modulus: &Self) -> Result<Self, ErrorKind> {
        let modulus = modulus.as_num().ok_or(ErrorKind::NonConstantModulus)?;
        if modulus.is_zero() {
            return Err(ErrorKind::ModuloByZero);
        }
        let dividend = self.as_num().ok_or(ErrorKind::NonConstantDividend)?;
        Polynomial::constant(dividend - (dividend / modulus).trunc() * modulus).checked()
    }

    pub fn power(&self, exponent: &Self) -> Result<Self, ErrorKind> {
        let exponent = exponent.as_num().ok_or(ErrorKind::ExponentNotConstant)?;
        if exponent < 0.0 {
            return Err(ErrorKind::ExponentNegative);
        }
        if exponent.fract() != 0.0 {
            return Err(ErrorKind::ExponentNotInteger);
        }
        let fits = |n: u64| (self.degree() as u64).saturating_mul(n) < MAX_DEGREE as u64;
        match (exponent.to_u64(), self.as_num()) {
            (Some(n), Some(_)) => self.power_quick(n),
            (Some(n), None) if fits(n) => self.power_quick(n),
            (None, Some(base)) => Polynomial::constant(base.powf(exponent)).checked(),
            _ => Err(ErrorKind::DegreeTooLarge),
        }
    }

    fn power_quick(&self, n: u64) -> Result<Self, ErrorKind> {
        match n {
            0 => Ok(Polynomial::one()),
            1 => Ok(self.clone()),
            _ => {
                let half = self.power_quick(n / 2)?;
                let rest = self.power_quick(n % 2)?;
                half.multiply(&half)?.multiply(&rest)
            }
        }
    }
}

impl Expression for Polynomial {
    fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, coefficient| acc * x + coefficient)
    }

    fn derivative(&self) -> Self {
        Polynomial::from_coefficients(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(power, coefficient)| coefficient * power as f64)
                .collect::<Vec<_>>(),
        )
    }

    fn as_num(&self) -> Option<f64> {
        match self.coefficients.as_slice() {
            [value] => Some(*value),
            _ => None,
        }
    }

    fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Polynomial::zero()
    }
}

impl From<f64> for Polynomial {
    fn from(value: f64) -> Self {
        Polynomial::constant(value)
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (power, coefficient) in self.coefficients.iter().enumerate().rev() {
            if coefficient.is_zero() {
                continue;
            }
            if first {
                if *coefficient < 0.0 {
                    write!(f, "-")?;
                }
                first = false;
            } else if *coefficient < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            let magnitude = coefficient.abs();
            match power {
                0 => write!(f, "{magnitude}")?,
                _ if magnitude != 1.0 => write!(f, "{magnitude}")?,
                _ => {}
            }
            match power {
                0 => {}
                1 => write!(f, "x")?,
                _ => write!(f, "x^{power}")?,
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
