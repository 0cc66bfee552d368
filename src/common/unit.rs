//! Unit conversion utilities.
//!
//! Every unit carries an integer `(mul, div)` ratio to the millimetre, so a
//! conversion between two units is a single multiply by a gcd-reduced ratio.
//! Hundredths of a millimetre are the canonical integer unit used for
//! persisted geometry.

use crate::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Tolerance, in millimetres, under which two lengths compare equal.
pub const LENGTH_TOLERANCE_MM: f64 = 1e-6;

/// Supported length units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitLength {
    /// 1/100 millimeter
    Mm100,
    /// 1/10 millimeter
    Mm10,
    /// Millimeter
    Mm,
    /// Centimeter
    Cm,
    /// Meter
    M,
    /// Kilometer
    Km,
    /// Point (1/72 inch)
    Point,
    /// Pica (1/6 inch)
    Pica,
    /// Inch
    Inch,
    /// 1/10 inch
    Inch10,
    /// 1/100 inch
    Inch100,
    /// 1/1000 inch
    Inch1000,
    /// Foot
    Foot,
    /// Statute mile
    Mile,
    /// Presentation master unit (1/576 inch)
    Master,
    /// Twip (1/20 point)
    Twip,
    /// English Metric Unit (1/36000 mm)
    Emu,
    /// Pixel at 96 ppi (15 twips)
    Pixel,
    /// Character cell (210 twips)
    Char,
    /// Text line (312 twips)
    Line,
}

impl UnitLength {
    pub const ALL: [UnitLength; 20] = [
        Self::Mm100,
        Self::Mm10,
        Self::Mm,
        Self::Cm,
        Self::M,
        Self::Km,
        Self::Point,
        Self::Pica,
        Self::Inch,
        Self::Inch10,
        Self::Inch100,
        Self::Inch1000,
        Self::Foot,
        Self::Mile,
        Self::Master,
        Self::Twip,
        Self::Emu,
        Self::Pixel,
        Self::Char,
        Self::Line,
    ];

    /// Get the unit abbreviation
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mm100 => "mm100",
            Self::Mm10 => "mm10",
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::M => "m",
            Self::Km => "km",
            Self::Point => "pt",
            Self::Pica => "pc",
            Self::Inch => "in",
            Self::Inch10 => "in10",
            Self::Inch100 => "in100",
            Self::Inch1000 => "in1000",
            Self::Foot => "ft",
            Self::Mile => "mi",
            Self::Master => "master",
            Self::Twip => "twip",
            Self::Emu => "emu",
            Self::Pixel => "px",
            Self::Char => "ch",
            Self::Line => "line",
        }
    }

    /// Ratio `(mul, div)` such that `mm = value * mul / div`.
    #[inline]
    pub const fn mm_ratio(&self) -> (i64, i64) {
        match self {
            Self::Mm100 => (1, 100),
            Self::Mm10 => (1, 10),
            Self::Mm => (1, 1),
            Self::Cm => (10, 1),
            Self::M => (1000, 1),
            Self::Km => (1_000_000, 1),
            Self::Point => (254, 720),
            Self::Pica => (254, 60),
            Self::Inch => (254, 10),
            Self::Inch10 => (254, 100),
            Self::Inch100 => (254, 1000),
            Self::Inch1000 => (254, 10000),
            Self::Foot => (3048, 10),
            Self::Mile => (1_609_344, 1),
            Self::Master => (254, 5760),
            Self::Twip => (254, 14400),
            Self::Emu => (1, 36000),
            Self::Pixel => (254 * 15, 14400),
            Self::Char => (254 * 210, 14400),
            Self::Line => (254 * 312, 14400),
        }
    }

    /// Whether values in this unit are persisted as integers.
    #[inline]
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Mm100 | Self::Twip | Self::Emu)
    }

    /// Parse unit from string
    fn from_str_internal(s: &str) -> Option<Self> {
        match s {
            "mm100" => Some(Self::Mm100),
            "mm10" => Some(Self::Mm10),
            "mm" => Some(Self::Mm),
            "cm" => Some(Self::Cm),
            "m" => Some(Self::M),
            "km" => Some(Self::Km),
            "pt" => Some(Self::Point),
            "pc" => Some(Self::Pica),
            "in" | "inch" | "\"" => Some(Self::Inch),
            "in10" => Some(Self::Inch10),
            "in100" => Some(Self::Inch100),
            "in1000" => Some(Self::Inch1000),
            "ft" | "'" => Some(Self::Foot),
            "mi" => Some(Self::Mile),
            "master" => Some(Self::Master),
            "twip" | "twips" => Some(Self::Twip),
            "emu" => Some(Self::Emu),
            "px" => Some(Self::Pixel),
            "ch" => Some(Self::Char),
            "line" => Some(Self::Line),
            _ => None,
        }
    }
}

impl FromStr for UnitLength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_internal(s)
            .ok_or_else(|| Error::ParseError(format!("Unknown length unit '{}'", s)))
    }
}

impl fmt::Display for UnitLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[inline]
const fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Reduced `(mul, div)` ratio converting `from` values into `to` values.
pub fn ratio(from: UnitLength, to: UnitLength) -> (i64, i64) {
    let (mf, df) = from.mm_ratio();
    let (mt, dt) = to.mm_ratio();
    let mul = mf * dt;
    let div = df * mt;
    let g = gcd(mul, div);
    (mul / g, div / g)
}

/// Multiply `num` by `mul / div`.
///
/// Both factors must be positive.
pub fn mul_div(num: f64, mul: i64, div: i64) -> Result<f64> {
    if mul <= 0 || div <= 0 {
        return Err(Error::InvalidArgument(format!(
            "mul_div factors must be positive, got {}/{}",
            mul, div
        )));
    }
    Ok(num * mul as f64 / div as f64)
}

/// Convert `value` from one unit into another without rounding.
#[inline]
pub fn convert(value: f64, from: UnitLength, to: UnitLength) -> f64 {
    if from == to {
        return value;
    }
    let (mul, div) = ratio(from, to);
    value * mul as f64 / div as f64
}

/// Convert and round to the nearest integer, for persisted integer units.
#[inline]
pub fn convert_round(value: f64, from: UnitLength, to: UnitLength) -> i64 {
    convert(value, from, to).round() as i64
}

#[inline]
pub fn mm_to_mm100(mm: f64) -> i32 {
    convert_round(mm, UnitLength::Mm, UnitLength::Mm100) as i32
}

#[inline]
pub fn mm100_to_mm(mm100: i32) -> f64 {
    mm100 as f64 / 100.0
}

#[inline]
pub fn pt_to_mm100(pt: f64) -> i32 {
    convert_round(pt, UnitLength::Point, UnitLength::Mm100) as i32
}

#[inline]
pub fn mm100_to_pt(mm100: i32) -> f64 {
    convert(mm100 as f64, UnitLength::Mm100, UnitLength::Point)
}

#[inline]
pub fn twip_to_mm100(twips: i64) -> i32 {
    convert_round(twips as f64, UnitLength::Twip, UnitLength::Mm100) as i32
}

#[inline]
pub fn mm100_to_twip(mm100: i32) -> i64 {
    convert_round(mm100 as f64, UnitLength::Mm100, UnitLength::Twip)
}

#[inline]
pub fn inch_to_mm100(inches: f64) -> i32 {
    convert_round(inches, UnitLength::Inch, UnitLength::Mm100) as i32
}

/// Length value with unit
///
/// Immutable pair of a numeric value and the unit it is expressed in.
/// Two lengths are equal when they describe the same physical length
/// within [`LENGTH_TOLERANCE_MM`].
///
/// # Examples
///
/// ```
/// use docstyle::common::unit::{LengthValue, UnitLength};
///
/// let length = "2.5cm".parse::<LengthValue>().unwrap();
/// assert_eq!(length.value(), 2.5);
/// assert_eq!(length.unit(), UnitLength::Cm);
/// assert_eq!(length.to_mm100(), 2500);
///
/// let length = LengthValue::new(10.0, UnitLength::Point);
/// assert_eq!(length.to_string(), "10pt");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LengthValue {
    value: f64,
    unit: UnitLength,
}

impl LengthValue {
    /// Create a new length measurement
    #[inline]
    pub const fn new(value: f64, unit: UnitLength) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub const fn mm(value: f64) -> Self {
        Self::new(value, UnitLength::Mm)
    }

    #[inline]
    pub fn from_mm100(value: i32) -> Self {
        Self::new(value as f64, UnitLength::Mm100)
    }

    /// Get the numeric value
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Get the unit
    #[inline]
    pub fn unit(&self) -> UnitLength {
        self.unit
    }

    /// Express the same length in another unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use docstyle::common::unit::{LengthValue, UnitLength};
    ///
    /// let inches = LengthValue::new(100.0, UnitLength::Inch);
    /// let mm = inches.to_unit(UnitLength::Mm);
    /// assert!((mm.value() - 2540.0).abs() < 1e-9);
    /// ```
    #[inline]
    pub fn to_unit(&self, unit: UnitLength) -> Self {
        Self::new(convert(self.value, self.unit, unit), unit)
    }

    #[inline]
    pub fn to_mm(&self) -> f64 {
        convert(self.value, self.unit, UnitLength::Mm)
    }

    /// Canonical integer representation, rounded to nearest.
    #[inline]
    pub fn to_mm100(&self) -> i32 {
        convert_round(self.value, self.unit, UnitLength::Mm100) as i32
    }

    /// Multiply the length by a non-negative factor.
    pub fn scale(&self, factor: f64) -> Result<Self> {
        if !(factor >= 0.0) {
            return Err(Error::InvalidArgument(format!(
                "scale factor must be non-negative, got {}",
                factor
            )));
        }
        Ok(Self::new(self.value * factor, self.unit))
    }
}

impl From<f64> for LengthValue {
    /// Plain numbers are millimetres.
    fn from(mm: f64) -> Self {
        Self::mm(mm)
    }
}

impl FromStr for LengthValue {
    type Err = Error;

    /// Parse length from string (e.g., "2.5mm", "10pt"); no suffix means mm.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut digits = String::new();
        let mut suffix = String::new();
        let mut seen_dot = false;

        for c in s.chars() {
            let numeric = suffix.is_empty()
                && (c.is_ascii_digit()
                    || (c == '.' && !seen_dot)
                    || ((c == '-' || c == '+') && digits.is_empty()));
            if numeric {
                if c == '.' {
                    seen_dot = true;
                }
                digits.push(c);
            } else if !c.is_whitespace() {
                suffix.push(c);
            }
        }

        if digits.is_empty() {
            return Err(Error::ParseError(format!(
                "No numeric value found in '{}'",
                s
            )));
        }

        let value: f64 = digits.parse()?;
        let unit = if suffix.is_empty() {
            UnitLength::Mm
        } else {
            UnitLength::from_str(&suffix)?
        };

        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for LengthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

impl PartialEq for LengthValue {
    fn eq(&self, other: &Self) -> bool {
        if self.unit == other.unit {
            return self.value == other.value
                || (self.to_mm() - other.to_mm()).abs() < LENGTH_TOLERANCE_MM;
        }
        (self.to_mm() - other.to_mm()).abs() < LENGTH_TOLERANCE_MM
    }
}

impl PartialOrd for LengthValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        self.to_mm().partial_cmp(&other.to_mm())
    }
}
