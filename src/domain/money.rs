//! Euro amounts held as integer cents.
//!
//! Prices, ledger amounts and inventory value all flow through [`Money`];
//! the database stores the raw cent count.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// A monetary value in euro cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// `from_major_minor(12, 50)` is €12,50; only the major part carries the sign.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse an amount typed into a form.
    ///
    /// Accepts `12`, `12.5`, `12,50`, `1.234,56`, `1,234.56` and an optional
    /// leading `€`. The last `.` or `,` is the decimal separator when one or
    /// two digits follow it; a group of exactly three digits is read as a
    /// thousands separator instead.
    pub fn parse(input: &str) -> AppResult<Self> {
        let invalid = || AppError::validation(format!("'{}' is not a valid amount", input.trim()));

        let trimmed = input.trim().trim_start_matches('€').trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim()),
            None => (false, trimmed),
        };
        if body.is_empty() {
            return Err(invalid());
        }
        if !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return Err(invalid());
        }

        let (whole, fraction) = match body.rfind(['.', ',']) {
            Some(idx) => {
                let tail = &body[idx + 1..];
                match tail.len() {
                    1 | 2 => {
                        let whole = &body[..idx];
                        // "1.234.56" has no unambiguous reading
                        if whole.contains(&body[idx..idx + 1]) {
                            return Err(invalid());
                        }
                        (whole, tail)
                    }
                    3 => (body, ""),
                    _ => return Err(invalid()),
                }
            }
            None => (body, ""),
        };

        let digits = grouped_digits(whole).ok_or_else(invalid)?;
        if digits.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.contains(['.', ',']) {
            return Err(invalid());
        }

        let major: i64 = if digits.is_empty() {
            0
        } else {
            digits.parse().map_err(|_| invalid())?
        };
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// `€1.234,56`: thousands with `.`, decimals with `,`.
    pub fn format_eur(&self) -> String {
        let abs = self.0.unsigned_abs();
        let major = (abs / 100).to_string();
        let minor = abs % 100;

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}€{},{:02}", sign, grouped, minor)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    pub fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_mul(self, quantity: i64) -> Money {
        Money(self.0.saturating_mul(quantity))
    }

    /// Plain `12.50` rendering used to pre-fill form inputs.
    pub fn to_input_value(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Digits of an integer part that may use one kind of thousands separator.
///
/// `1.234.567` and `1,234` are fine; `1.2.3`, `12.34` and `1.234,567` are not.
fn grouped_digits(whole: &str) -> Option<String> {
    let separator = match whole.find(['.', ',']) {
        Some(idx) => &whole[idx..idx + 1],
        None => return whole.chars().all(|c| c.is_ascii_digit()).then(|| whole.to_string()),
    };

    let mut groups = whole.split(separator);
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 {
        return None;
    }

    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    digits.chars().all(|c| c.is_ascii_digit()).then_some(digits)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_eur())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, quantity: i64) -> Money {
        Money(self.0 * quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}
