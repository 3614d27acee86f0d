use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use arcstr::ArcStr;

/// Amount in minor currency units (e.g. cents). Signed so a single type
/// covers both payment amounts and net balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> i64 {
        self.0.abs()
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn signum(self) -> i64 {
        self.0.signum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Opaque unique token identifying a participant. The token text comes from
/// an injected id source; nothing in the ledger inspects its structure.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(ArcStr);

impl ParticipantId {
    pub fn new(token: impl Into<ArcStr>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A participant's net balance at a point in time.
/// Positive: owes money (borrower). Negative: is owed money (lender).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TotalDebt {
    pub person: ParticipantId,
    pub amount: Money,
}

/// One proposed transfer produced by the settlement engine. Never executed
/// by this crate, only suggested. `amount` is always strictly positive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestedPayment {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}
