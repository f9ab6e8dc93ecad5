//! The module contains the funding state shared by projects and donations.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Funding state of an investable entity.
///
/// A project collects money up to `target_amount`, a donation gives away its
/// `target_amount`. Both track how much has already moved through
/// `invested_amount`. Amounts are stored as integer minor units (`i64`).
///
/// Once `invested_amount` reaches `target_amount` the entity is closed and
/// `closed_at` is stamped. A closed entity is never reopened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    pub target_amount: i64,
    pub invested_amount: i64,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Funding {
    /// Open funding with nothing invested yet.
    pub fn new(target_amount: i64, created_at: DateTime<Utc>) -> ResultEngine<Self> {
        if target_amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "target_amount must be > 0".to_string(),
            ));
        }

        Ok(Self {
            target_amount,
            invested_amount: 0,
            is_closed: false,
            created_at,
            closed_at: None,
        })
    }

    /// Amount still missing to reach the target.
    #[must_use]
    pub fn remaining(&self) -> i64 {
        self.target_amount - self.invested_amount
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.is_closed
    }

    /// Moves `amount` into this funding, closing it when the target is hit.
    ///
    /// The caller guarantees `0 <= amount <= remaining()`.
    pub fn invest(&mut self, amount: i64, now: DateTime<Utc>) {
        debug_assert!(amount >= 0 && amount <= self.remaining());
        self.invested_amount += amount;
        self.close_if_full(now);
    }

    /// Changes the target of an open funding.
    ///
    /// The target can never drop below what is already invested. Setting it
    /// exactly to the invested amount closes the funding.
    pub fn retarget(&mut self, target_amount: i64, now: DateTime<Utc>) -> ResultEngine<()> {
        if target_amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "target_amount must be > 0".to_string(),
            ));
        }
        if target_amount < self.invested_amount {
            return Err(EngineError::InvalidAmount(format!(
                "target_amount {target_amount} is lower than the invested amount {}",
                self.invested_amount
            )));
        }

        self.target_amount = target_amount;
        self.close_if_full(now);
        Ok(())
    }

    /// Checks the bounds every stored funding must respect.
    pub fn validate(&self) -> ResultEngine<()> {
        if self.target_amount <= 0 || self.invested_amount < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "negative amounts (target {}, invested {})",
                self.target_amount, self.invested_amount
            )));
        }
        if self.invested_amount > self.target_amount {
            return Err(EngineError::InvalidAmount(format!(
                "invested amount {} exceeds target {}",
                self.invested_amount, self.target_amount
            )));
        }
        if self.is_closed != (self.invested_amount == self.target_amount) {
            return Err(EngineError::InvalidAmount(
                "closed flag does not match the invested amount".to_string(),
            ));
        }
        Ok(())
    }

    fn close_if_full(&mut self, now: DateTime<Utc>) {
        if self.invested_amount == self.target_amount && !self.is_closed {
            self.is_closed = true;
            self.closed_at = Some(now);
        }
    }
}

/// Something money can be invested into or out of.
pub trait Investable {
    fn funding(&self) -> &Funding;

    fn funding_mut(&mut self) -> &mut Funding;

    fn remaining(&self) -> i64 {
        self.funding().remaining()
    }

    fn is_open(&self) -> bool {
        self.funding().is_open()
    }
}

impl Investable for Funding {
    fn funding(&self) -> &Funding {
        self
    }

    fn funding_mut(&mut self) -> &mut Funding {
        self
    }
}
