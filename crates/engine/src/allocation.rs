//! Allocation of donations to projects.
//!
//! An allocation pass walks the open projects in creation order and fills
//! each one with the open donations, again in creation order, until either
//! side runs out. The pass is a pure computation over the two slices: it
//! only mutates the [`Funding`] of the records it is given and never touches
//! storage.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use engine::{Funding, allocation::allocate};
//!
//! let now = Utc::now();
//! let mut projects = vec![Funding::new(100, now).unwrap(), Funding::new(50, now).unwrap()];
//! let mut donations = vec![Funding::new(120, now).unwrap()];
//!
//! let allocation = allocate(&mut projects, &mut donations, now);
//!
//! assert_eq!(allocation.total(), 120);
//! assert_eq!(projects[0].invested_amount, 100);
//! assert_eq!(projects[1].invested_amount, 20);
//! assert!(donations[0].is_closed);
//! ```
//!
//! [`Funding`]: crate::Funding
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Investable;

/// Money moved from one donation to one project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Transfer {
    /// Index in the projects slice.
    pub project: usize,
    /// Index in the donations slice.
    pub donation: usize,
    pub amount: i64,
}

/// Result of an allocation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub transfers: Vec<Transfer>,
    /// Indices of the projects closed during the pass.
    pub closed_projects: Vec<usize>,
    /// Indices of the donations closed during the pass.
    pub closed_donations: Vec<usize>,
}

impl Allocation {
    /// Total amount moved during the pass.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Indices of the projects that received money, in order.
    #[must_use]
    pub fn funded_projects(&self) -> BTreeSet<usize> {
        self.transfers.iter().map(|t| t.project).collect()
    }

    /// Indices of the donations that gave money, in order.
    #[must_use]
    pub fn spent_donations(&self) -> BTreeSet<usize> {
        self.transfers.iter().map(|t| t.donation).collect()
    }
}

/// Runs one allocation pass.
///
/// Both slices must be ordered by creation time, oldest first. Closed records
/// are skipped. Records must respect `0 <= invested_amount <= target_amount`;
/// anything else is a caller bug.
///
/// Every closure is stamped with `now`.
pub fn allocate<P, D>(projects: &mut [P], donations: &mut [D], now: DateTime<Utc>) -> Allocation
where
    P: Investable,
    D: Investable,
{
    let mut allocation = Allocation::default();
    // Donations only ever close, so the first open one never moves backwards.
    let mut next_donation = 0;

    for (project_index, project) in projects.iter_mut().enumerate() {
        debug_assert!(project.funding().validate().is_ok());
        if !project.is_open() {
            continue;
        }

        while project.is_open() && next_donation < donations.len() {
            let donation = &mut donations[next_donation];
            debug_assert!(donation.funding().validate().is_ok());
            if !donation.is_open() {
                next_donation += 1;
                continue;
            }

            let amount = project.remaining().min(donation.remaining());
            project.funding_mut().invest(amount, now);
            donation.funding_mut().invest(amount, now);
            allocation.transfers.push(Transfer {
                project: project_index,
                donation: next_donation,
                amount,
            });

            if !donation.is_open() {
                allocation.closed_donations.push(next_donation);
                next_donation += 1;
            }
        }

        if !project.is_open() {
            allocation.closed_projects.push(project_index);
        }
        if next_donation == donations.len() {
            break;
        }
    }

    allocation
}
