//! Command structs for engine operations.
//!
//! These types group parameters for write operations (project and donation
//! creation, project updates), keeping call sites readable and avoiding long
//! argument lists.

/// Create a charity project.
#[derive(Clone, Debug)]
pub struct ProjectNew {
    pub name: String,
    pub description: String,
    pub target_amount: i64,
}

impl ProjectNew {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, target_amount: i64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            target_amount,
        }
    }
}

/// Partially update a charity project. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<i64>,
}

impl ProjectUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn target_amount(mut self, target_amount: i64) -> Self {
        self.target_amount = Some(target_amount);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.target_amount.is_none()
    }
}

/// Create a donation.
#[derive(Clone, Debug)]
pub struct DonationNew {
    pub user_id: String,
    pub target_amount: i64,
    pub comment: Option<String>,
}

impl DonationNew {
    #[must_use]
    pub fn new(user_id: impl Into<String>, target_amount: i64) -> Self {
        Self {
            user_id: user_id.into(),
            target_amount,
            comment: None,
        }
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
