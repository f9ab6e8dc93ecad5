use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod project {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub name: String,
        pub description: String,
        pub full_amount: i64,
    }

    /// Request body for `PATCH /charity_project/{id}`.
    ///
    /// Missing fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProjectUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub full_amount: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectView {
        pub id: i64,
        pub name: String,
        pub description: String,
        pub full_amount: i64,
        pub invested_amount: i64,
        pub fully_invested: bool,
        pub create_date: DateTime<Utc>,
        pub close_date: Option<DateTime<Utc>>,
    }
}

pub mod donation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationNew {
        pub full_amount: i64,
        pub comment: Option<String>,
    }

    /// What a donor sees about their own donations.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationView {
        pub id: i64,
        pub comment: Option<String>,
        pub full_amount: i64,
        pub create_date: DateTime<Utc>,
    }

    /// Superuser view, including the investment state.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationFullView {
        pub id: i64,
        pub user_id: String,
        pub comment: Option<String>,
        pub full_amount: i64,
        pub invested_amount: i64,
        pub fully_invested: bool,
        pub create_date: DateTime<Utc>,
        pub close_date: Option<DateTime<Utc>>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportCreated {
        pub url: String,
        pub projects: usize,
    }
}
