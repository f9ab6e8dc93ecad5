//! Charity fund engine.
//!
//! Donors give money, administrators open charity projects with a target
//! amount, and every new project or donation triggers an allocation pass that
//! moves the waiting money into the open projects, oldest first.
//!
//! The pure allocation lives in [`allocation`]; [`Engine`] wraps it with the
//! storage and the lifecycle rules of projects and donations.

pub use commands::{DonationNew, ProjectNew, ProjectUpdate};
pub use donations::Donation;
pub use error::EngineError;
pub use funding::{Funding, Investable};
pub use ops::{Engine, EngineBuilder};
pub use projects::{FundraisingTime, Project};
pub use users::User;

pub mod allocation;
mod commands;
mod donations;
mod error;
mod funding;
mod ops;
mod projects;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
