//! Donation API endpoints

use api_types::donation::{DonationFullView, DonationNew, DonationView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{Donation, User};

use crate::{
    ServerError,
    server::{ServerState, require_superuser},
};

fn donation_view(donation: Donation) -> DonationView {
    DonationView {
        id: donation.id,
        comment: donation.comment,
        full_amount: donation.funding.target_amount,
        create_date: donation.funding.created_at,
    }
}

fn donation_full_view(donation: Donation) -> DonationFullView {
    DonationFullView {
        id: donation.id,
        user_id: donation.user_id,
        comment: donation.comment,
        full_amount: donation.funding.target_amount,
        invested_amount: donation.funding.invested_amount,
        fully_invested: donation.funding.is_closed,
        create_date: donation.funding.created_at,
        close_date: donation.funding.closed_at,
    }
}

/// Handle requests for donating. The donor is the authenticated user.
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<DonationNew>,
) -> Result<(StatusCode, Json<DonationView>), ServerError> {
    let mut cmd = engine::DonationNew::new(user.username, payload.full_amount);
    if let Some(comment) = payload.comment {
        cmd = cmd.comment(comment);
    }

    let donation = state.engine.new_donation(cmd).await?;
    Ok((StatusCode::CREATED, Json(donation_view(donation))))
}

/// Handle requests for listing all donations (superusers only)
pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<DonationFullView>>, ServerError> {
    require_superuser(&user)?;

    let donations = state.engine.donations().await?;
    Ok(Json(donations.into_iter().map(donation_full_view).collect()))
}

/// Handle requests for listing the caller's donations
pub async fn mine(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<DonationView>>, ServerError> {
    let donations = state.engine.user_donations(&user.username).await?;
    Ok(Json(donations.into_iter().map(donation_view).collect()))
}
