use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use equitare_core::{
    match_rides, new_id, now_timestamp, utils::time::parse_calendar_date, ClockTime, CreateRideRequest,
    NoticeResponse, Ride, RideFilter, RideSearchQuery, RideStatus, UpdateRideRequest, User,
    DEFAULT_MAX_PASSENGERS,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use time::Date;

use super::non_blank;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::store::RideStore;
use crate::AppState;

/// Handler per GET /api/rides
pub async fn list_rides(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Vec<Ride>>, AppError> {
    Ok(Json(RideStore::new(&state.pool).list().await?))
}

/// Handler per GET /api/rides/search
pub async fn search_rides(
    Extension(state): Extension<Arc<AppState>>,
    ApiQuery(query): ApiQuery<RideSearchQuery>,
) -> Result<Json<Vec<Ride>>, AppError> {
    let filter = RideFilter::from_query(&query).map_err(|field| AppError::validation(format!("Invalid {field}")))?;
    let rides = RideStore::new(&state.pool).list().await?;
    if filter.is_empty() {
        return Ok(Json(rides));
    }
    tracing::debug!(?filter, candidates = rides.len(), "searching rides");
    let matched: Vec<Ride> = match_rides(&rides, &filter).into_iter().cloned().collect();
    Ok(Json(matched))
}

/// Handler per GET /api/rides/:id
pub async fn get_ride(
    Extension(state): Extension<Arc<AppState>>,
    Path(ride_id): Path<String>,
) -> Result<Json<Ride>, AppError> {
    let ride = RideStore::new(&state.pool).get(&ride_id).await?.ok_or(AppError::NotFound("ride"))?;
    Ok(Json(ride))
}

/// Handler per POST /api/rides
pub async fn create_ride(
    CurrentUser(owner): CurrentUser,
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateRideRequest>,
) -> Result<(StatusCode, Json<Ride>), AppError> {
    let ride = new_ride(&owner, &req)?;
    RideStore::new(&state.pool).insert(&ride).await?;
    tracing::info!(ride_id = %ride.id, owner = %owner.id, airport = %ride.airport, "ride created");
    Ok((StatusCode::CREATED, Json(ride)))
}

/// Handler per PUT /api/rides/:id
pub async fn update_ride(
    CurrentUser(user): CurrentUser,
    Extension(state): Extension<Arc<AppState>>,
    Path(ride_id): Path<String>,
    ApiJson(req): ApiJson<UpdateRideRequest>,
) -> Result<Json<Ride>, AppError> {
    let store = RideStore::new(&state.pool);
    let mut ride = store.get(&ride_id).await?.ok_or(AppError::NotFound("ride"))?;
    if ride.owner_id != user.id {
        return Err(AppError::Forbidden("Not authorized to update this ride"));
    }
    apply_update(&mut ride, &req)?;
    store.update(&ride).await?;
    Ok(Json(ride))
}

/// Handler per DELETE /api/rides/:id
pub async fn delete_ride(
    CurrentUser(user): CurrentUser,
    Extension(state): Extension<Arc<AppState>>,
    Path(ride_id): Path<String>,
) -> Result<Json<NoticeResponse>, AppError> {
    let store = RideStore::new(&state.pool);
    let ride = store.get(&ride_id).await?.ok_or(AppError::NotFound("ride"))?;
    if ride.owner_id != user.id {
        return Err(AppError::Forbidden("Not authorized to delete this ride"));
    }
    store.delete(&ride.id).await?;
    tracing::info!(ride_id = %ride.id, "ride removed");
    Ok(Json(NoticeResponse { message: "Ride removed".to_string() }))
}

fn new_ride(owner: &User, req: &CreateRideRequest) -> Result<Ride, AppError> {
    let (Some(university), Some(airport)) = (non_blank(&req.university), non_blank(&req.airport)) else {
        return Err(AppError::validation("University and airport are required"));
    };
    let max_passengers = req.max_passengers.unwrap_or(DEFAULT_MAX_PASSENGERS);
    if max_passengers == 0 {
        return Err(AppError::validation("maxPassengers must be at least 1"));
    }
    Ok(Ride {
        id: new_id(),
        owner_id: owner.id.clone(),
        owner_name: owner.name.clone(),
        university: university.to_string(),
        airport: airport.to_string(),
        departure_date: departure_date(&req.departure_date)?,
        departure_time: departure_time(&req.departure_time)?.to_string(),
        max_passengers,
        current_passenger_ids: BTreeSet::new(),
        status: RideStatus::Open,
        created_at: now_timestamp(),
    })
}

/// Applies the fields present in `req`; on error `ride` may be partially updated
/// and must not be persisted.
fn apply_update(ride: &mut Ride, req: &UpdateRideRequest) -> Result<(), AppError> {
    if let Some(raw) = &req.university {
        ride.university = non_blank(raw).ok_or_else(|| AppError::validation("university must not be empty"))?.to_string();
    }
    if let Some(raw) = &req.airport {
        ride.airport = non_blank(raw).ok_or_else(|| AppError::validation("airport must not be empty"))?.to_string();
    }
    if let Some(raw) = &req.departure_date {
        ride.departure_date = departure_date(raw)?;
    }
    if let Some(raw) = &req.departure_time {
        ride.departure_time = departure_time(raw)?.to_string();
    }
    if let Some(max) = req.max_passengers {
        if max == 0 || (max as usize) < ride.current_passenger_ids.len() {
            return Err(AppError::validation("maxPassengers cannot be below the current passenger count"));
        }
        ride.max_passengers = max;
    }
    if let Some(raw) = &req.status {
        ride.status = raw.parse().map_err(|_| AppError::validation(format!("Invalid status {raw:?}")))?;
    }
    Ok(())
}

fn departure_date(raw: &str) -> Result<Date, AppError> {
    parse_calendar_date(raw).ok_or_else(|| AppError::validation("Invalid departureDate, expected YYYY-MM-DD"))
}

fn departure_time(raw: &str) -> Result<ClockTime, AppError> {
    ClockTime::parse(raw).ok_or_else(|| AppError::validation("Invalid departureTime, expected HH:MM"))
}
