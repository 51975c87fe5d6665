use std::collections::BTreeSet;

use equitare_core::{
    utils::time::{format_calendar_date, parse_calendar_date, to_unix_millis},
    Ride, RideStatus,
};
use sqlx::SqlitePool;

use super::decode_timestamp;
use crate::error::AppError;

const SELECT_RIDES: &str = "\
    SELECT ride_id, owner_id, owner_name, university, airport, departure_date, departure_time, \
           max_passengers, passenger_ids, status, created_at \
    FROM rides";

#[derive(sqlx::FromRow)]
struct RideRow {
    ride_id: String,
    owner_id: String,
    owner_name: String,
    university: String,
    airport: String,
    departure_date: String,
    departure_time: String,
    max_passengers: i64,
    passenger_ids: String,
    status: String,
    created_at: i64,
}

impl TryFrom<RideRow> for Ride {
    type Error = sqlx::Error;

    fn try_from(row: RideRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| sqlx::Error::Decode(format!("ride {}: bad {what}", row.ride_id).into());

        let departure_date = parse_calendar_date(&row.departure_date).ok_or_else(|| corrupt("departure_date"))?;
        let current_passenger_ids: BTreeSet<String> =
            serde_json::from_str(&row.passenger_ids).map_err(|_| corrupt("passenger_ids"))?;
        let status = row.status.parse::<RideStatus>().map_err(|_| corrupt("status"))?;
        let max_passengers = u32::try_from(row.max_passengers).map_err(|_| corrupt("max_passengers"))?;
        let created_at = decode_timestamp(row.created_at)?;

        Ok(Ride {
            id: row.ride_id,
            owner_id: row.owner_id,
            owner_name: row.owner_name,
            university: row.university,
            airport: row.airport,
            departure_date,
            departure_time: row.departure_time,
            max_passengers,
            current_passenger_ids,
            status,
            created_at,
        })
    }
}

#[derive(Clone)]
pub struct RideStore {
    pool: SqlitePool,
}

impl RideStore {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    /// All rides in creation order.
    pub async fn list(&self) -> Result<Vec<Ride>, AppError> {
        let rows: Vec<RideRow> = sqlx::query_as(&format!("{SELECT_RIDES} ORDER BY created_at ASC, rowid ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(Ride::try_from)
            .collect::<Result<_, _>>()
            .map_err(AppError::from)
    }

    pub async fn get(&self, ride_id: &str) -> Result<Option<Ride>, AppError> {
        let row: Option<RideRow> = sqlx::query_as(&format!("{SELECT_RIDES} WHERE ride_id = ?"))
            .bind(ride_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Ride::try_from).transpose()?)
    }

    pub async fn insert(&self, ride: &Ride) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO rides (ride_id, owner_id, owner_name, university, airport, departure_date, \
             departure_time, max_passengers, passenger_ids, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&ride.id)
        .bind(&ride.owner_id)
        .bind(&ride.owner_name)
        .bind(&ride.university)
        .bind(&ride.airport)
        .bind(format_calendar_date(ride.departure_date))
        .bind(&ride.departure_time)
        .bind(i64::from(ride.max_passengers))
        .bind(encode_passengers(&ride.current_passenger_ids))
        .bind(ride.status.as_str())
        .bind(to_unix_millis(ride.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Writes back every mutable field of `ride`.
    pub async fn update(&self, ride: &Ride) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE rides SET university = ?, airport = ?, departure_date = ?, departure_time = ?, \
             max_passengers = ?, passenger_ids = ?, status = ? WHERE ride_id = ?",
        )
        .bind(&ride.university)
        .bind(&ride.airport)
        .bind(format_calendar_date(ride.departure_date))
        .bind(&ride.departure_time)
        .bind(i64::from(ride.max_passengers))
        .bind(encode_passengers(&ride.current_passenger_ids))
        .bind(ride.status.as_str())
        .bind(&ride.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, ride_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM rides WHERE ride_id = ?")
            .bind(ride_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn encode_passengers(ids: &BTreeSet<String>) -> String {
    // serializing a set of strings cannot fail
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}
