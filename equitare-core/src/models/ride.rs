use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::utils::time::{calendar_date, ClockTime};

/// Posti offerti quando il creatore non li specifica.
pub const DEFAULT_MAX_PASSENGERS: u32 = 3;

/// Stato di una corsa. Le transizioni non vengono verificate dal server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    #[default]
    Open,
    Full,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RideStatus::Open => "open",
            RideStatus::Full => "full",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(RideStatus::Open),
            "full" => Ok(RideStatus::Full),
            "completed" => Ok(RideStatus::Completed),
            "cancelled" => Ok(RideStatus::Cancelled),
            other => Err(format!("unknown ride status: {other}")),
        }
    }
}

/// Offerta di passaggio verso (o da) un aeroporto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: String,
    pub owner_id: String,
    #[serde(rename = "creatorName")]
    pub owner_name: String,
    pub university: String,
    pub airport: String,
    #[serde(with = "calendar_date")]
    pub departure_date: Date,
    /// "HH:MM", 24h
    pub departure_time: String,
    pub max_passengers: u32,
    #[serde(rename = "currentPassengers", default)]
    pub current_passenger_ids: BTreeSet<String>,
    #[serde(default)]
    pub status: RideStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Ride {
    /// Parsed departure time; `None` if the stored value is not a valid `HH:MM`.
    pub fn departure_clock(&self) -> Option<ClockTime> {
        ClockTime::parse(&self.departure_time)
    }
}

/// Riepilogo della corsa allegato a un messaggio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRef {
    pub id: String,
    #[serde(with = "calendar_date")]
    pub departure_date: Date,
    pub departure_time: String,
    pub airport: String,
}

impl From<&Ride> for RideRef {
    fn from(ride: &Ride) -> Self {
        Self {
            id: ride.id.clone(),
            departure_date: ride.departure_date,
            departure_time: ride.departure_time.clone(),
            airport: ride.airport.clone(),
        }
    }
}
