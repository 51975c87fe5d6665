//! Filtro delle offerte di passaggio rispetto ai criteri di ricerca.

use time::Date;

use crate::models::Ride;
use crate::protocol::RideSearchQuery;
use crate::utils::time::parse_calendar_date;
use crate::utils::ClockTime;

/// Tolerance of the departure time filter, in minutes, on either side.
pub const TIME_WINDOW_MINUTES: u16 = 60;

/// Search criteria. Every field is optional; the ones present are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RideFilter {
    pub university: Option<String>,
    pub airport: Option<String>,
    pub departure_date: Option<Date>,
    pub departure_time: Option<ClockTime>,
}

impl RideFilter {
    /// Builds a filter from raw query values; blank values count as absent.
    /// On failure returns the wire name of the field that does not parse.
    pub fn from_query(query: &RideSearchQuery) -> Result<Self, &'static str> {
        let departure_date = match present(&query.departure_date) {
            Some(raw) => Some(parse_calendar_date(raw).ok_or("departureDate")?),
            None => None,
        };
        let departure_time = match present(&query.departure_time) {
            Some(raw) => Some(ClockTime::parse(raw).ok_or("departureTime")?),
            None => None,
        };
        Ok(Self {
            university: present(&query.university).map(str::to_string),
            airport: present(&query.airport).map(str::to_string),
            departure_date,
            departure_time,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.university.is_none()
            && self.airport.is_none()
            && self.departure_date.is_none()
            && self.departure_time.is_none()
    }

    pub fn matches(&self, ride: &Ride) -> bool {
        if let Some(university) = &self.university {
            if !same_text(university, &ride.university) {
                return false;
            }
        }
        if let Some(airport) = &self.airport {
            if !same_text(airport, &ride.airport) {
                return false;
            }
        }
        if let Some(date) = self.departure_date {
            if date != ride.departure_date {
                return false;
            }
        }
        if let Some(wanted) = self.departure_time {
            // a ride with an unparseable time never satisfies a time filter
            match ride.departure_clock() {
                Some(at) if within_time_window(at, wanted) => {}
                _ => return false,
            }
        }
        true
    }
}

/// True when `a` and `b` are at most [`TIME_WINDOW_MINUTES`] apart.
pub fn within_time_window(a: ClockTime, b: ClockTime) -> bool {
    a.distance(b) <= TIME_WINDOW_MINUTES
}

/// Returns the rides that pass `filter`, in their original order.
pub fn match_rides<'a>(rides: &'a [Ride], filter: &RideFilter) -> Vec<&'a Ride> {
    rides.iter().filter(|ride| filter.matches(ride)).collect()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
