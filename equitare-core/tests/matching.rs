use std::collections::BTreeSet;

use equitare_core::{
    match_rides, ClockTime, Ride, RideFilter, RideSearchQuery, RideStatus, TIME_WINDOW_MINUTES,
};
use proptest::prelude::*;
use time::macros::{date, datetime};
use time::Date;

fn ride(id: &str, university: &str, airport: &str, day: Date, at: &str) -> Ride {
    Ride {
        id: id.to_string(),
        owner_id: format!("owner-{id}"),
        owner_name: "Owner".to_string(),
        university: university.to_string(),
        airport: airport.to_string(),
        departure_date: day,
        departure_time: at.to_string(),
        max_passengers: 3,
        current_passenger_ids: BTreeSet::new(),
        status: RideStatus::Open,
        created_at: datetime!(2025-11-01 08:00 UTC),
    }
}

fn at(raw: &str) -> Option<ClockTime> {
    Some(ClockTime::parse(raw).expect("valid clock time"))
}

fn ids<'a>(rides: &[&'a Ride]) -> Vec<&'a str> {
    rides.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn time_filter_is_a_sixty_minute_window() {
    let rides = [ride("1", "X", "PIT", date!(2025 - 12 - 19), "14:00")];

    let near = RideFilter { departure_time: at("14:45"), ..Default::default() };
    assert_eq!(match_rides(&rides, &near).len(), 1);

    let far = RideFilter { departure_time: at("15:05"), ..Default::default() };
    assert!(match_rides(&rides, &far).is_empty());
}

#[test]
fn window_edges_are_inclusive_on_both_sides() {
    let rides = [ride("1", "X", "PIT", date!(2025 - 12 - 19), "14:00")];
    for (filter_time, expected) in [("13:00", 1), ("15:00", 1), ("12:59", 0), ("15:01", 0)] {
        let filter = RideFilter { departure_time: at(filter_time), ..Default::default() };
        assert_eq!(match_rides(&rides, &filter).len(), expected, "filter {filter_time}");
    }
}

#[test]
fn text_filters_ignore_case_but_not_content() {
    let rides = [
        ride("1", "Carnegie Mellon University", "PIT", date!(2025 - 12 - 19), "09:00"),
        ride("2", "Stanford University", "SFO", date!(2025 - 12 - 19), "09:00"),
        ride("3", "Carnegie Mellon", "pit", date!(2025 - 12 - 19), "09:00"),
    ];

    let filter = RideFilter {
        university: Some("carnegie mellon university".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&match_rides(&rides, &filter)), ["1"]);

    let filter = RideFilter { airport: Some("Pit".to_string()), ..Default::default() };
    assert_eq!(ids(&match_rides(&rides, &filter)), ["1", "3"]);
}

#[test]
fn date_filter_compares_calendar_day() {
    let rides = [
        ride("1", "X", "PIT", date!(2025 - 12 - 19), "09:00"),
        ride("2", "X", "PIT", date!(2025 - 12 - 20), "09:00"),
    ];
    let filter = RideFilter { departure_date: Some(date!(2025 - 12 - 20)), ..Default::default() };
    assert_eq!(ids(&match_rides(&rides, &filter)), ["2"]);
}

#[test]
fn filters_are_anded_and_order_is_preserved() {
    let day = date!(2025 - 12 - 19);
    let rides = [
        ride("1", "X", "PIT", day, "14:30"),
        ride("2", "X", "SFO", day, "14:30"),
        ride("3", "X", "PIT", day, "08:00"),
        ride("4", "X", "PIT", day, "13:10"),
    ];
    let filter = RideFilter {
        university: Some("x".to_string()),
        airport: Some("PIT".to_string()),
        departure_date: Some(day),
        departure_time: at("14:00"),
    };
    assert_eq!(ids(&match_rides(&rides, &filter)), ["1", "4"]);
}

#[test]
fn empty_filter_returns_everything() {
    let rides = [
        ride("1", "X", "PIT", date!(2025 - 12 - 19), "14:30"),
        ride("2", "Y", "SFO", date!(2025 - 12 - 21), "not a time"),
    ];
    let filter = RideFilter::default();
    assert!(filter.is_empty());
    assert_eq!(ids(&match_rides(&rides, &filter)), ["1", "2"]);
}

#[test]
fn unparseable_ride_time_never_matches_a_time_filter() {
    let rides = [ride("1", "X", "PIT", date!(2025 - 12 - 19), "2pm")];
    let filter = RideFilter { departure_time: at("14:00"), ..Default::default() };
    assert!(match_rides(&rides, &filter).is_empty());
}

#[test]
fn matcher_does_not_touch_its_input() {
    let rides = vec![
        ride("1", "X", "PIT", date!(2025 - 12 - 19), "14:30"),
        ride("2", "Y", "SFO", date!(2025 - 12 - 19), "14:30"),
    ];
    let before = rides.clone();
    let filter = RideFilter { airport: Some("SFO".to_string()), ..Default::default() };
    let first = ids(&match_rides(&rides, &filter));
    let second = ids(&match_rides(&rides, &filter));
    assert_eq!(first, second);
    assert_eq!(rides, before);
}

#[test]
fn query_blanks_are_absent_and_bad_values_name_the_field() {
    let query = RideSearchQuery {
        university: Some("  ".to_string()),
        airport: Some("PIT".to_string()),
        departure_date: Some(String::new()),
        departure_time: Some("14:00".to_string()),
    };
    let filter = RideFilter::from_query(&query).expect("valid query");
    assert_eq!(filter.university, None);
    assert_eq!(filter.airport.as_deref(), Some("PIT"));
    assert_eq!(filter.departure_date, None);
    assert_eq!(filter.departure_time.map(ClockTime::minutes), Some(840));

    let bad_time = RideSearchQuery { departure_time: Some("25:00".to_string()), ..Default::default() };
    assert_eq!(RideFilter::from_query(&bad_time), Err("departureTime"));

    let bad_date = RideSearchQuery { departure_date: Some("tomorrow".to_string()), ..Default::default() };
    assert_eq!(RideFilter::from_query(&bad_date), Err("departureDate"));
}

fn clock(minutes: u16) -> ClockTime {
    ClockTime::from_minutes(minutes).expect("in range")
}

fn rides_strategy() -> impl Strategy<Value = Vec<Ride>> {
    let universities = prop::sample::select(vec!["X", "Y", "x"]);
    let airports = prop::sample::select(vec!["PIT", "SFO", "pit"]);
    let days = prop::sample::select(vec![date!(2025 - 12 - 19), date!(2025 - 12 - 20)]);
    prop::collection::vec((universities, airports, days, 0u16..1440), 0..30).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (u, a, d, m))| ride(&i.to_string(), u, a, d, &clock(m).to_string()))
            .collect()
    })
}

proptest! {
    #[test]
    fn window_is_symmetric(filter_minutes in 61u16..1379) {
        let filter = RideFilter { departure_time: Some(clock(filter_minutes)), ..Default::default() };
        let day = date!(2025 - 12 - 19);
        let w = TIME_WINDOW_MINUTES;

        for (offset_ok, offset_out) in [(filter_minutes - w, filter_minutes - w - 1), (filter_minutes + w, filter_minutes + w + 1)] {
            let inside = [ride("in", "X", "PIT", day, &clock(offset_ok).to_string())];
            let outside = [ride("out", "X", "PIT", day, &clock(offset_out).to_string())];
            prop_assert_eq!(match_rides(&inside, &filter).len(), 1);
            prop_assert_eq!(match_rides(&outside, &filter).len(), 0);
        }
    }

    #[test]
    fn adding_a_criterion_never_grows_the_result(
        rides in rides_strategy(),
        minutes in 0u16..1440,
    ) {
        let mut filter = RideFilter::default();
        let mut previous = match_rides(&rides, &filter).len();

        filter.university = Some("x".to_string());
        let n = match_rides(&rides, &filter).len();
        prop_assert!(n <= previous);
        previous = n;

        filter.airport = Some("PIT".to_string());
        let n = match_rides(&rides, &filter).len();
        prop_assert!(n <= previous);
        previous = n;

        filter.departure_date = Some(date!(2025 - 12 - 19));
        let n = match_rides(&rides, &filter).len();
        prop_assert!(n <= previous);
        previous = n;

        filter.departure_time = Some(clock(minutes));
        prop_assert!(match_rides(&rides, &filter).len() <= previous);
    }

    #[test]
    fn result_is_an_ordered_subsequence(rides in rides_strategy(), minutes in 0u16..1440) {
        let filter = RideFilter { departure_time: Some(clock(minutes)), ..Default::default() };
        let matched = match_rides(&rides, &filter);
        let positions: Vec<usize> = matched
            .iter()
            .map(|m| rides.iter().position(|r| r.id == m.id).expect("from input"))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
