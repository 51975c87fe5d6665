//! Accesso a SQLite. Ogni store è un handle leggero sul pool condiviso.

pub mod messages;
pub mod rides;
pub mod users;

pub use messages::MessageStore;
pub use rides::RideStore;
pub use users::{NewUser, UserStore};

use equitare_core::utils::time::from_unix_millis;
use time::OffsetDateTime;

fn decode_timestamp(millis: i64) -> Result<OffsetDateTime, sqlx::Error> {
    from_unix_millis(millis)
        .ok_or_else(|| sqlx::Error::Decode(format!("timestamp out of range: {millis}").into()))
}
