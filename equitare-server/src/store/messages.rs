use equitare_core::{
    new_id, now_timestamp,
    utils::time::{parse_calendar_date, to_unix_millis},
    Message, Participant, Ride, RideRef, User,
};
use sqlx::SqlitePool;

use super::decode_timestamp;
use crate::error::AppError;

// mittente e destinatario vengono popolati con il nome corrente, la corsa con data/ora/aeroporto
const SELECT_MESSAGES: &str = "\
    SELECT m.message_id, m.sender_id, s.name AS sender_name, \
           m.recipient_id, r.name AS recipient_name, m.content, m.ride_id, \
           rd.departure_date AS ride_date, rd.departure_time AS ride_time, rd.airport AS ride_airport, \
           m.created_at \
    FROM messages m \
    JOIN users s ON s.user_id = m.sender_id \
    JOIN users r ON r.user_id = m.recipient_id \
    LEFT JOIN rides rd ON rd.ride_id = m.ride_id";

#[derive(sqlx::FromRow)]
struct MessageRow {
    message_id: String,
    sender_id: String,
    sender_name: String,
    recipient_id: String,
    recipient_name: String,
    content: String,
    ride_id: Option<String>,
    ride_date: Option<String>,
    ride_time: Option<String>,
    ride_airport: Option<String>,
    created_at: i64,
}

impl TryFrom<MessageRow> for Message {
    type Error = sqlx::Error;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let ride = match (&row.ride_id, row.ride_date, row.ride_time, row.ride_airport) {
            (Some(id), Some(date), Some(departure_time), Some(airport)) => {
                let departure_date = parse_calendar_date(&date).ok_or_else(|| {
                    sqlx::Error::Decode(format!("ride {id}: bad departure_date").into())
                })?;
                Some(RideRef { id: id.clone(), departure_date, departure_time, airport })
            }
            _ => None,
        };
        Ok(Message {
            id: row.message_id,
            sender: Participant { id: row.sender_id, name: row.sender_name },
            recipient: Participant { id: row.recipient_id, name: row.recipient_name },
            content: row.content,
            ride_id: row.ride_id,
            ride,
            created_at: decode_timestamp(row.created_at)?,
        })
    }
}

/// Append-only message collection.
#[derive(Clone)]
pub struct MessageStore {
    pool: SqlitePool,
}

impl MessageStore {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn insert(
        &self,
        sender: &User,
        recipient: &User,
        content: &str,
        ride: Option<&Ride>,
    ) -> Result<Message, AppError> {
        let message = Message {
            id: new_id(),
            sender: Participant { id: sender.id.clone(), name: sender.name.clone() },
            recipient: Participant { id: recipient.id.clone(), name: recipient.name.clone() },
            content: content.to_string(),
            ride_id: ride.map(|r| r.id.clone()),
            ride: ride.map(RideRef::from),
            created_at: now_timestamp(),
        };
        sqlx::query(
            "INSERT INTO messages (message_id, sender_id, recipient_id, ride_id, content, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(&message.sender.id)
        .bind(&message.recipient.id)
        .bind(&message.ride_id)
        .bind(&message.content)
        .bind(to_unix_millis(message.created_at))
        .execute(&self.pool)
        .await?;
        Ok(message)
    }

    /// Every message `user_id` sent or received, newest first. Messages with
    /// the same timestamp come out most recently inserted first.
    pub async fn involving(&self, user_id: &str) -> Result<Vec<Message>, AppError> {
        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "{SELECT_MESSAGES} WHERE m.sender_id = ? OR m.recipient_id = ? \
             ORDER BY m.created_at DESC, m.rowid DESC"
        ))
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        collect(rows)
    }

    /// The thread between two users, oldest first.
    pub async fn between(&self, a: &str, b: &str) -> Result<Vec<Message>, AppError> {
        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "{SELECT_MESSAGES} \
             WHERE (m.sender_id = ? AND m.recipient_id = ?) OR (m.sender_id = ? AND m.recipient_id = ?) \
             ORDER BY m.created_at ASC, m.rowid ASC"
        ))
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_all(&self.pool)
        .await?;
        collect(rows)
    }
}

fn collect(rows: Vec<MessageRow>) -> Result<Vec<Message>, AppError> {
    rows.into_iter()
        .map(Message::try_from)
        .collect::<Result<_, _>>()
        .map_err(AppError::from)
}
