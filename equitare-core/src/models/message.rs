use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ride::RideRef;

/// Mittente o destinatario di un messaggio, già popolato con il nome visualizzato.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// Messaggio diretto tra due utenti. Non viene mai modificato né cancellato.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: Participant,
    pub recipient: Participant,
    pub content: String,
    #[serde(default)]
    pub ride_id: Option<String>,
    /// Corsa citata dal messaggio, se esiste ancora.
    #[serde(default)]
    pub ride: Option<RideRef>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Message {
    /// The participant that is not `caller_id`. A message a user sent to
    /// themselves has the caller as its counterpart.
    pub fn counterpart(&self, caller_id: &str) -> &Participant {
        if self.sender.id == caller_id {
            &self.recipient
        } else {
            &self.sender
        }
    }
}
