use serde::{Deserialize, Serialize};

use crate::models::UserSummary;
/*
    DTO delle richieste/risposte HTTP.
    I campi delle richieste hanno tutti un default: un campo mancante arriva
    al controller come stringa vuota e viene rifiutato come errore di validazione.
*/

// Register
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub university: String,
}

// Login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Risposta di login e registrazione.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

// Profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub university: Option<String>,
}

// Send message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendMessageRequest {
    pub recipient_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_id: Option<String>,
}

// Create ride (date and time stay strings so the server can report which one is wrong)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRideRequest {
    pub university: String,
    pub airport: String,
    pub departure_date: String,
    pub departure_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passengers: Option<u32>,
}

// Update ride: only the fields present are changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRideRequest {
    pub university: Option<String>,
    pub airport: Option<String>,
    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
    pub max_passengers: Option<u32>,
    pub status: Option<String>,
}

/// Query string di GET /api/rides/search. Un valore vuoto equivale ad assente.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RideSearchQuery {
    pub university: Option<String>,
    pub airport: Option<String>,
    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
}

/// Risposta di GET /api.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub message: String,
    pub status: String,
}

/// Risposta con solo un messaggio, es. dopo una cancellazione.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeResponse {
    pub message: String,
}
