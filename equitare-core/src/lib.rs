//! equitare-core: tipi condivisi tra client e server (modelli, DTO HTTP, errori)
//! e la logica pura del servizio: derivazione delle conversazioni e matching delle corse.
//! Niente I/O e niente async.

pub mod conversations;
pub mod error;
pub mod matching;
pub mod models;
pub mod protocol;
pub mod utils;

// Re-export utili per ridurre i percorsi nel crate server
pub use conversations::derive_conversations;
pub use error::Error;
pub use matching::{match_rides, within_time_window, RideFilter, TIME_WINDOW_MINUTES};
pub use models::{
    conversation::ConversationSummary,
    message::{Message, Participant},
    ride::{Ride, RideRef, RideStatus, DEFAULT_MAX_PASSENGERS},
    user::{User, UserSummary},
};
pub use protocol::http::{
    ApiStatus, AuthResponse, CreateRideRequest, LoginRequest, NoticeResponse, RegisterRequest,
    RideSearchQuery, SendMessageRequest, UpdateProfileRequest, UpdateRideRequest,
};
pub use utils::{new_id, now_timestamp, ClockTime};
