pub mod conversation;
pub mod message;
pub mod ride;
pub mod user;

// Re-export per comodità
pub use conversation::ConversationSummary;
pub use message::{Message, Participant};
pub use ride::{Ride, RideRef, RideStatus};
pub use user::{User, UserSummary};
