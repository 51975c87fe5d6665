pub mod http;

// Re-export comodi
pub use http::{
    ApiStatus, AuthResponse, CreateRideRequest, LoginRequest, NoticeResponse, RegisterRequest,
    RideSearchQuery, SendMessageRequest, UpdateProfileRequest, UpdateRideRequest,
};
