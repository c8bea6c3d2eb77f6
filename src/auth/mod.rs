//! Bearer token authentication and the user account endpoints.

mod log_in;
mod me;
mod middleware;
mod register;
mod token;

pub use log_in::{AuthResponse, LogInData, log_in};
pub use me::{UserResponse, get_current_user};
pub use middleware::{AuthState, auth_guard};
pub use register::{RegisterData, register_user};
pub use token::{Claims, DEFAULT_TOKEN_DURATION, JwtKeys, decode_token, encode_token};
