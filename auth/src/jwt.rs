//! Signed, time-bound access tokens (HS256).

mod claims;
mod errors;
mod handler;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
