//! HTTP handlers of the voice API.

pub mod health_handler;
pub mod voice_handler;

pub use health_handler::health_routes;
pub use voice_handler::voice_routes;
