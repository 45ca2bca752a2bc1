//! HTTP handlers of the AI API.

pub mod chat_handler;
pub mod health_handler;
pub mod mental_handler;
pub mod weather_handler;

pub use chat_handler::chat_routes;
pub use health_handler::health_routes;
pub use mental_handler::mental_routes;
pub use weather_handler::weather_routes;
