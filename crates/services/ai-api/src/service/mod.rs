//! Service layer - business logic of the AI API.

pub mod chat_service;
pub mod disaster_service;
pub mod mental_service;
pub mod news_service;
pub mod weather_service;

pub use chat_service::{ChatManager, ChatReply, ChatService};
pub use disaster_service::{DisasterManager, DisasterService, PollSummary};
pub use mental_service::{MentalManager, MentalService};
pub use news_service::{NewsManager, NewsService};
pub use weather_service::{WeatherManager, WeatherService};
