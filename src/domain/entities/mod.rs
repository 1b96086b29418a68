//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod standing;

pub use user::User;
pub use message::ChannelMessage;
pub use standing::{Standing, StandingChange};
