mod error;
pub mod event;
mod shared;

pub use error::ChurchEventsError;
pub use shared::usecase::{execute, Subscriber, UseCase};
