use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ChurchEventsError {
    #[error("Internal server error")]
    InternalError,
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
    #[error("404 Not found. Error message: `{0}`")]
    NotFound(String),
}
