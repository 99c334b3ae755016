//! Error taxonomy shared by the normalizers, stores and connection manager.

use log::error;
use rocket::http::Status;
use rocket::response::{self, status::Custom, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::json;
use thiserror::Error;

pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{0} is required")]
    RequiredFieldMissing(&'static str),

    #[error("`{value}` is not a valid {field}")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("{0} must contain at least one entry")]
    EmptyListField(&'static str),

    #[error("title `{0}` does not produce a usable slug")]
    EmptySlug(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid time: {0}, expected HH:mm or h:mm AM/PM")]
    InvalidTime(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("event {0} does not exist")]
    DanglingReference(String),

    #[error("could not verify referenced event: {0}")]
    ReferenceCheckFailed(#[source] Box<DataError>),

    #[error("a booking for this email already exists for the event")]
    DuplicateBooking,

    #[error("an event with slug `{0}` already exists")]
    DuplicateSlug(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("database connection failed: {0}")]
    ConnectionFailure(String),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl DataError {
    pub fn status(&self) -> Status {
        match self {
            DataError::RequiredFieldMissing(_)
            | DataError::InvalidEnumValue { .. }
            | DataError::EmptyListField(_)
            | DataError::EmptySlug(_)
            | DataError::InvalidDate(_)
            | DataError::InvalidTime(_)
            | DataError::InvalidEmail(_)
            | DataError::InvalidId(_) => Status::BadRequest,
            DataError::DanglingReference(_) | DataError::NotFound(_) => Status::NotFound,
            DataError::DuplicateBooking | DataError::DuplicateSlug(_) => Status::Conflict,
            DataError::ConnectionFailure(_) => Status::ServiceUnavailable,
            DataError::ReferenceCheckFailed(_) | DataError::Database(_) => {
                Status::InternalServerError
            }
        }
    }

    /// Rejections caused by the submitted data rather than the infrastructure.
    pub fn is_validation(&self) -> bool {
        self.status().code < 500
    }
}

impl<'r> Responder<'r, 'static> for DataError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if !self.is_validation() {
            error!("{} {} failed: {}", request.method(), request.uri(), self);
        }
        Custom(
            status,
            Json(json!({ "error": self.to_string(), "status": status.code })),
        )
        .respond_to(request)
    }
}
