//! Mapping of driven-port errors onto the domain error type.
//!
//! Connection-level failures become `ServiceUnavailable`; anything else a
//! repository reports is an internal fault. Variants with richer domain
//! meaning (duplicates, stale guards) are mapped where the context is
//! known, in the services.

use crate::domain::Error;
use crate::domain::ports::{
    LoadPersistenceError, MatchPersistenceError, ReviewPersistenceError, UserPersistenceError,
};

pub(crate) fn map_load_error(error: LoadPersistenceError) -> Error {
    match error {
        LoadPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("load repository unavailable: {message}"))
        }
        LoadPersistenceError::Query { message } => {
            Error::internal(format!("load repository error: {message}"))
        }
    }
}

pub(crate) fn map_match_error(error: MatchPersistenceError) -> Error {
    match error {
        MatchPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("match repository unavailable: {message}"))
        }
        MatchPersistenceError::Query { message } => {
            Error::internal(format!("match repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_request("email already exists")
        }
    }
}

pub(crate) fn map_review_error(error: ReviewPersistenceError) -> Error {
    match error {
        ReviewPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewPersistenceError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewPersistenceError::Duplicate { .. } => {
            Error::conflict("you have already reviewed this load")
        }
    }
}
