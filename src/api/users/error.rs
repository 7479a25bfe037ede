use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

/// Body of every failed request. Successful requests return the bare payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("No active session")]
    Unauthenticated,
    #[error("User not found")]
    UserNotFound,
    #[error("Course not found")]
    CourseNotFound,
    #[error("Cannot target yourself")]
    SelfTarget,
    #[error("Users are blocked")]
    Blocked,
    #[error("Malformed request")]
    BadRequest,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiErrorCode::UserNotFound | ApiErrorCode::CourseNotFound | ApiErrorCode::NotFound => {
                StatusCode::NOT_FOUND
            }
            ApiErrorCode::SelfTarget | ApiErrorCode::Blocked => StatusCode::FORBIDDEN,
            ApiErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<BuddyError> for ApiErrorCode {
    fn from(error: BuddyError) -> Self {
        match error {
            BuddyError::UserNotFound => ApiErrorCode::UserNotFound,
            BuddyError::CourseNotFound => ApiErrorCode::CourseNotFound,
            BuddyError::SelfTarget => ApiErrorCode::SelfTarget,
            BuddyError::Blocked => ApiErrorCode::Blocked,
            BuddyError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if let Some(code) = err.find::<ApiErrorCode>() {
        (*code, code.to_string())
    } else if err.is_not_found() {
        (ApiErrorCode::NotFound, ApiErrorCode::NotFound.to_string())
    } else if let Some(e) = err.find::<reject::InvalidQuery>() {
        (ApiErrorCode::BadRequest, e.to_string())
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (
            ApiErrorCode::MethodNotAllowed,
            ApiErrorCode::MethodNotAllowed.to_string(),
        )
    } else {
        (ApiErrorCode::InternalError, format!("Unhandled error: {:?}", err))
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code, message));
    Ok(warp::reply::with_status(json, code.status()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (BuddyError::UserNotFound, StatusCode::NOT_FOUND),
            (BuddyError::CourseNotFound, StatusCode::NOT_FOUND),
            (BuddyError::SelfTarget, StatusCode::FORBIDDEN),
            (BuddyError::Blocked, StatusCode::FORBIDDEN),
            (
                BuddyError::Store("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiErrorCode::from(error).status(), status);
        }
    }
}
