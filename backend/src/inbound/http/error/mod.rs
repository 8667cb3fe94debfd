//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! return it directly and get a consistent JSON body and status code.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use tracing::{debug, error};

use crate::domain::error::TRACE_ID_HEADER;
use crate::domain::{Error, ErrorCode};

/// Path extractor settings that answer an unparseable id with the JSON 404
/// body instead of actix's plain-text one.
#[must_use]
pub fn unparseable_path_as_not_found() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        debug!(error = %err, path = req.path(), "path parameter did not parse");
        Error::not_found(format!("no record at {}", req.path())).into()
    })
}

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::AuthenticationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        if matches!(self.code(), ErrorCode::InternalError) {
            error!(
                error = %self.message(),
                trace_id = self.trace_id().unwrap_or_default(),
                "internal error"
            );
            builder.json(self.redacted())
        } else {
            builder.json(self)
        }
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}
