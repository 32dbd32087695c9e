use actix_web::http::header::ContentType;
use actix_web::{error, http::StatusCode, HttpResponse, HttpResponseBuilder};
use derive_more::{Display, Error};

/// Errors returned to the browser client when an endpoint call is rejected.
#[derive(Debug, Display, Error)]
pub enum AuthError {
    #[display("{message}")]
    AccessDenied { message: String },
    #[display("Endpoint '{endpoint}' or method '{method}' is not found")]
    EndpointNotFound { endpoint: String, method: String },
    #[display("unauthorized")]
    Unauthorized,
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::AccessDenied { .. } => StatusCode::UNAUTHORIZED,
            AuthError::EndpointNotFound { .. } => StatusCode::NOT_FOUND,
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "message": self.to_string() });
        HttpResponseBuilder::new(self.status_code())
            .insert_header(ContentType::json())
            .body(body.to_string())
    }
}

/// Errors raised while collecting endpoint definitions at startup.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[display("endpoint name '{name}' is already registered by {existing}")]
    DuplicateEndpoint { name: String, existing: String },
    #[display("{type_name} is not an endpoint; mark its impl block with #[endpoint]")]
    NotAnEndpoint { type_name: String },
}
