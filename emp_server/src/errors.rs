use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use emp_engine::{emp_api::PaymentGatewayError, DirectoryApiError, EventFlowError, StoreError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The request conflicts with the current state of the resource. {0}")]
    Conflict(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => Self::NoRecordFound(what),
            e => {
                error!("💻️ Database error: {e}");
                Self::BackendError(e.to_string())
            },
        }
    }
}

impl From<EventFlowError> for ServerError {
    fn from(e: EventFlowError) -> Self {
        match e {
            EventFlowError::InvalidId(_) => Self::InvalidRequestBody(e.to_string()),
            EventFlowError::CoordinatorNotFound(_) | EventFlowError::EventNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            EventFlowError::AlreadyPaid(_) => Self::Conflict(e.to_string()),
            EventFlowError::Payment(PaymentGatewayError::InvalidAmount(_)) => Self::InvalidRequestBody(e.to_string()),
            EventFlowError::Payment(PaymentGatewayError::InvalidUrl(_)) => {
                error!("💻️ The payment gateway could not build a redirect. {e}");
                Self::BackendError(e.to_string())
            },
            EventFlowError::Database(e) => e.into(),
        }
    }
}

impl From<DirectoryApiError> for ServerError {
    fn from(e: DirectoryApiError) -> Self {
        match e {
            DirectoryApiError::VendorNotFound(_) => Self::NoRecordFound(e.to_string()),
            DirectoryApiError::Database(e) => e.into(),
        }
    }
}
