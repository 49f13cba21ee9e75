//! Unified error codes
//!
//! All error codes used across the server and its clients, organized by
//! domain. Codes are `u16` values for efficient serialization and
//! cross-language compatibility (Rust, TypeScript, etc.)

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 3001,
    /// Restaurant slug already taken
    SlugTaken = 3002,

    // ==================== 4xxx: Session & Order ====================
    /// Session not found
    SessionNotFound = 4001,
    /// Session is closed
    SessionClosed = 4002,
    /// Session is settling payment
    SessionPaymentPending = 4003,
    /// Status value outside the session enumeration
    InvalidSessionStatus = 4004,
    /// Consumer not found
    ConsumerNotFound = 4005,
    /// Consumer does not belong to the session
    ConsumerNotInSession = 4006,
    /// Order not found
    OrderNotFound = 4101,
    /// Order item not found
    OrderItemNotFound = 4102,
    /// Status value outside the order enumeration
    InvalidOrderStatus = 4103,
    /// Status value outside the order-item enumeration
    InvalidItemStatus = 4104,
    /// Order item batch is empty
    EmptyOrderBatch = 4105,
    /// Service call not found
    ServiceCallNotFound = 4201,
    /// Type value outside the service-call enumeration
    InvalidServiceCallType = 4202,

    // ==================== 6xxx: Product & Category ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is not available
    ProductUnavailable = 6002,
    /// Product has invalid price
    ProductInvalidPrice = 6003,
    /// Category not found
    CategoryNotFound = 6101,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is disabled
    TableDisabled = 7002,
    /// Table already has a live session
    TableOccupied = 7003,
    /// Table is settling payment, not accepting new guests
    TablePaymentPending = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

/// Error classification by failure mode.
///
/// Every [`ErrorCode`] maps onto exactly one category, and the category
/// determines the HTTP status of the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A referenced resource does not exist (404)
    NotFound,
    /// The operation conflicts with current state (409)
    Conflict,
    /// A status/enum value is outside its enumeration (422)
    InvalidState,
    /// Malformed or missing input, caught before domain logic (400)
    Validation,
    /// Unexpected server-side failure (500)
    Internal,
}

impl ErrorCode {
    /// Numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Classify this code into the platform error taxonomy
    pub fn category(&self) -> ErrorCategory {
        use ErrorCode::*;
        match self {
            NotFound | RestaurantNotFound | SessionNotFound | ConsumerNotFound
            | OrderNotFound | OrderItemNotFound | ServiceCallNotFound | ProductNotFound
            | CategoryNotFound | TableNotFound => ErrorCategory::NotFound,

            AlreadyExists | SlugTaken | SessionClosed | SessionPaymentPending
            | ProductUnavailable | TableDisabled | TableOccupied | TablePaymentPending => {
                ErrorCategory::Conflict
            }

            InvalidSessionStatus | InvalidOrderStatus | InvalidItemStatus
            | InvalidServiceCallType => ErrorCategory::InvalidState,

            ValidationFailed | InvalidRequest | RequiredField | ValueOutOfRange
            | ConsumerNotInSession | EmptyOrderBatch | ProductInvalidPrice => {
                ErrorCategory::Validation
            }

            Success | Unknown | InternalError | DatabaseError => ErrorCategory::Internal,
        }
    }

    /// HTTP status for this code (derived from the category)
    pub fn http_status(&self) -> StatusCode {
        if *self == ErrorCode::Success {
            return StatusCode::OK;
        }
        match self.category() {
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Default human-readable message
    pub fn message(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            Success => "Success",
            Unknown => "Unknown error",
            ValidationFailed => "Validation failed",
            NotFound => "Resource not found",
            AlreadyExists => "Resource already exists",
            InvalidRequest => "Invalid request",
            RequiredField => "Required field missing",
            ValueOutOfRange => "Value out of range",

            RestaurantNotFound => "Restaurant not found",
            SlugTaken => "Restaurant with this slug already exists",

            SessionNotFound => "Session not found",
            SessionClosed => "Session is closed",
            SessionPaymentPending => "Session is settling payment",
            InvalidSessionStatus => "Invalid session status",
            ConsumerNotFound => "Consumer not found",
            ConsumerNotInSession => "Consumer does not belong to this session",
            OrderNotFound => "Order not found",
            OrderItemNotFound => "Order item not found",
            InvalidOrderStatus => "Invalid order status",
            InvalidItemStatus => "Invalid order item status",
            EmptyOrderBatch => "Order item batch is empty",
            ServiceCallNotFound => "Service call not found",
            InvalidServiceCallType => "Invalid service call type",

            ProductNotFound => "Product not found",
            ProductUnavailable => "Product is not available",
            ProductInvalidPrice => "Product price is invalid",
            CategoryNotFound => "Category not found",

            TableNotFound => "Table not found",
            TableDisabled => "Table is not available",
            TableOccupied => "Table already has an active session",
            TablePaymentPending => "Table is settling payment, not accepting new guests",

            InternalError => "Internal server error",
            DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use ErrorCode::*;
        let code = match value {
            0 => Success,
            1 => Unknown,
            2 => ValidationFailed,
            3 => NotFound,
            4 => AlreadyExists,
            5 => InvalidRequest,
            7 => RequiredField,
            8 => ValueOutOfRange,
            3001 => RestaurantNotFound,
            3002 => SlugTaken,
            4001 => SessionNotFound,
            4002 => SessionClosed,
            4003 => SessionPaymentPending,
            4004 => InvalidSessionStatus,
            4005 => ConsumerNotFound,
            4006 => ConsumerNotInSession,
            4101 => OrderNotFound,
            4102 => OrderItemNotFound,
            4103 => InvalidOrderStatus,
            4104 => InvalidItemStatus,
            4105 => EmptyOrderBatch,
            4201 => ServiceCallNotFound,
            4202 => InvalidServiceCallType,
            6001 => ProductNotFound,
            6002 => ProductUnavailable,
            6003 => ProductInvalidPrice,
            6101 => CategoryNotFound,
            7001 => TableNotFound,
            7002 => TableDisabled,
            7003 => TableOccupied,
            7004 => TablePaymentPending,
            9001 => InternalError,
            9002 => DatabaseError,
            other => return Err(format!("Unknown error code: {other}")),
        };
        Ok(code)
    }
}
