//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID span, metrics)
//!     → offers.rs / segment.rs (decode, call core, encode)
//!     → error.rs (client errors as JSON)
//! ```

pub mod error;
pub mod offers;
pub mod request;
pub mod segment;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use offers::{ApiResponse, ApplyOfferRequest, ApplyOfferResponse};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
