mod envelope;
mod error;
mod handlers;
mod responses;
mod server;
pub mod validation;

pub use envelope::{ApiResponse, Envelope, REVERTED_MESSAGE};
pub use error::{classify, ApiError, ErrorReply, INTERNAL_MESSAGE, TRANSPORT_MESSAGE, VALIDATION_MESSAGE};
pub use responses::*;
pub use server::{router, ApiServer, AppState};
