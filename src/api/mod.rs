//! HTTP surface: router, handlers, response bodies and error mapping.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
