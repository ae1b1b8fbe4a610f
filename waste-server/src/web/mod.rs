//! Web layer for the waste collection API.
//!
//! `/health` plus one dispatch handler for everything under `/api`, which
//! resolves requests against the generated route table.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
