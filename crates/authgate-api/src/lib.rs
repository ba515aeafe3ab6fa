//! # authgate-api
//!
//! RPC surface of the AuthGate gateway, served as JSON over HTTP with Axum.
//!
//! | Route | RPC |
//! |---|---|
//! | `POST /api/auth/login` | Login |
//! | `POST /api/auth/register` | Register |
//! | `POST /api/auth/verify` | Verify |
//! | `POST /api/auth/logout` | Logout |
//! | `GET /health` | bridge counters and store reachability |

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Gateway, Transport, run_server};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
