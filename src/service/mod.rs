//! Solver Service
//!
//! Exposes the batch pipeline over HTTP and WebSocket.
//!
//! ## Endpoints
//!
//! - `POST /solve` - Solve one component synchronously
//! - `GET /ws` - WebSocket upgrade for a streaming session
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

pub mod middleware;
pub mod routes;
pub mod state;
pub mod ws;

pub use middleware::{record_session_metrics, request_logging_middleware};
pub use routes::create_router;
pub use state::{ServiceState, SessionRegistry};
pub use ws::WsChannel;
