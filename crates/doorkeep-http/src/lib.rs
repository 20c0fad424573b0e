//! Inbound HTTP surface for the doorkeep endpoint.
//!
//! Two routes, both POST:
//!
//! - `/api/open-door`: remote door open, served in every device mode. The
//!   caller is a trusted internal peer (an already-authenticated building
//!   system); there is deliberately no authentication at this layer, a named
//!   limitation of the deployment, not a goal.
//! - `/api`: one enrollment exchange, served only when the process runs in
//!   enroller mode.
//!
//! Handlers hold injected `Arc` handles rather than a process-global
//! controller, so tests run the whole surface against mock hardware.
//! Hardware contention with the access loop resolves inside the actuator's
//! lock: a remote open arriving mid-cycle simply waits its turn.

pub mod responses;
pub mod server;

pub use responses::{EnrollmentResponse, StatusResponse};
pub use server::{AppState, bind, serve};
