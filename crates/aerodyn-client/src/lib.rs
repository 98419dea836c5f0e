//! AeroDyn client - endpoint access and update orchestration
//!
//! Owns the network edge of the control tower: typed access to the two
//! backend endpoints, monotonic request fencing so a slow response can
//! never overwrite a newer one, and the reconfiguration state machine.

pub mod fence;
pub mod http;
pub mod orchestrator;
pub mod reconfigure;

pub use fence::*;
pub use http::*;
pub use orchestrator::*;
pub use reconfigure::*;
