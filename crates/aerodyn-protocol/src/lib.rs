//! AeroDyn Protocol - wire types for the simulation service
//!
//! Covers the two JSON endpoints exposed by the AeroDyn backend:
//! `POST /simulate` (parameters in, dynamic series out) and
//! `POST /llm_update` (free-text reconfiguration prompt in, status out).

pub mod error;
pub mod params;
pub mod reconfigure;
pub mod response;

pub use error::*;
pub use params::*;
pub use reconfigure::*;
pub use response::*;
