//! HTTP handler modules for the pathfuse API.
//!
//! Each sub-module implements thin handlers that parse the query string,
//! acquire the service lock, delegate to [`PathwayService`] and return the
//! response. No business logic lives in handlers.
//!
//! [`PathwayService`]: crate::service::PathwayService

pub mod catalog;
pub mod overlap;
pub mod paths;
pub mod pathways;
