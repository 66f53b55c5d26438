//! HTTP handler modules for the kvgraph API.
//!
//! Each sub-module implements thin handlers that parse requests, delegate to
//! [`GraphService`](crate::service::GraphService), and return JSON
//! responses. No business logic lives in handlers.

pub mod ops;
pub mod queries;
