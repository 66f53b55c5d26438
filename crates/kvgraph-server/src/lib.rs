//! Actor runtime and HTTP/JSON API for the kvgraph consistency core.
//!
//! Each vertex is an actor with three serialized lanes (vertex, edge,
//! mirror). Lifecycle operations run in those lanes and keep a flat
//! key-value store consistent: every out-edge has a mirrored in-edge, tag
//! markers track edge bodies, and deleting a vertex deletes its edges.
//! This crate contains the runtime, the lifecycle logic, the API schema
//! types, error handling, and route definitions.

pub mod config;
pub mod error;
pub mod graph;
pub mod handlers;
pub mod router;
pub mod runtime;
pub mod schema;
pub mod service;
pub mod state;
