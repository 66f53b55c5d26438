//! Vertex lifecycle, served by the vertex lane.
//!
//! The vertex lane is the only writer of a vertex's body key. Deleting a
//! vertex cascades into edge deletes: its own out-edges through its edge
//! lane, and each in-edge through the edge lane of the source that owns it.

use kvgraph_core::body::{self, Body};
use kvgraph_core::keys::{self, InEdgeKey, OutEdgeKey};
use kvgraph_core::KeyPattern;

use super::scope::TxnScope;
use crate::error::GraphError;
use crate::runtime::{CallContext, EdgeOp, Message, VertexOp};
use crate::schema::common::Reply;

pub(crate) async fn handle(ctx: &CallContext<'_>, op: VertexOp) -> Result<Reply, GraphError> {
    match op {
        VertexOp::Create { body } => create(ctx, body).await,
        VertexOp::Update { body } => update(ctx, body),
        VertexOp::Delete => delete(ctx).await,
    }
}

/// Creates (or re-creates) the vertex with `body`.
///
/// Any previous incarnation is purged first, edges included, so creating
/// twice with the same body leaves the store as creating once.
async fn create(ctx: &CallContext<'_>, body: Body) -> Result<Reply, GraphError> {
    let store = ctx.store();
    let scope = TxnScope::begin(store, ctx.query_id())?;

    delete(ctx).await?;
    store.set(&keys::body_key(ctx.id()), &body::encode(&body), ctx.query_id())?;

    scope.end()?;
    tracing::debug!(vertex = %ctx.id(), "vertex body written");
    Ok(Reply::ok())
}

/// Deep-merges `patch` into the stored body; a missing body merges into `{}`.
fn update(ctx: &CallContext<'_>, patch: Body) -> Result<Reply, GraphError> {
    let store = ctx.store();
    let key = keys::body_key(ctx.id());
    let scope = TxnScope::begin(store, ctx.query_id())?;

    let mut current = match store.get(&key)? {
        Some(bytes) => body::decode(&bytes)?,
        None => Body::new(),
    };
    body::deep_merge(&mut current, patch);
    store.set(&key, &body::encode(&current), ctx.query_id())?;

    scope.end()?;
    Ok(Reply::ok())
}

/// Deletes every edge touching the vertex, then its body.
///
/// A missing vertex is not an error. If any cascaded edge delete fails the
/// body is kept and the accumulated failures are reported.
async fn delete(ctx: &CallContext<'_>) -> Result<Reply, GraphError> {
    let store = ctx.store();
    let id = ctx.id();
    let scope = TxnScope::begin(store, ctx.query_id())?;
    let mut failures = Vec::new();

    let outgoing = store.scan(&KeyPattern::parse(&keys::out_edges_pattern(id))?)?;
    for key in outgoing {
        let edge = OutEdgeKey::parse(&key)?;
        let message = Message::Edge(EdgeOp::Delete {
            edge_type: edge.edge_type,
            target: edge.target,
        });
        let reply = ctx.call(edge.source, message).await;
        if !reply.is_ok() {
            failures.push(reply.message());
        }
    }

    // Scanned after the out-edges so self-loops already removed above are
    // not deleted twice.
    let incoming = store.scan(&KeyPattern::parse(&keys::in_edges_pattern(id))?)?;
    for key in incoming {
        let edge = InEdgeKey::parse(&key)?;
        let message = Message::Edge(EdgeOp::Delete {
            edge_type: edge.edge_type,
            target: edge.target,
        });
        let reply = ctx.call(edge.source, message).await;
        if !reply.is_ok() {
            failures.push(reply.message());
        }
    }

    if !failures.is_empty() {
        return Err(GraphError::Cascade(failures));
    }

    store.delete(&keys::body_key(id), ctx.query_id())?;
    scope.end()?;
    Ok(Reply::ok())
}
