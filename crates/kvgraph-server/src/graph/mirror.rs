//! In-record maintenance, served by the mirror lane of the target vertex.
//!
//! The source of the in-edge is never part of the message: it is the vertex
//! whose edge lane made the call.

use kvgraph_core::keys::InEdgeKey;
use kvgraph_core::EdgeType;

use super::scope::TxnScope;
use crate::error::GraphError;
use crate::runtime::{CallContext, MirrorOp};
use crate::schema::common::Reply;

pub(crate) fn handle(ctx: &CallContext<'_>, op: MirrorOp) -> Result<Reply, GraphError> {
    let caller = ctx.caller().ok_or(GraphError::MissingCaller)?;
    let (in_link_type, register) = match op {
        MirrorOp::Register { in_link_type } => (in_link_type, true),
        MirrorOp::Unregister { in_link_type } => (in_link_type, false),
    };
    let edge_type = EdgeType::new(in_link_type)
        .map_err(|err| GraphError::Validation(format!("in_link_type:string {err};")))?;

    let key = InEdgeKey::new(ctx.id().clone(), caller.id.clone(), edge_type).encode();
    let store = ctx.store();
    let scope = TxnScope::begin(store, ctx.query_id())?;
    if register {
        store.set(&key, b"", ctx.query_id())?;
    } else {
        store.delete(&key, ctx.query_id())?;
    }
    scope.end()?;

    tracing::debug!(key = %key, register, "in-record updated");
    Ok(Reply::ok())
}
