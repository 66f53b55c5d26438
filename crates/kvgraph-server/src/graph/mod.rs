//! Graph consistency layer: what each lane does in its turn.
//!
//! - [`vertex`]: vertex lifecycle (create/update/delete with edge cascade)
//! - [`edge`]: edge lifecycle, tag index maintenance, mirror calls
//! - [`mirror`]: in-record register/unregister
//! - [`query`]: non-mutating reads served straight from the store
//! - [`scope`]: transaction scope guard

pub mod edge;
pub mod mirror;
pub mod query;
pub mod scope;
pub mod vertex;

#[cfg(test)]
pub(crate) mod testing;

use crate::runtime::{CallContext, Message};
use crate::schema::common::Reply;

pub use scope::TxnScope;

/// Runs `message` in the current turn and renders the outcome as a reply.
pub(crate) async fn dispatch(ctx: &CallContext<'_>, message: Message) -> Reply {
    let operation = message.name();
    let outcome = match message {
        Message::Vertex(op) => vertex::handle(ctx, op).await,
        Message::Edge(op) => edge::handle(ctx, op).await,
        Message::Mirror(op) => mirror::handle(ctx, op),
    };

    match outcome {
        Ok(reply) => {
            tracing::info!(
                address = %ctx.address(),
                operation,
                query_id = %ctx.query_id(),
                "operation completed"
            );
            reply
        }
        Err(err) => {
            tracing::warn!(
                address = %ctx.address(),
                operation,
                query_id = %ctx.query_id(),
                error = %err,
                "operation failed"
            );
            Reply::failed(format!("ERROR {operation} {}: {err}", ctx.id()))
        }
    }
}
