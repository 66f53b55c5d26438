//! Edge lifecycle, served by the edge lane of the source vertex.
//!
//! The edge lane owns the source's out-records and tag markers. Every
//! out-record has a mirrored in-record in the target's namespace, written
//! by the target's mirror lane when called from here. The mirror lane is a
//! separate entry point, so a self-loop's mirror call never waits on the
//! lane running the edge operation.

use kvgraph_core::body::{self, Body};
use kvgraph_core::keys::OutEdgeKey;
use kvgraph_core::tags::{self, TagSet};
use kvgraph_core::{KeyPattern, QueryId};
use kvgraph_storage::KvStore;

use super::scope::TxnScope;
use crate::error::GraphError;
use crate::runtime::{ActorAddress, CallContext, EdgeOp, Message, MirrorOp};
use crate::schema::common::Reply;

/// Result of deleting an edge that is not there.
pub const LINK_MISSING: &str = "Link does not exist";

pub(crate) async fn handle(ctx: &CallContext<'_>, op: EdgeOp) -> Result<Reply, GraphError> {
    let source = ctx.id().clone();
    match op {
        EdgeOp::Create {
            edge_type,
            target,
            body,
        } => create(ctx, OutEdgeKey::new(source, edge_type, target), body).await,
        EdgeOp::Update {
            edge_type,
            target,
            body,
        } => update(ctx, OutEdgeKey::new(source, edge_type, target), body).await,
        EdgeOp::Delete { edge_type, target } => {
            delete(ctx, &OutEdgeKey::new(source, edge_type, target)).await
        }
    }
}

/// Creates (or replaces) the edge `key` with `body`.
///
/// The previous edge, its tag markers and its in-record are retracted first.
/// A mirror failure fails the create without undoing the out-record.
async fn create(ctx: &CallContext<'_>, key: OutEdgeKey, body: Body) -> Result<Reply, GraphError> {
    let store = ctx.store();
    let scope = TxnScope::begin(store, ctx.query_id())?;

    delete(ctx, &key).await?;

    store.set(&key.encode(), &body::encode(&body), ctx.query_id())?;
    write_tags(store, &key, &tags::tags_of(&body), ctx.query_id())?;
    mirror(
        ctx,
        &key,
        MirrorOp::Register {
            in_link_type: key.edge_type.to_string(),
        },
    )
    .await?;

    scope.end()?;
    Ok(Reply::ok())
}

/// Deep-merges `patch` into the edge body, re-deriving its tag markers.
///
/// Updating an edge that does not exist creates it with `patch` as body.
/// The in-record is never touched by an update of an existing edge.
async fn update(ctx: &CallContext<'_>, key: OutEdgeKey, patch: Body) -> Result<Reply, GraphError> {
    let store = ctx.store();
    let encoded = key.encode();
    let scope = TxnScope::begin(store, ctx.query_id())?;

    let Some(stored) = store.get(&encoded)? else {
        let reply = create(ctx, key, patch).await?;
        scope.end()?;
        return Ok(reply);
    };

    let mut merged = body::decode(&stored)?;
    let old_tags = tags::tags_of(&merged);
    body::deep_merge(&mut merged, patch);
    let diff = tags::diff(&old_tags, &tags::tags_of(&merged));

    for tag in &diff.stale {
        store.delete(&key.tag_key(tag).encode(), ctx.query_id())?;
    }
    store.set(&encoded, &body::encode(&merged), ctx.query_id())?;
    for tag in &diff.current {
        store.set(&key.tag_key(tag).encode(), b"", ctx.query_id())?;
    }

    scope.end()?;
    Ok(Reply::ok())
}

/// Deletes the edge `key`, its tag markers and its in-record.
async fn delete(ctx: &CallContext<'_>, key: &OutEdgeKey) -> Result<Reply, GraphError> {
    let store = ctx.store();
    let encoded = key.encode();
    let scope = TxnScope::begin(store, ctx.query_id())?;

    if !store.contains(&encoded)? {
        scope.end()?;
        return Ok(Reply::ok_with(LINK_MISSING));
    }

    // Markers are found by key, so an unreadable body cannot strand them.
    let markers = store.scan(&KeyPattern::parse(&key.tags_pattern())?)?;
    store.delete(&encoded, ctx.query_id())?;
    for marker in &markers {
        store.delete(marker, ctx.query_id())?;
    }
    mirror(
        ctx,
        key,
        MirrorOp::Unregister {
            in_link_type: key.edge_type.to_string(),
        },
    )
    .await?;

    scope.end()?;
    Ok(Reply::ok())
}

fn write_tags(
    store: &dyn KvStore,
    key: &OutEdgeKey,
    tags: &TagSet,
    query_id: &QueryId,
) -> Result<(), GraphError> {
    for tag in tags {
        store.set(&key.tag_key(tag).encode(), b"", query_id)?;
    }
    Ok(())
}

/// Calls the target's mirror entry point, failing if it replies failed.
async fn mirror(ctx: &CallContext<'_>, key: &OutEdgeKey, op: MirrorOp) -> Result<(), GraphError> {
    if key.source == key.target {
        tracing::debug!(vertex = %key.source, "self-loop mirrored through the mirror lane");
    }
    let reply = ctx.call(key.target.clone(), Message::Mirror(op)).await;
    if reply.is_ok() {
        Ok(())
    } else {
        Err(GraphError::Mirror {
            address: ActorAddress::mirror(key.target.clone()).to_string(),
            message: reply.message(),
        })
    }
}
