//! Actor runtime: per-id serialized lanes and call routing.
//!
//! A [`Runtime`] owns the injected store, the [`LaneTable`] and the egress
//! channel. Messages are delivered in three ways:
//!
//! - [`CallContext::call`]: a synchronous call from one lane to another,
//!   awaited in the caller's turn, with the caller's address attached.
//! - [`Runtime::request`]: a top-level awaited call with no caller.
//! - [`Runtime::signal`]: fire-and-forget; the reply is published on the
//!   egress channel since nobody waits for it.
//!
//! Lanes are layered: vertex lanes call edge lanes, edge lanes call mirror
//! lanes, mirror lanes call nobody. No call chain can wait on a lane it
//! already holds, so self-loops and opposite-direction edge creates never
//! deadlock.

pub mod address;
pub mod context;
pub mod lanes;
pub mod message;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use kvgraph_core::{QueryId, VertexId};
use kvgraph_storage::KvStore;

use crate::graph;
use crate::schema::common::{PublishedReply, Reply};

pub use address::{ActorAddress, Lane};
pub use context::CallContext;
pub use lanes::LaneTable;
pub use message::{EdgeOp, Message, MirrorOp, VertexOp};

/// Capacity of the egress channel; slow subscribers see `Lagged`.
const EGRESS_CAPACITY: usize = 256;

/// Boxed reply future; boxing breaks the type-level recursion of lanes
/// calling lanes.
pub type ReplyFuture<'a> = Pin<Box<dyn Future<Output = Reply> + Send + 'a>>;

struct RuntimeInner {
    store: Arc<dyn KvStore>,
    lanes: Arc<LaneTable>,
    egress: broadcast::Sender<PublishedReply>,
}

/// Cheaply cloneable handle to the actor runtime.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

impl Runtime {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let (egress, _) = broadcast::channel(EGRESS_CAPACITY);
        Runtime {
            inner: Arc::new(RuntimeInner {
                store,
                lanes: Arc::new(LaneTable::new()),
                egress,
            }),
        }
    }

    pub fn store(&self) -> &dyn KvStore {
        self.inner.store.as_ref()
    }

    pub fn lanes(&self) -> &Arc<LaneTable> {
        &self.inner.lanes
    }

    /// Subscribes to replies of signalled operations.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedReply> {
        self.inner.egress.subscribe()
    }

    /// Runs `message` in a turn of `target`, waiting for the lane first.
    pub fn call(
        &self,
        target: ActorAddress,
        caller: Option<ActorAddress>,
        query_id: QueryId,
        message: Message,
    ) -> ReplyFuture<'_> {
        Box::pin(async move {
            let _turn = self.inner.lanes.acquire(&target).await;
            tracing::debug!(
                address = %target,
                operation = message.name(),
                query_id = %query_id,
                "actor turn started"
            );
            let ctx = CallContext {
                runtime: self,
                address: target,
                caller,
                query_id,
            };
            graph::dispatch(&ctx, message).await
        })
    }

    /// Top-level awaited call of `message` on `id`.
    pub async fn request(&self, id: VertexId, query_id: QueryId, message: Message) -> Reply {
        let target = message.address(id);
        self.call(target, None, query_id, message).await
    }

    /// Fire-and-forget delivery of `message` to `id`.
    ///
    /// The reply is published on the egress channel once the operation
    /// completes.
    pub fn signal(&self, id: VertexId, query_id: QueryId, message: Message) -> JoinHandle<()> {
        let runtime = self.clone();
        tokio::spawn(async move {
            let target = message.address(id);
            let address = target.to_string();
            let reply = runtime.call(target, None, query_id.clone(), message).await;
            runtime.publish(PublishedReply {
                query_id,
                address,
                reply,
            });
        })
    }

    fn publish(&self, published: PublishedReply) {
        if self.inner.egress.send(published).is_err() {
            tracing::debug!("no egress subscribers; signal reply dropped");
        }
    }
}
