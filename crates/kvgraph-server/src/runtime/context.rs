//! Per-turn execution context handed to lifecycle operations.

use kvgraph_core::{QueryId, VertexId};
use kvgraph_storage::KvStore;

use super::address::ActorAddress;
use super::message::Message;
use super::Runtime;
use crate::schema::common::Reply;

/// What an operation knows about the turn it runs in: its own address, the
/// address of the actor that called it (if any) and the query id shared by
/// every step of the logical mutation.
pub struct CallContext<'a> {
    pub(super) runtime: &'a Runtime,
    pub(super) address: ActorAddress,
    pub(super) caller: Option<ActorAddress>,
    pub(super) query_id: QueryId,
}

impl CallContext<'_> {
    /// The vertex this turn runs for.
    pub fn id(&self) -> &VertexId {
        &self.address.id
    }

    pub fn address(&self) -> &ActorAddress {
        &self.address
    }

    /// Address of the calling actor; `None` for top-level requests and signals.
    pub fn caller(&self) -> Option<&ActorAddress> {
        self.caller.as_ref()
    }

    pub fn query_id(&self) -> &QueryId {
        &self.query_id
    }

    pub fn store(&self) -> &dyn KvStore {
        self.runtime.store()
    }

    /// Synchronously calls `message` on the matching lane of `id`.
    ///
    /// The callee sees this turn's address as its caller and shares its
    /// query id. A lane may not call itself: its own operations run inline.
    pub async fn call(&self, id: VertexId, message: Message) -> Reply {
        let target = message.address(id);
        if target == self.address {
            tracing::error!(address = %target, operation = message.name(), "rejected re-entrant call");
            return Reply::failed(format!("{} may not call its own lane", target));
        }
        self.runtime
            .call(
                target,
                Some(self.address.clone()),
                self.query_id.clone(),
                message,
            )
            .await
    }
}
