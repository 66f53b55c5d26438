//! Demo graph loaded by `kvgraph seed`.

use serde_json::json;

use kvgraph_server::schema::common::Reply;
use kvgraph_server::schema::ops::Operation;
use kvgraph_server::service::GraphService;

pub const VERTICES: [&str; 9] = ["rt", "a", "b", "c", "d", "e", "f", "g", "h"];

/// `(source, type, target, tags)`; each edge body is named `2<target>`.
pub const EDGES: [(&str, &str, &str, &[&str]); 13] = [
    ("rt", "type1", "a", &["t1", "t2"]),
    ("rt", "type2", "a", &["t2", "t4"]),
    ("rt", "type2", "b", &["t2"]),
    ("rt", "type1", "c", &[]),
    ("a", "type3", "e", &["t3"]),
    ("b", "type4", "e", &["t1", "t2", "t3"]),
    ("c", "type3", "d", &["t1"]),
    ("d", "type1", "b", &["t1", "t3"]),
    ("e", "type2", "b", &["t4"]),
    ("e", "type1", "f", &["t1", "t4"]),
    ("f", "type5", "g", &["t1", "t2", "t3", "t4"]),
    ("g", "type2", "d", &["t5"]),
    ("g", "type2", "h", &[]),
];

/// Creates the demo graph, returning the first failed reply if any.
pub async fn seed(service: &GraphService) -> Result<usize, Reply> {
    let mut applied = 0;
    for id in VERTICES {
        check(service.invoke(Operation::VertexCreate, id, json!({})).await)?;
        applied += 1;
    }
    for (source, link_type, target, tags) in EDGES {
        let payload = json!({
            "link_type": link_type,
            "descendant_uuid": target,
            "link_body": {"name": format!("2{target}"), "tags": tags},
        });
        check(service.invoke(Operation::EdgeCreate, source, payload).await)?;
        applied += 1;
    }
    Ok(applied)
}

fn check(reply: Reply) -> Result<(), Reply> {
    if reply.is_ok() {
        Ok(())
    } else {
        Err(reply)
    }
}
