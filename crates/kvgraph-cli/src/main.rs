//! kvgraph command-line tool.
//!
//! Provides the `kvgraph` binary for working with a graph stored in a
//! SQLite database without running the HTTP server. Operations go through
//! the same `GraphService` the server uses, so validation and lifecycle
//! behavior are identical from both entry points.

mod seed;

use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use kvgraph_core::KeyPattern;
use kvgraph_server::schema::ops::Operation;
use kvgraph_server::service::GraphService;
use kvgraph_storage::{digest, KvStore, SqliteStore};

/// kvgraph consistency core tools.
#[derive(Parser)]
#[command(name = "kvgraph", about = "Graph operations over a key-value store")]
struct Cli {
    /// Path to the graph database file.
    #[arg(long, global = true, default_value = "kvgraph.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run one operation (e.g. `vertex.create`) and print its reply.
    Op {
        operation: String,
        id: String,
        /// Request object as JSON (default: `{}`).
        json: Option<String>,
    },
    /// List the keys matching a pattern.
    Keys {
        pattern: String,
        /// Print a blake3 digest of the matching records instead.
        #[arg(long)]
        digest: bool,
    },
    /// Load a small demo graph.
    Seed,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let store = match SqliteStore::new(&cli.db) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", cli.db, e);
            process::exit(3);
        }
    };

    let exit_code = match cli.command {
        Commands::Op {
            operation,
            id,
            json,
        } => run_op(store, &operation, &id, json.as_deref()).await,
        Commands::Keys { pattern, digest } => run_keys(store.as_ref(), &pattern, digest),
        Commands::Seed => run_seed(store).await,
    };
    process::exit(exit_code);
}

/// Execute the op subcommand.
///
/// Returns exit code: 0 = ok reply, 1 = failed reply, 2 = bad arguments.
async fn run_op(store: Arc<SqliteStore>, operation: &str, id: &str, json: Option<&str>) -> i32 {
    let operation: Operation = match operation.parse() {
        Ok(op) => op,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };
    let payload = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("Error: invalid request JSON: {}", e);
                return 2;
            }
        },
        None => Value::Null,
    };

    let service = GraphService::new(store);
    let reply = service.invoke(operation, id, payload).await;
    match serde_json::to_string_pretty(&reply) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            return 3;
        }
    }
    if reply.is_ok() {
        0
    } else {
        1
    }
}

/// Execute the keys subcommand.
fn run_keys(store: &dyn KvStore, pattern: &str, want_digest: bool) -> i32 {
    let pattern = match KeyPattern::parse(pattern) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    if want_digest {
        return match digest(store, &pattern) {
            Ok(hash) => {
                println!("{}", hash.to_hex());
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                3
            }
        };
    }

    match store.scan(&pattern) {
        Ok(keys) => {
            for key in keys {
                println!("{}", key);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            3
        }
    }
}

/// Execute the seed subcommand.
async fn run_seed(store: Arc<SqliteStore>) -> i32 {
    let service = GraphService::new(store);
    match seed::seed(&service).await {
        Ok(applied) => {
            println!("Seeded {} operations", applied);
            0
        }
        Err(reply) => {
            eprintln!("Error: seed failed: {}", reply.message());
            1
        }
    }
}
