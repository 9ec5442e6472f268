//! REST introspection side channel (spec.md §6): duties, strategy,
//! reward/reorg history, and metrics, served alongside the JSON-RPC hook
//! surface in `rpc_server` on the adjacent `http_port + 1`.

mod handlers;
mod routes;
mod server;

pub use server::spawn;
