//! JSON-RPC 2.0 hook surface (spec.md §6): three namespaces — `admin`,
//! `block`, `attest` — exposing the closed 13-point action set (C10)
//! through `hook_engine::Dispatcher`. Grounded on
//! `server/apis/{attest,block,roles,backend}.go`'s namespace/method layout.

mod admin;
mod attest;
mod block;
mod server;
mod wire;

pub use server::{spawn, RpcServerError};
