//! The HTTP transport for the REST side channel, bound to
//! `Config::openapi_port()` (spec.md §6: `http_port + 1`). Grounded on
//! `beacon_node/http_api`'s `bind_with_graceful_shutdown` wiring, swapped
//! from axum to warp to match the teacher's `validator_client/http_api`.

use crate::routes;
use attacker_store::Store;
use beacon_client::BeaconClient;
use hook_engine::Engine;
use std::net::SocketAddr;
use task_executor::TaskExecutor;
use warp::Filter;

pub fn spawn(executor: &TaskExecutor, addr: SocketAddr, engine: Engine, store: Option<Store>, beacon: BeaconClient) {
    let routes = routes::routes(engine, store, beacon);
    let (_, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, executor.exit_signal());

    tracing::info!(%addr, "openapi server listening");
    executor.handle().spawn(async move {
        server.await;
        tracing::info!("openapi server stopped");
    });
}
