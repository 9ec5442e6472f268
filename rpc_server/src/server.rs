//! The HTTP transport (spec.md §6), grounded on `server/server.go`'s
//! `StartRPC`/`rpc.NewServer` wiring: one `jsonrpc-http-server` listener
//! carrying the three namespaces registered in `lib.rs`.

use hook_engine::Dispatcher;
use jsonrpc_core::IoHandler;
use jsonrpc_http_server::ServerBuilder;
use std::net::SocketAddr;
use task_executor::TaskExecutor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcServerError {
    #[error("failed to bind hook RPC listener on {0}: {1}")]
    Bind(SocketAddr, std::io::Error),
}

/// Builds the `IoHandler` and starts serving it on `addr`; the listener is
/// closed as soon as `executor`'s shutdown signal fires.
pub fn spawn(executor: &TaskExecutor, addr: SocketAddr, dispatcher: Dispatcher) -> Result<(), RpcServerError> {
    let mut io = IoHandler::new();
    crate::admin::register(&mut io, dispatcher.clone());
    crate::block::register(&mut io, dispatcher.clone());
    crate::attest::register(&mut io, dispatcher);

    let server = ServerBuilder::new(io)
        .threads(num_cpus::get())
        .start_http(&addr)
        .map_err(|err| RpcServerError::Bind(addr, err))?;

    tracing::info!(%addr, "hook RPC listening");
    let close_handle = server.close_handle();
    executor.handle().spawn_blocking(move || server.wait());

    let exit = executor.exit_signal();
    executor.handle().spawn(async move {
        exit.await;
        close_handle.close();
        tracing::info!("hook RPC server stopped");
    });

    Ok(())
}
