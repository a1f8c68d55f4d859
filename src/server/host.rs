//! Host engine contract and the lifecycle-owning `Server`.
//!
//! # Design Decisions
//! - The host owns sockets, TLS and keep-alive; the router core never sees
//!   host engine types, only `ServerAdapter`
//! - `Server` is an explicit {Stopped, Running} value; transitions happen only
//!   through `start` and `stop`
//! - `stop` on a stopped server is a no-op

use std::future::Future;
use std::sync::Arc;

use crate::error::ServerError;
use crate::handler::Handler;
use crate::server::adapter::ServerAdapter;

/// A socket-level HTTP engine that feeds requests to a `ServerAdapter`.
pub trait HttpHost: Send + Sync + 'static {
    /// Reference to a live listener.
    type Handle: Send + Sync;

    /// Begin accepting requests and return once the listener is live.
    fn start(
        &self,
        adapter: Arc<ServerAdapter>,
    ) -> impl Future<Output = Result<Self::Handle, ServerError>> + Send;

    /// Stop the listener identified by `handle` and wait for it to finish.
    fn stop(&self, handle: Self::Handle) -> impl Future<Output = Result<(), ServerError>> + Send;
}

enum ServerState<T> {
    Stopped,
    Running(T),
}

/// A routing table bound to a host engine.
pub struct Server<H: HttpHost> {
    adapter: Arc<ServerAdapter>,
    host: H,
    state: ServerState<H::Handle>,
}

impl<H: HttpHost> Server<H> {
    pub fn new(handler: Handler, host: H) -> Self {
        Self {
            adapter: Arc::new(ServerAdapter::new(handler)),
            host,
            state: ServerState::Stopped,
        }
    }

    /// Start listening; starting a running server does nothing.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        if self.is_running() {
            tracing::debug!("Server already running");
            return Ok(());
        }
        let handle = self.host.start(self.adapter.clone()).await?;
        self.state = ServerState::Running(handle);
        Ok(())
    }

    /// Stop listening; stopping a stopped server does nothing.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        match std::mem::replace(&mut self.state, ServerState::Stopped) {
            ServerState::Running(handle) => {
                self.host.stop(handle).await?;
                tracing::info!("Server stopped");
                Ok(())
            }
            ServerState::Stopped => Ok(()),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ServerState::Running(_))
    }

    /// The live listener handle, if running.
    pub fn handle(&self) -> Option<&H::Handle> {
        match &self.state {
            ServerState::Running(handle) => Some(handle),
            ServerState::Stopped => None,
        }
    }

    pub fn adapter(&self) -> &Arc<ServerAdapter> {
        &self.adapter
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
