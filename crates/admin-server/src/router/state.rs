use std::{sync::Arc, time::Duration};

use crate::Engine;

struct ServerStateInner {
    engine: Engine,
    request_body_limit_bytes: usize,
    timeout: Option<Duration>,
}

#[derive(Clone)]
pub(super) struct ServerState {
    inner: Arc<ServerStateInner>,
}

impl ServerState {
    pub(super) fn new(engine: Engine, request_body_limit_bytes: usize, timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(ServerStateInner {
                engine,
                request_body_limit_bytes,
                timeout,
            }),
        }
    }

    pub(super) fn engine(&self) -> &Engine {
        &self.inner.engine
    }

    pub(super) fn request_body_limit_bytes(&self) -> usize {
        self.inner.request_body_limit_bytes
    }

    pub(super) fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }
}
