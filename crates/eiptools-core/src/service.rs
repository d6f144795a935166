//! Readiness tracking for long-running loaders.
//!
//! The server loads the catalog and builds the graph before it can answer
//! most requests. Each loader gets a [`ServiceHandle`]; the `/health` route
//! reports a [`ServiceStatus`] snapshot of every handle.
//!
//! ```rust
//! use eiptools_core::service::{ServiceHandle, ServiceState};
//!
//! let graph = ServiceHandle::new("graph");
//! assert_eq!(graph.state(), ServiceState::Stopped);
//!
//! graph.set_state(ServiceState::Loading);
//! graph.set_state(ServiceState::Ready);
//! assert!(graph.state().is_ready());
//! ```

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Lifecycle state of a loader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum ServiceState {
    /// Not started yet.
    Stopped,
    /// Reading files or fetching data.
    Loading,
    /// Fully loaded.
    Ready,
    /// Loaded, but with skipped documents or missing inputs.
    Degraded(String),
    /// Could not load at all.
    Failed(String),
}

impl ServiceState {
    /// `true` only for [`ServiceState::Ready`].
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// `true` when requests can be served, possibly with partial data.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Ready | Self::Degraded(_))
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => f.write_str("stopped"),
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
            Self::Degraded(reason) => write!(f, "degraded: {reason}"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Serializable snapshot of a handle, as reported on `/health`.
#[derive(Clone, Debug, Serialize)]
pub struct ServiceStatus {
    pub name: String,
    #[serde(flatten)]
    pub state: ServiceState,
    pub uptime_secs: u64,
}

/// Shared, cloneable handle to a loader's state.
///
/// Clones observe the same state.
#[derive(Clone)]
pub struct ServiceHandle {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    state: RwLock<ServiceState>,
    created: Instant,
}

impl ServiceHandle {
    /// New handle in [`ServiceState::Stopped`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                state: RwLock::new(ServiceState::Stopped),
                created: Instant::now(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn state(&self) -> ServiceState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Transition to `state`.
    pub fn set_state(&self, state: ServiceState) {
        match &state {
            ServiceState::Failed(reason) => {
                log::error!("{} failed: {reason}", self.inner.name)
            }
            ServiceState::Degraded(reason) => {
                log::warn!("{} degraded: {reason}", self.inner.name)
            }
            other => log::info!("{} is {other}", self.inner.name),
        }
        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn elapsed(&self) -> Duration {
        self.inner.created.elapsed()
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            name: self.inner.name.clone(),
            state: self.state(),
            uptime_secs: self.elapsed().as_secs(),
        }
    }
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(ServiceState::Loading.to_string(), "loading");
        assert_eq!(
            ServiceState::Degraded("12 documents skipped".into()).to_string(),
            "degraded: 12 documents skipped"
        );
        assert_eq!(
            ServiceState::Failed("no catalog".into()).to_string(),
            "failed: no catalog"
        );
    }

    #[test]
    fn test_state_predicates() {
        assert!(ServiceState::Ready.is_ready());
        assert!(!ServiceState::Degraded("x".into()).is_ready());
        assert!(ServiceState::Degraded("x".into()).is_available());
        assert!(!ServiceState::Loading.is_available());
        assert!(!ServiceState::Failed("x".into()).is_available());
    }

    #[test]
    fn test_clones_share_state() {
        let catalog = ServiceHandle::new("catalog");
        let other = catalog.clone();
        catalog.set_state(ServiceState::Ready);
        assert_eq!(other.state(), ServiceState::Ready);
    }

    #[test]
    fn test_status_serializes_flat() {
        let graph = ServiceHandle::new("graph");
        graph.set_state(ServiceState::Degraded("3 dangling".into()));
        let json = serde_json::to_value(graph.status()).unwrap();
        assert_eq!(json["name"], "graph");
        assert_eq!(json["state"], "degraded");
        assert_eq!(json["reason"], "3 dangling");
    }

    #[test]
    fn test_set_state_visible_across_threads() {
        let handle = ServiceHandle::new("graph");
        let loader = handle.clone();
        std::thread::spawn(move || {
            loader.set_state(ServiceState::Loading);
            loader.set_state(ServiceState::Ready);
        })
        .join()
        .unwrap();
        assert!(handle.state().is_ready());
        assert_eq!(handle.status().state, ServiceState::Ready);
    }
}
