//! View state for the list pages.
//!
//! A [`View`] owns a local copy of some server-side data and walks through
//! `Loading -> Ready -> (Mutating -> Ready)*`:
//!
//! - [`View::load`] fetches the data. A failed fetch leaves an empty value and
//!   an error message for the page's error panel; the view is still usable.
//! - [`View::mutate`] marks one key busy, sends the request and, on success,
//!   applies a reconcile closure. On failure the data is left exactly as it
//!   was and an alert notice is set. Nothing is retried.
//! - [`View::unmount`] marks the view gone. Completions that arrive later are
//!   dropped without touching state.
//!
//! Each concrete view declares, per mutation, whether the reconcile step
//! replaces its data with the server's answer or patches the local copy.
//!
//! Locks are never held across an `.await`.

pub mod addresses;
pub mod cart;
pub mod orders;
pub mod products;
pub mod wishlist;

pub use addresses::{AddressSlot, AddressesView};
pub use cart::{CartAction, CartView};
pub use orders::{DateRange, OrderAction, OrderDetailView, OrderFilter, OrdersView, StatusFilter};
pub use products::ProductsView;
pub use wishlist::{Toggled, WishlistView};

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::error::ApiError;

/// An item with a stable identity within its list.
pub trait Keyed {
    type Key: Copy + Eq + Hash + fmt::Debug + Send + Sync;

    fn key(&self) -> Self::Key;
}

/// Lifecycle phase of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    /// At least one mutation is in flight.
    Mutating,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Alert(String),
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Alert(m) => m,
        }
    }

    #[must_use]
    pub const fn is_alert(&self) -> bool {
        matches!(self, Self::Alert(_))
    }
}

/// Snapshot of a view.
#[derive(Debug, Clone)]
pub struct ViewState<D, K> {
    pub phase: Phase,
    pub data: D,
    /// Keys with a request in flight.
    pub busy: HashSet<K>,
    /// Set when the initial load failed.
    pub error: Option<String>,
    pub notice: Option<Notice>,
}

impl<D: Default, K> Default for ViewState<D, K> {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            data: D::default(),
            busy: HashSet::new(),
            error: None,
            notice: None,
        }
    }
}

impl<D, K: Eq + Hash> ViewState<D, K> {
    /// Whether `key` has a request in flight.
    #[must_use]
    pub fn is_busy(&self, key: &K) -> bool {
        self.busy.contains(key)
    }
}

/// A view over a list of keyed items.
pub type ListView<T> = View<Vec<T>, <T as Keyed>::Key>;

/// Snapshot of a [`ListView`].
pub type ListState<T> = ViewState<Vec<T>, <T as Keyed>::Key>;

/// Shared, mount-aware view state.
///
/// Clones share state, so a clone can be handed to a spawned task.
pub struct View<D, K> {
    name: &'static str,
    state: Arc<RwLock<ViewState<D, K>>>,
    mounted: Arc<AtomicBool>,
}

impl<D, K> Clone for View<D, K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: Arc::clone(&self.state),
            mounted: Arc::clone(&self.mounted),
        }
    }
}

impl<D, K> fmt::Debug for View<D, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("name", &self.name)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

impl<D, K> View<D, K> {
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Detach the view. In-flight requests still complete but their results
    /// are discarded.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
        tracing::debug!(view = self.name, "View unmounted");
    }
}

impl<D, K> View<D, K>
where
    D: Clone + Default + Send + Sync,
    K: Copy + Eq + Hash + fmt::Debug + Send + Sync,
{
    /// A mounted view in the `Loading` phase. `name` appears in logs and in
    /// the load error message ("Failed to load {name}").
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(RwLock::new(ViewState::default())),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A mounted, `Ready` view holding `data`.
    #[must_use]
    pub fn with_data(name: &'static str, data: D) -> Self {
        Self {
            name,
            state: Arc::new(RwLock::new(ViewState {
                phase: Phase::Ready,
                data,
                ..ViewState::default()
            })),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ViewState<D, K> {
        self.state.read().await.clone()
    }

    /// Copy of the current data.
    pub async fn data(&self) -> D {
        self.state.read().await.data.clone()
    }

    /// Run `f` against the current data without copying it.
    pub async fn read<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        f(&self.state.read().await.data)
    }

    /// Replace the notice.
    pub async fn set_notice(&self, notice: Notice) {
        if self.is_mounted() {
            self.state.write().await.notice = Some(notice);
        }
    }

    /// Take the notice, leaving none.
    pub async fn take_notice(&self) -> Option<Notice> {
        self.state.write().await.notice.take()
    }

    /// Fetch the view's data.
    ///
    /// # Errors
    ///
    /// Returns the request's error after recording it in the state.
    pub async fn load<F>(&self, request: F) -> Result<(), ApiError>
    where
        F: Future<Output = Result<D, ApiError>>,
    {
        if !self.is_mounted() {
            return request.await.map(drop);
        }
        {
            let mut state = self.state.write().await;
            state.phase = Phase::Loading;
            state.error = None;
        }

        let result = request.await;

        if !self.is_mounted() {
            tracing::debug!(view = self.name, "Dropping load result for unmounted view");
            return result.map(drop);
        }

        let mut state = self.state.write().await;
        state.phase = if state.busy.is_empty() {
            Phase::Ready
        } else {
            Phase::Mutating
        };
        match result {
            Ok(data) => {
                state.data = data;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(view = self.name, error = %e, "Failed to load view data");
                state.data = D::default();
                state.error = Some(e.user_message(&format!("Failed to load {}", self.name)));
                Err(e)
            }
        }
    }

    /// Run one mutation for `key`.
    ///
    /// `reconcile` receives the data and the server's answer and is only
    /// called on success. `action` names the mutation in logs and in the
    /// fallback alert ("Failed to {action}").
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if `key` already has a request in
    /// flight, otherwise the request's error.
    pub async fn mutate<R, F, A>(
        &self,
        key: K,
        action: &str,
        request: F,
        reconcile: A,
    ) -> Result<R, ApiError>
    where
        F: Future<Output = Result<R, ApiError>>,
        A: FnOnce(&mut D, &R),
    {
        if !self.is_mounted() {
            return request.await;
        }
        {
            let mut state = self.state.write().await;
            if !state.busy.insert(key) {
                return Err(ApiError::InvalidInput(format!(
                    "Already working on {key:?}"
                )));
            }
            state.phase = Phase::Mutating;
            state.notice = None;
        }

        let result = request.await;

        if !self.is_mounted() {
            tracing::debug!(view = self.name, action, ?key, "Dropping result for unmounted view");
            return result;
        }

        let mut state = self.state.write().await;
        state.busy.remove(&key);
        if state.busy.is_empty() {
            state.phase = Phase::Ready;
        }
        match &result {
            Ok(answer) => reconcile(&mut state.data, answer),
            Err(e) => {
                tracing::warn!(view = self.name, action, ?key, error = %e, "Mutation failed");
                state.notice = Some(Notice::Alert(
                    e.user_message(&format!("Failed to {action}")),
                ));
            }
        }
        result
    }
}
