//! Owned cart state container
//!
//! Transitions replace the whole state: the next state is computed from the
//! current snapshot and then published, so a reader holding a snapshot never
//! sees a half-applied change.

use super::{CartAction, CartState, PLACEHOLDER_IMAGE};
use std::sync::{Arc, RwLock};

pub struct CartStore {
    state: RwLock<Arc<CartState>>,
    placeholder: String,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Arc::new(CartState::new())),
            placeholder: PLACEHOLDER_IMAGE.to_string(),
        }
    }

    /// Use a different image reference for products without images
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Current cart state
    pub fn snapshot(&self) -> Arc<CartState> {
        match self.state.read() {
            Ok(state) => Arc::clone(&state),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Apply an action and publish the resulting state
    pub fn dispatch(&self, action: CartAction) -> Arc<CartState> {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        let next = Arc::new(state.apply(&action, &self.placeholder));
        tracing::debug!(
            ?action,
            items = next.items().len(),
            item_count = next.item_count(),
            total = next.total(),
            "cart updated"
        );
        *state = Arc::clone(&next);
        next
    }
}
