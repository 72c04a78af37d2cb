// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Named callbacks that the native side can push to.
//
// One handler per name; registering again replaces the previous handler.
// There is no unregister: owners that need one register a no-op.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

/// Handler run with the parsed payload of an inbound push.
pub type Callback = Arc<dyn Fn(Value) + Send + Sync>;

/// Cloneable handle over the name -> handler map.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    callbacks: Arc<Mutex<HashMap<String, Callback>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`. Returns `true` if it replaced one.
    pub fn register(&self, name: impl Into<String>, callback: Callback) -> bool {
        lock(&self.callbacks).insert(name.into(), callback).is_some()
    }

    /// Handler currently registered under `name`.
    ///
    /// The handler is cloned out so it can run without the map locked.
    pub fn get(&self, name: &str) -> Option<Callback> {
        lock(&self.callbacks).get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        lock(&self.callbacks).contains_key(name)
    }

    pub fn len(&self) -> usize {
        lock(&self.callbacks).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = lock(&self.callbacks).keys().cloned().collect();
        names.sort();
        f.debug_struct("CallbackRegistry").field("names", &names).finish()
    }
}

/// Lock a mutex, recovering the data if a handler panicked while it was held.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
