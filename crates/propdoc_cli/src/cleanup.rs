//! Shutdown hooks owned by `main`
//!
//! Hooks run once, last registered first, either when [`Cleanup::run`] is
//! called or when the list is dropped on an early return.

use tracing::debug;

type Hook = Box<dyn FnOnce()>;

/// Ordered list of shutdown hooks
#[derive(Default)]
pub struct Cleanup {
    hooks: Vec<(&'static str, Hook)>,
}

impl Cleanup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook to run on shutdown
    pub fn register(&mut self, name: &'static str, hook: impl FnOnce() + 'static) {
        self.hooks.push((name, Box::new(hook)));
    }

    /// Run every registered hook now
    pub fn run(mut self) {
        self.run_hooks();
    }

    fn run_hooks(&mut self) {
        while let Some((name, hook)) = self.hooks.pop() {
            debug!(hook = name, "running cleanup hook");
            hook();
        }
    }
}

impl Drop for Cleanup {
    fn drop(&mut self) {
        self.run_hooks();
    }
}
