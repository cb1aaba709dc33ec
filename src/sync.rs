#[cfg(feature = "loom")]
mod imp {
    pub(crate) use loom::sync::{
        Arc, Mutex,
        atomic::{AtomicU8, AtomicUsize, Ordering, fence},
    };
    use loom::thread::{self, JoinHandle};
    use std::cell::RefCell;

    /// Handle to walk state that every forked unit of work holds.
    pub(crate) type Shared<'a, T> = Arc<T>;

    /// Bounds a value must meet to be moved into a forked unit of work.
    pub(crate) trait Portable: Send + Sync + 'static {}

    impl<T: Send + Sync + 'static> Portable for T {}

    /// Bounds on a type that forked units of work mention without holding a
    /// value of it.
    pub(crate) trait Captured: 'static {}

    impl<T: 'static> Captured for T {}

    pub(crate) type Scope<'s> = ThreadScope;

    /// One loom thread per spawned unit of work. Each thread joins the threads
    /// it spawned before it exits, and [`scope`] joins those spawned by `op`.
    #[derive(Default)]
    pub(crate) struct ThreadScope {
        handles: RefCell<Vec<JoinHandle<()>>>,
    }

    impl ThreadScope {
        pub(crate) fn spawn(&self, body: impl FnOnce(&ThreadScope) + Send + 'static) {
            let handle = thread::spawn(move || {
                let scope = ThreadScope::default();
                body(&scope);
                scope.join_all();
            });
            self.handles.borrow_mut().push(handle);
        }

        fn join_all(self) {
            for handle in self.handles.into_inner() {
                if let Err(payload) = handle.join() {
                    std::panic::resume_unwind(payload);
                }
            }
        }
    }

    pub(crate) fn scope(op: impl FnOnce(&ThreadScope)) {
        let scope = ThreadScope::default();
        op(&scope);
        scope.join_all();
    }
}

#[cfg(not(feature = "loom"))]
mod imp {
    pub(crate) use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering, fence};
    pub(crate) use rayon::{Scope, scope};
    pub(crate) use std::sync::Mutex;

    /// Handle to walk state that every forked unit of work holds.
    pub(crate) type Shared<'a, T> = &'a T;

    /// Bounds a value must meet to be moved into a forked unit of work.
    pub(crate) trait Portable: Send + Sync {}

    impl<T: Send + Sync + ?Sized> Portable for T {}

    /// Bounds on a type that forked units of work mention without holding a
    /// value of it.
    pub(crate) trait Captured {}

    impl<T: ?Sized> Captured for T {}
}

pub(crate) use imp::*;
