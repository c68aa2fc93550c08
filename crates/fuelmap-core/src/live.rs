//! Push-based observable values.
//!
//! A `Live<T>` always holds a current value and notifies holders when a newer
//! one is published. Derived values (`map`, `distinct`, `combine_with`,
//! `switch_map`) are maintained by small forwarding tasks. A forwarding task
//! ends as soon as every handle to its output is dropped, releasing its
//! upstream handles in turn, so dropping the outermost `Live` cancels the
//! whole chain.
//!
//! Combinators spawn onto the ambient tokio runtime and must be called from
//! within one.

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

#[derive(Debug)]
pub struct Live<T> {
    rx: watch::Receiver<T>,
}

impl<T> Clone for Live<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> From<watch::Receiver<T>> for Live<T> {
    fn from(rx: watch::Receiver<T>) -> Self {
        Self { rx }
    }
}

impl<T> Live<T>
where
    T: Send + Sync + 'static,
{
    /// A value that never changes
    pub fn constant(value: T) -> Self {
        let (_tx, rx) = watch::channel(value);
        Self { rx }
    }

    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.rx.borrow()
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.rx.borrow().clone()
    }

    /// Wait until a value newer than the last one seen through this handle is
    /// published. Returns `false` once the producer has gone away.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait for the next published value.
    pub async fn next(&mut self) -> Option<T>
    where
        T: Clone,
    {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Resolve with the first value (current included) matching `predicate`.
    pub async fn wait_for(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<T>
    where
        T: Clone,
    {
        self.rx
            .wait_for(predicate)
            .await
            .ok()
            .map(|value| (*value).clone())
    }

    /// Current value followed by every subsequent one
    pub fn into_stream(self) -> WatchStream<T>
    where
        T: Clone,
    {
        WatchStream::new(self.rx)
    }

    pub fn map<U, F>(&self, f: F) -> Live<U>
    where
        U: Send + Sync + 'static,
        F: Fn(&T) -> U + Send + 'static,
    {
        let mut upstream = self.rx.clone();
        let initial = f(&upstream.borrow_and_update());
        let (tx, rx) = watch::channel(initial);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    changed = upstream.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let value = f(&upstream.borrow_and_update());
                        tx.send_replace(value);
                    }
                }
            }
        });

        Live { rx }
    }

    /// Suppress re-emissions equal to the current value
    pub fn distinct(&self) -> Live<T>
    where
        T: Clone + PartialEq,
    {
        let mut upstream = self.rx.clone();
        let initial = upstream.borrow_and_update().clone();
        let (tx, rx) = watch::channel(initial);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    changed = upstream.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let value = upstream.borrow_and_update().clone();
                        tx.send_if_modified(|current| {
                            if *current == value {
                                false
                            } else {
                                *current = value;
                                true
                            }
                        });
                    }
                }
            }
        });

        Live { rx }
    }

    /// Combine-latest: recompute whenever either side publishes.
    ///
    /// A side whose producer has gone away keeps contributing its last value.
    pub fn combine_with<U, V, F>(&self, other: &Live<U>, f: F) -> Live<V>
    where
        T: Clone,
        U: Clone + Send + Sync + 'static,
        V: Send + Sync + 'static,
        F: Fn(&T, &U) -> V + Send + 'static,
    {
        let mut left = self.rx.clone();
        let mut right = other.rx.clone();
        let l = left.borrow_and_update().clone();
        let r = right.borrow_and_update().clone();
        let (tx, rx) = watch::channel(f(&l, &r));

        tokio::spawn(async move {
            let mut left_open = true;
            let mut right_open = true;
            while left_open || right_open {
                let changed = tokio::select! {
                    _ = tx.closed() => break,
                    res = left.changed(), if left_open => {
                        left_open = res.is_ok();
                        left_open
                    }
                    res = right.changed(), if right_open => {
                        right_open = res.is_ok();
                        right_open
                    }
                };
                if changed {
                    let l = left.borrow_and_update().clone();
                    let r = right.borrow_and_update().clone();
                    tx.send_replace(f(&l, &r));
                }
            }
        });

        Live { rx }
    }

    /// Follow the `Live` produced by `f` for the latest upstream value,
    /// dropping the previous one on every switch.
    pub fn switch_map<U, F>(&self, f: F) -> Live<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> Live<U> + Send + 'static,
    {
        let mut outer = self.rx.clone();
        let mut inner = f(&outer.borrow_and_update());
        let initial = inner.rx.borrow_and_update().clone();
        let (tx, rx) = watch::channel(initial);

        tokio::spawn(async move {
            let mut outer_open = true;
            let mut inner_open = true;
            while outer_open || inner_open {
                tokio::select! {
                    _ = tx.closed() => break,
                    res = outer.changed(), if outer_open => {
                        if res.is_ok() {
                            inner = f(&outer.borrow_and_update());
                            inner_open = true;
                            tx.send_replace(inner.rx.borrow_and_update().clone());
                        } else {
                            outer_open = false;
                        }
                    }
                    res = inner.rx.changed(), if inner_open => {
                        if res.is_ok() {
                            tx.send_replace(inner.rx.borrow_and_update().clone());
                        } else {
                            inner_open = false;
                        }
                    }
                }
            }
        });

        Live { rx }
    }
}
