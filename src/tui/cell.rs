//! Observable state cells
//!
//! A [`Cell`] holds one value and a list of observers. Setting a different
//! value stores it and then calls every observer synchronously, in the order
//! they subscribed, before `set` returns. Observers may set other cells, so a
//! change propagates depth-first through the graph built on top of them.
//!
//! A cell refuses to be set while its own observers are running. That can
//! only happen through a cycle in the graph, which is reported as
//! [`InvariantViolation::Cycle`] before anything is stored.
//!
//! The outermost `set` on a thread opens a journal of previous values. When
//! an observer fails, every cell written during that cascade, the outer one
//! included, gets its previous value back without notifying anyone.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::InvariantViolation;

/// Callback invoked with the new value after a change
pub type Observer<T> = Arc<dyn Fn(&T) -> Result<(), InvariantViolation> + Send + Sync>;

struct CellInner<T> {
    name: &'static str,
    value: Mutex<T>,
    observers: Mutex<Vec<(u64, Observer<T>)>>,
    next_id: AtomicU64,
    notifying: AtomicBool,
}

/// Shared handle to a named observable value
pub struct Cell<T> {
    inner: Arc<CellInner<T>>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("name", &self.inner.name)
            .field("observers", &self.inner.observers.lock().len())
            .finish()
    }
}

/// Marks a cell as notifying for the lifetime of the guard
struct NotifyGuard<'a>(&'a AtomicBool);

impl<'a> NotifyGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| NotifyGuard(flag))
    }
}

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

type Undo = Box<dyn FnOnce()>;

thread_local! {
    static JOURNAL: RefCell<Option<Vec<Undo>>> = const { RefCell::new(None) };
}

/// Undo log for one cascade. Only the outermost transaction on a thread owns
/// the journal; nested ones append to it.
struct Transaction {
    owner: bool,
    committed: bool,
}

impl Transaction {
    fn begin() -> Self {
        let owner = JOURNAL.with_borrow_mut(|journal| {
            if journal.is_some() {
                return false;
            }
            *journal = Some(Vec::new());
            true
        });
        Transaction {
            owner,
            committed: false,
        }
    }

    fn record(&self, undo: impl FnOnce() + 'static) {
        JOURNAL.with_borrow_mut(|journal| {
            if let Some(journal) = journal {
                journal.push(Box::new(undo));
            }
        });
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.owner {
            return;
        }
        let undo = JOURNAL.with_borrow_mut(Option::take).unwrap_or_default();
        if self.committed || undo.is_empty() {
            return;
        }
        tracing::debug!(writes = undo.len(), "rolling back failed cascade");
        for step in undo.into_iter().rev() {
            step();
        }
    }
}

/// Run `f` as a single cascade. When it fails, every cell written inside it
/// is restored, even across several top-level `set` calls.
pub fn atomic<R>(
    f: impl FnOnce() -> Result<R, InvariantViolation>,
) -> Result<R, InvariantViolation> {
    let transaction = Transaction::begin();
    let result = f()?;
    transaction.commit();
    Ok(result)
}

impl<T> Cell<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            inner: Arc::new(CellInner {
                name,
                value: Mutex::new(value),
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                notifying: AtomicBool::new(false),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.value.lock().clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// The cell is locked while `f` runs; `f` must not set this cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.lock())
    }

    /// Store `value` and notify observers.
    ///
    /// Returns `Ok(false)` when `value` equals the current value, in which
    /// case nothing is notified. On error every cell written since the
    /// outermost `set` began holds its previous value again.
    pub fn set(&self, value: T) -> Result<bool, InvariantViolation> {
        let transaction = Transaction::begin();
        let _guard = self.enter()?;

        let previous = {
            let mut current = self.inner.value.lock();
            if *current == value {
                return Ok(false);
            }
            std::mem::replace(&mut *current, value.clone())
        };
        let inner = Arc::clone(&self.inner);
        transaction.record(move || *inner.value.lock() = previous);

        self.notify(&value)?;
        transaction.commit();
        Ok(true)
    }

    /// Run every observer again with the current value, as if it had just
    /// been set. Failures roll back like [`Cell::set`].
    pub fn renotify(&self) -> Result<(), InvariantViolation> {
        let transaction = Transaction::begin();
        let _guard = self.enter()?;
        let value = self.get();
        self.notify(&value)?;
        transaction.commit();
        Ok(())
    }

    fn enter(&self) -> Result<NotifyGuard<'_>, InvariantViolation> {
        NotifyGuard::enter(&self.inner.notifying).ok_or_else(|| {
            tracing::error!(cell = self.inner.name, "cell set from its own observer");
            InvariantViolation::Cycle {
                cell: self.inner.name,
            }
        })
    }

    fn notify(&self, value: &T) -> Result<(), InvariantViolation> {
        // Snapshot so observers can subscribe or unsubscribe while we iterate
        let observers: Vec<Observer<T>> = self
            .inner
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(value)?;
        }
        Ok(())
    }

    /// Register an observer for future changes
    pub fn subscribe<F>(&self, observer: F) -> Subscription<T>
    where
        F: Fn(&T) -> Result<(), InvariantViolation> + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.observers.lock().push((id, Arc::new(observer)));
        Subscription {
            cell: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }
}

/// Handle returned by [`Cell::subscribe`]
///
/// Dropping the handle keeps the observer registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription<T> {
    cell: Weak<CellInner<T>>,
    id: u64,
}

impl<T> Subscription<T> {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.cell.upgrade() {
            inner.observers.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_get_returns_initial_value() {
        let cell = Cell::new("count", 3);
        assert_eq!(cell.get(), 3);
        assert_eq!(cell.name(), "count");
    }

    #[test]
    fn test_same_value_fires_once() {
        let cell = Cell::new("query", String::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        cell.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert!(cell.set("al".to_string()).unwrap());
        assert!(!cell.set("al".to_string()).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        let cell = Cell::new("n", 0);
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            cell.subscribe(move |v: &i32| {
                log.lock().push(format!("{tag}:{v}"));
                Ok(())
            });
        }

        cell.set(7).unwrap();
        assert_eq!(*log.lock(), vec!["first:7", "second:7", "third:7"]);
    }

    #[test]
    fn test_nested_set_propagates_depth_first() {
        let upstream = Cell::new("upstream", 0);
        let downstream = Cell::new("downstream", 0);
        let log = Arc::new(Mutex::new(Vec::new()));

        let down = downstream.clone();
        let l = Arc::clone(&log);
        upstream.subscribe(move |v: &i32| {
            l.lock().push("upstream-a");
            down.set(v * 2)?;
            Ok(())
        });
        let l = Arc::clone(&log);
        upstream.subscribe(move |_| {
            l.lock().push("upstream-b");
            Ok(())
        });
        let l = Arc::clone(&log);
        downstream.subscribe(move |_| {
            l.lock().push("downstream");
            Ok(())
        });

        upstream.set(5).unwrap();
        assert_eq!(downstream.get(), 10);
        assert_eq!(*log.lock(), vec!["upstream-a", "downstream", "upstream-b"]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let a = Cell::new("a", 0);
        let b = Cell::new("b", 0);

        let b2 = b.clone();
        a.subscribe(move |v: &i32| {
            b2.set(*v)?;
            Ok(())
        });
        let a2 = a.clone();
        b.subscribe(move |v: &i32| {
            a2.set(v + 1)?;
            Ok(())
        });

        let err = a.set(1).unwrap_err();
        assert_eq!(err, InvariantViolation::Cycle { cell: "a" });
        // Both writes of the failed cascade are undone
        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 0);

        // The guard and the journal are released after the failure
        assert!(a.set(2).is_err());
        assert_eq!(a.get(), 0);
    }

    #[test]
    fn test_failed_cascade_restores_without_notifying() {
        let upstream = Cell::new("upstream", 1);
        let downstream = Cell::new("downstream", 10);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let down = downstream.clone();
        upstream.subscribe(move |v: &i32| {
            down.set(v * 10)?;
            Ok(())
        });
        let log = Arc::clone(&seen);
        downstream.subscribe(move |v: &i32| {
            log.lock().push(*v);
            Ok(())
        });
        upstream.subscribe(|v: &i32| {
            if *v > 5 {
                return Err(InvariantViolation::Cycle { cell: "upstream" });
            }
            Ok(())
        });

        assert!(upstream.set(7).is_err());
        assert_eq!(upstream.get(), 1);
        assert_eq!(downstream.get(), 10);
        // Only the forward notification, none for the restore
        assert_eq!(*seen.lock(), vec![70]);

        // A later cascade commits normally
        assert!(upstream.set(2).unwrap());
        assert_eq!(downstream.get(), 20);
        assert_eq!(*seen.lock(), vec![70, 20]);
    }

    #[test]
    fn test_atomic_spans_several_sets() {
        let first = Cell::new("first", 0);
        let second = Cell::new("second", 0);
        second.subscribe(|v: &i32| {
            if *v < 0 {
                return Err(InvariantViolation::Cycle { cell: "second" });
            }
            Ok(())
        });

        let result = atomic(|| {
            first.set(1)?;
            second.set(-1)?;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 0);

        atomic(|| {
            first.set(1)?;
            second.set(1)
        })
        .unwrap();
        assert_eq!((first.get(), second.get()), (1, 1));
    }

    #[test]
    fn test_renotify_runs_observers_with_current_value() {
        let cell = Cell::new("selection", 4);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        cell.subscribe(move |v: &i32| {
            log.lock().push(*v);
            Ok(())
        });

        assert!(!cell.set(4).unwrap());
        cell.renotify().unwrap();
        assert_eq!(*seen.lock(), vec![4]);
    }

    #[test]
    fn test_subscribe_during_notification_skips_in_flight_change() {
        let cell = Cell::new("n", 0);
        let late_calls = Arc::new(AtomicUsize::new(0));

        let handle = cell.clone();
        let counter = Arc::clone(&late_calls);
        let registered = Arc::new(AtomicBool::new(false));
        cell.subscribe(move |_| {
            if !registered.swap(true, Ordering::SeqCst) {
                let counter = Arc::clone(&counter);
                handle.subscribe(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                });
            }
            Ok(())
        });

        cell.set(1).unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);

        cell.set(2).unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let cell = Cell::new("n", 0);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = cell.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        cell.set(1).unwrap();
        sub.unsubscribe();
        cell.set(2).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.observer_count(), 0);
    }
}
