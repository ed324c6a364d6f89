//! # ReactiveValue
//!
//! A value holder that notifies registered callbacks whenever it is set.
//!
//! ## Invariants
//!
//! 1. A value is present from construction onward.
//! 2. `subscribe` calls the callback with the current value before returning.
//! 3. Every `set` schedules one delivery per live subscriber on the
//!    [`DeliveryContext`]; nothing is called on the caller's stack and
//!    nothing is coalesced. A single subscriber sees values in set order.
//! 4. The registry only holds a `Weak` reference to each owner. Entries whose
//!    owner is gone are skipped at delivery time and pruned lazily on `set`.
//! 5. After `unsubscribe`, no delivery reaches the callback, including
//!    deliveries that were already queued.

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use super::delivery::DeliveryContext;

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Opaque handle returned by [`ReactiveValue::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

struct SubscriberEntry<T> {
    id: u64,
    owner: Weak<dyn Any + Send + Sync>,
    /// Address of the owner, only compared, never dereferenced.
    owner_addr: usize,
    callback: Callback<T>,
    active: Arc<AtomicBool>,
}

impl<T> SubscriberEntry<T> {
    fn is_live(&self) -> bool {
        self.active.load(Ordering::Acquire) && self.owner.strong_count() > 0
    }
}

struct Inner<T> {
    current: RwLock<T>,
    subscribers: Mutex<Vec<SubscriberEntry<T>>>,
    context: DeliveryContext,
}

/// An observable value. Clones share the same value and registry.
pub struct ReactiveValue<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ReactiveValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ReactiveValue<T> {
    /// Creates a value delivering its notifications on `context`.
    pub fn new(initial: T, context: &DeliveryContext) -> Self {
        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(initial),
                subscribers: Mutex::new(Vec::new()),
                context: context.clone(),
            }),
        }
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current value and schedules one delivery per live subscriber.
    pub fn set(&self, value: T) {
        let mut subscribers = self.registry();

        *self.inner.current.write().unwrap_or_else(PoisonError::into_inner) = value.clone();

        subscribers.retain(|entry| entry.owner.strong_count() > 0);

        for entry in subscribers.iter() {
            let owner = entry.owner.clone();
            let callback = Arc::clone(&entry.callback);
            let active = Arc::clone(&entry.active);
            let value = value.clone();

            let scheduled = self.inner.context.schedule(Box::new(move || {
                if !active.load(Ordering::Acquire) {
                    return;
                }
                // Keep the owner alive for the duration of the callback.
                if let Some(_owner) = owner.upgrade() {
                    callback(value);
                }
            }));

            if !scheduled {
                log::warn!("Delivery context is closed; dropping notification for subscription {}", entry.id);
            }
        }
    }

    /// Registers `callback` for future values of this container, on behalf of `owner`.
    ///
    /// The callback is invoked once with the current value before this returns.
    /// The entry is registered first, so a `set` racing with the initial call
    /// is still delivered afterwards instead of being missed.
    /// Only a weak reference to `owner` is kept: once the last strong reference
    /// is dropped the subscription goes silent.
    pub fn subscribe<O, F>(&self, owner: &Arc<O>, callback: F) -> SubscriptionHandle
    where
        O: Send + Sync + 'static,
        F: Fn(T) + Send + Sync + 'static,
    {
        let id = NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed);
        let callback: Callback<T> = Arc::new(callback);
        let weak_typed: Weak<O> = Arc::downgrade(owner);
        let weak_owner: Weak<dyn Any + Send + Sync> = weak_typed;

        let current = {
            let mut subscribers = self.registry();
            subscribers.push(SubscriberEntry {
                id,
                owner: weak_owner,
                owner_addr: owner_addr(owner),
                callback: Arc::clone(&callback),
                active: Arc::new(AtomicBool::new(true)),
            });
            self.get()
        };

        log::debug!("Subscription {} registered", id);
        callback(current);
        SubscriptionHandle(id)
    }

    /// Removes the subscription behind `handle`. Unknown handles are ignored.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut subscribers = self.registry();
        subscribers.retain(|entry| {
            if entry.id == handle.0 {
                entry.active.store(false, Ordering::Release);
                false
            } else {
                true
            }
        });
        log::debug!("Subscription {} removed", handle.0);
    }

    /// Removes every subscription registered on behalf of `owner`.
    pub fn unsubscribe_owner<O: Send + Sync + 'static>(&self, owner: &Arc<O>) {
        let target = owner_addr(owner);
        let mut subscribers = self.registry();
        subscribers.retain(|entry| {
            if entry.owner_addr == target {
                entry.active.store(false, Ordering::Release);
                false
            } else {
                true
            }
        });
    }

    /// Number of registry entries, stale ones included.
    pub fn subscriber_count(&self) -> usize {
        self.registry().len()
    }

    /// Number of entries whose owner is alive and which were not unsubscribed.
    pub fn live_subscriber_count(&self) -> usize {
        self.registry().iter().filter(|entry| entry.is_live()).count()
    }

    fn registry(&self) -> MutexGuard<'_, Vec<SubscriberEntry<T>>> {
        self.inner.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn owner_addr<O>(owner: &Arc<O>) -> usize {
    Arc::as_ptr(owner) as *const () as usize
}
