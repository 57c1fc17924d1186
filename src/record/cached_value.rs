use std::any::Any;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::trace;

/// Secondary representation of a record value (e.g. its decoded form).
pub struct CachedValue {
    inner: Box<dyn Any + Send + Sync>,
}

impl CachedValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for CachedValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("CachedValue").finish_non_exhaustive()
    }
}

/// Contents of a [`CachedValueSlot`] at one generation.
#[derive(Debug, Default)]
struct SlotState {
    generation: u64,
    value: Option<Arc<CachedValue>>,
}

/// Lock-free slot holding an optional [`CachedValue`].
///
/// `None` means "not computed". Every invalidation starts a new generation;
/// a value computed from a record value read at generation `g` can only be
/// published while the slot is still at `g`. Identity, not structural
/// equality, decides whether a compare-and-set matches. Losing a race only
/// costs a recomputation.
#[derive(Debug, Default)]
pub struct CachedValueSlot {
    state: ArcSwap<SlotState>,
}

impl CachedValueSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation. Read it before reading the value a computation
    /// is based on.
    pub fn generation(&self) -> u64 {
        self.state.load().generation
    }

    /// Raw read of the slot.
    ///
    /// The value may be replaced right after this returns, so callers must
    /// not act on it without going through [`Self::compare_and_set`].
    pub(crate) fn load_unsafe(&self) -> Option<Arc<CachedValue>> {
        self.state.load().value.clone()
    }

    /// Atomically replaces the slot iff it is still at `generation` and
    /// currently holds `expected`.
    ///
    /// Returns `false` and leaves the slot untouched otherwise.
    pub fn compare_and_set(
        &self,
        generation: u64,
        expected: Option<&Arc<CachedValue>>,
        new: Option<Arc<CachedValue>>,
    ) -> bool {
        let current = self.state.load_full();
        if current.generation != generation || raw_ptr(current.value.as_ref()) != raw_ptr(expected) {
            return false;
        }
        let next = Arc::new(SlotState { generation, value: new });
        let previous = self.state.compare_and_swap(&current, next);
        Arc::ptr_eq(&*previous, &current)
    }

    /// Returns the cached value, computing and publishing it when absent.
    ///
    /// If another thread publishes first, its value is returned and the
    /// local computation is discarded. If the slot moved past `generation`,
    /// the computed value is returned to the caller but never published.
    pub fn get_or_compute<F>(
        &self,
        generation: u64,
        compute: F,
    ) -> Arc<CachedValue>
    where
        F: FnOnce() -> CachedValue,
    {
        let current = self.state.load_full();
        if current.generation == generation {
            if let Some(existing) = &current.value {
                return existing.clone();
            }
        }

        let fresh = Arc::new(compute());
        if self.compare_and_set(generation, None, Some(fresh.clone())) {
            return fresh;
        }

        let latest = self.state.load_full();
        match &latest.value {
            Some(existing) if latest.generation == generation => existing.clone(),
            _ => {
                trace!(generation, current = latest.generation, "stale cached value not published");
                fresh
            }
        }
    }

    /// Resets the slot to "not computed" and starts a new generation.
    /// Called by the owning writer when the value changes.
    pub(crate) fn invalidate(&self) {
        self.state.rcu(|state| SlotState {
            generation: state.generation + 1,
            value: None,
        });
    }
}

/// A record value together with the slot generation it was read at.
///
/// Handed out by the owning partition so readers elsewhere can fill the
/// cached slot without ever publishing a form of an overwritten value.
#[derive(Debug, Clone)]
pub struct CachedValueLease<V> {
    value: V,
    generation: u64,
    slot: Arc<CachedValueSlot>,
}

impl<V> CachedValueLease<V> {
    pub(crate) fn new(
        value: V,
        generation: u64,
        slot: Arc<CachedValueSlot>,
    ) -> Self {
        Self { value, generation, slot }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn slot(&self) -> &Arc<CachedValueSlot> {
        &self.slot
    }

    /// Cached form of the leased value. Not published once the record has
    /// been written since the lease was taken.
    pub fn get_or_compute<F>(
        &self,
        compute: F,
    ) -> Arc<CachedValue>
    where
        F: FnOnce(&V) -> CachedValue,
    {
        self.slot.get_or_compute(self.generation, || compute(&self.value))
    }
}

fn raw_ptr(value: Option<&Arc<CachedValue>>) -> Option<*const CachedValue> {
    value.map(Arc::as_ptr)
}
