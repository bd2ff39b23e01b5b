//! Recycling container for high-churn entities
//!
//! Objects live in exactly one of two lists: `active` (simulated/rendered)
//! or `free` (waiting for reuse). Nothing is ever dropped individually;
//! deactivated objects migrate to `free` on the next [`Pool::release_inactive`].

/// An entity kind that can live in a [`Pool`]
pub trait Poolable: Default {
    fn is_active(&self) -> bool;
    fn deactivate(&mut self);
}

/// Active/free split container
#[derive(Debug, Clone)]
pub struct Pool<T> {
    active: Vec<T>,
    free: Vec<T>,
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Poolable> Pool<T> {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Take a slot from the free list (or construct one) and put it in the
    /// active list. The caller must activate it before the next release pass.
    pub fn acquire(&mut self) -> &mut T {
        let item = self.free.pop().unwrap_or_default();
        self.active.push(item);
        let last = self.active.len() - 1;
        &mut self.active[last]
    }

    /// Move every deactivated element to the free list
    ///
    /// Scans from the back so a swap-removal only ever pulls in an element
    /// that has already been examined.
    pub fn release_inactive(&mut self) {
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            if !self.active[i].is_active() {
                let item = self.active.swap_remove(i);
                self.free.push(item);
            }
        }
    }

    /// Deactivate everything and recycle it
    pub fn clear(&mut self) {
        for item in &mut self.active {
            item.deactivate();
        }
        self.release_inactive();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.active.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.active.iter_mut()
    }

    pub fn active(&self) -> &[T] {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut [T] {
        &mut self.active
    }

    /// Number of elements in the active list (including ones deactivated
    /// since the last release pass)
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Elements that are active right now
    pub fn live_count(&self) -> usize {
        self.active.iter().filter(|item| item.is_active()).count()
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Every object this pool has ever constructed
    pub fn capacity_total(&self) -> usize {
        self.active.len() + self.free.len()
    }

    /// Recycled slots, for inspection
    pub fn free(&self) -> &[T] {
        &self.free
    }
}
