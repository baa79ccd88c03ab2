//! Striped lock tables
//!
//! A fixed pool of locks shared by many keys: key `k` always maps to stripe
//! `k & (stripes - 1)`. Each stripe guards its own value, typically a map
//! holding the state of every key that lands on it.

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Default number of stripes
pub const DEFAULT_STRIPES: usize = 1024;

#[derive(Debug)]
pub struct StripedLocks<T> {
    stripes: Box<[RwLock<T>]>,
    mask: usize,
}

impl<T: Default> StripedLocks<T> {
    /// `stripes` is rounded up to a power of two
    pub fn new(stripes: usize) -> Self {
        let n = stripes.max(1).next_power_of_two();
        Self {
            stripes: (0..n).map(|_| RwLock::new(T::default())).collect(),
            mask: n - 1,
        }
    }
}

impl<T> StripedLocks<T> {
    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    #[inline]
    pub fn stripe_of(&self, key: usize) -> usize {
        key & self.mask
    }

    #[inline]
    pub fn read(&self, key: usize) -> RwLockReadGuard<'_, T> {
        self.stripes[self.stripe_of(key)].read()
    }

    #[inline]
    pub fn write(&self, key: usize) -> RwLockWriteGuard<'_, T> {
        self.stripes[self.stripe_of(key)].write()
    }

    /// Consume the table, yielding every stripe's value
    pub fn into_inner(self) -> Vec<T> {
        self.stripes
            .into_vec()
            .into_iter()
            .map(RwLock::into_inner)
            .collect()
    }
}

/// One mutex per bucket, indexed directly
#[derive(Debug)]
pub struct BucketLocks<T> {
    buckets: Box<[Mutex<T>]>,
}

impl<T> BucketLocks<T> {
    pub fn new(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            buckets: values.into_iter().map(Mutex::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[inline]
    pub fn lock(&self, bucket: usize) -> MutexGuard<'_, T> {
        self.buckets[bucket].lock()
    }

    pub fn get_mut(&mut self, bucket: usize) -> &mut T {
        self.buckets[bucket].get_mut()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.buckets.iter_mut().map(Mutex::get_mut)
    }

    pub fn into_inner(self) -> Vec<T> {
        self.buckets
            .into_vec()
            .into_iter()
            .map(Mutex::into_inner)
            .collect()
    }
}
