//! Recycling of scratch buffers between decoding calls.
//!
//! A [Pool] hands out values through a [Pooled] guard. The guard gives the value back when it
//! goes out of scope, whatever way the scope is left, so a buffer can't be returned twice or
//! used after it was returned.

use std::{
    fmt::Debug,
    ops::{Deref, DerefMut},
    sync::Mutex,
};

use crate::decoder::Word;

/// Backing storage of a code table: the bytes of every word, and the range of each word.
#[derive(Debug, Default)]
pub struct TableBuffers {
    pub(crate) strings: Vec<u8>,
    pub(crate) words: Vec<Word>,
}

/// Pool of code table storage, to share between decoding calls.
pub type TablePool = Pool<TableBuffers>;

/// A thread safe free list of reusable values.
///
/// Values are created with [Default::default] when the pool is empty. Callers are responsible
/// for resetting what they acquire, the pool gives values back as they were left.
pub struct Pool<T: Default> {
    idle: Mutex<Vec<T>>,
    limit: usize,
}

impl<T: Default> Pool<T> {
    /// A pool that keeps every value given back to it.
    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// A pool that keeps at most `limit` idle values. Values given back past that are dropped.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            limit,
        }
    }

    /// Takes an idle value, or creates one.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let value = self.lock().pop().unwrap_or_default();
        Pooled { pool: self, value }
    }

    /// Number of idle values currently held.
    pub fn idle_count(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, value: T) {
        let mut idle = self.lock();
        if idle.len() < self.limit {
            idle.push(value);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        // The free list stays consistent even if a holder panicked.
        self.idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Default> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("idle", &self.idle_count())
            .field("limit", &self.limit)
            .finish()
    }
}

/// A value borrowed from a [Pool], given back on drop.
pub struct Pooled<'a, T: Default> {
    pool: &'a Pool<T>,
    value: T,
}

impl<'a, T: Default> Deref for Pooled<'a, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<'a, T: Default> DerefMut for Pooled<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<'a, T: Default> Drop for Pooled<'a, T> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_creates_then_reuses() {
        let pool: Pool<Vec<u8>> = Pool::new();
        assert_eq!(pool.idle_count(), 0);

        {
            let mut buffer = pool.acquire();
            buffer.extend_from_slice(b"gif");
            assert_eq!(pool.idle_count(), 0);
        }
        assert_eq!(pool.idle_count(), 1);

        let buffer = pool.acquire();
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(&buffer[..], b"gif");
    }

    #[test]
    fn concurrent_holders_get_distinct_values() {
        let pool: Pool<Vec<u8>> = Pool::new();

        let mut first = pool.acquire();
        let mut second = pool.acquire();
        first.push(1);
        second.push(2);
        drop(first);
        drop(second);

        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn limit_drops_extra_values() {
        let pool: Pool<Vec<u8>> = Pool::with_limit(1);

        let first = pool.acquire();
        let second = pool.acquire();
        drop(first);
        drop(second);

        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn released_on_early_return() {
        fn check(fail: bool) -> Result<(), &'static str> {
            if fail {
                Err("bail out")
            } else {
                Ok(())
            }
        }

        fn failing(pool: &Pool<Vec<u8>>, fail: bool) -> Result<(), &'static str> {
            let mut buffer = pool.acquire();
            buffer.push(42);
            check(fail)?;
            buffer.push(43);
            Ok(())
        }

        let pool = Pool::new();
        assert!(failing(&pool, true).is_err());
        assert_eq!(pool.idle_count(), 1);
        assert_eq!(&pool.acquire()[..], [42]);
    }

    #[test]
    fn shared_between_threads() {
        let pool: Pool<Vec<u8>> = Pool::new();

        std::thread::scope(|scope| {
            for i in 0..4 {
                let pool = &pool;
                scope.spawn(move || {
                    let mut buffer = pool.acquire();
                    buffer.clear();
                    buffer.push(i);
                });
            }
        });

        assert!(pool.idle_count() >= 1);
        assert!(pool.idle_count() <= 4);
    }
}
