use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
    thread,
    time::Duration,
};

use parking_lot::Mutex;
use ulid::Generator;

use super::Id;

/// Generator for monotonically increasing ids.
///
/// Ids produced by one generator are strictly increasing, including ids
/// produced within the same millisecond. The generator is safe to share
/// between threads and tasks.
pub struct IdGenerator {
    inner: Mutex<Generator>,
}

pub type IdGeneratorArc = Arc<IdGenerator>;

/// Duration to sleep after overflowing the random part within one millisecond.
/// The next millisecond starts a fresh sequence.
const SLEEP_DURATION: Duration = Duration::from_millis(1);

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Generator::new()),
        }
    }

    /// Generates a new id.
    ///
    /// If the random part overflows within one millisecond, this blocks the
    /// calling thread until the next millisecond. Async callers run that wait
    /// on their executor thread.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use remark_common::id::generator::IdGenerator;
    ///
    /// let g = IdGenerator::new();
    /// let (a, b) = (g.generate(), g.generate());
    /// assert!(a < b);
    /// assert!(a.to_string() < b.to_string());
    /// ```
    pub fn generate(&self) -> Id {
        loop {
            let generated = self.inner.lock().generate();
            match generated {
                Ok(ulid) => return ulid.into(),
                Err(_) => thread::sleep(SLEEP_DURATION),
            }
        }
    }

    /// Generates a series of ids.
    /// Faster than [`Self::generate`] for multiple ids at a time.
    /// Blocks on overflow the same way, while holding the generator lock.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// # use std::collections::HashSet;
    /// use remark_common::id::generator::IdGenerator;
    ///
    /// let g = IdGenerator::new();
    /// let ids = g.generate_multiple(3);
    /// let id_set: HashSet<_> = ids.iter().collect();
    /// assert_eq!(id_set.len(), ids.len());
    /// ```
    pub fn generate_multiple(&self, count: usize) -> Vec<Id> {
        if count == 0 {
            return Vec::new();
        }

        let mut ids = Vec::with_capacity(count);
        let mut inner = self.inner.lock();
        while ids.len() < count {
            match inner.generate() {
                Ok(ulid) => ids.push(ulid.into()),
                Err(_) => thread::sleep(SLEEP_DURATION),
            }
        }

        ids
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for IdGenerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}
