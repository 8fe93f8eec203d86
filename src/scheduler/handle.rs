//! Generation-checked task handles and the slot table behind them.

use std::fmt;

/// Opaque reference to a scheduled task.
///
/// A handle stays valid until its task retires, expires or is cancelled.
/// After that the slot's generation moves on and the handle no longer
/// matches anything, even if the slot is reused by a newer task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    index: usize,
    generation: u64,
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}v{}", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u64,
    value: Option<T>,
}

/// Indexed table with slot reuse and per-slot generations.
pub(crate) struct Slots<T> {
    entries: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Slots<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> TaskHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.entries.get_mut(index) {
                slot.value = Some(value);
                return TaskHandle {
                    index,
                    generation: slot.generation,
                };
            }
        }

        let index = self.entries.len();
        self.entries.push(Slot {
            generation: 0,
            value: Some(value),
        });
        TaskHandle {
            index,
            generation: 0,
        }
    }

    pub(crate) fn get(&self, handle: TaskHandle) -> Option<&T> {
        self.entries
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, handle: TaskHandle) -> Option<&mut T> {
        self.entries
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Remove the value behind `handle`, invalidating every copy of the handle.
    pub(crate) fn remove(&mut self, handle: TaskHandle) -> Option<T> {
        let slot = self
            .entries
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    /// Handles of all occupied slots, in slot order.
    pub(crate) fn handles(&self) -> Vec<TaskHandle> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.value.is_some())
            .map(|(index, slot)| TaskHandle {
                index,
                generation: slot.generation,
            })
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
