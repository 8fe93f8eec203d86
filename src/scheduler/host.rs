//! Host resource lifecycle.
//!
//! Each scheduled task owns one host resource for as long as it is active.
//! The scheduler allocates it when the task is scheduled and releases it
//! exactly once when the task retires, expires or is cancelled.

use std::collections::HashSet;

/// Opaque identifier for a host-side object representing a pending task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HostResource(u64);

impl HostResource {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Capability to create and destroy host resources.
pub trait TaskHost {
    fn allocate(&mut self) -> HostResource;

    fn release(&mut self, resource: HostResource);
}

/// Host with no backing objects. Resources are plain sequence numbers.
#[derive(Debug, Default)]
pub struct DetachedHost {
    next: u64,
}

impl TaskHost for DetachedHost {
    fn allocate(&mut self) -> HostResource {
        let resource = HostResource(self.next);
        self.next = self.next.wrapping_add(1);
        resource
    }

    fn release(&mut self, _resource: HostResource) {}
}

/// Host that tracks which resources are alive.
#[derive(Debug, Default)]
pub struct CountingHost {
    next: u64,
    live: HashSet<HostResource>,
    released: usize,
}

impl CountingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resources allocated and not yet released.
    pub fn live(&self) -> usize {
        self.live.len()
    }

    /// Total number of releases observed.
    pub fn released(&self) -> usize {
        self.released
    }

    pub fn is_live(&self, resource: HostResource) -> bool {
        self.live.contains(&resource)
    }
}

impl TaskHost for CountingHost {
    fn allocate(&mut self) -> HostResource {
        let resource = HostResource(self.next);
        self.next = self.next.wrapping_add(1);
        self.live.insert(resource);
        resource
    }

    fn release(&mut self, resource: HostResource) {
        if self.live.remove(&resource) {
            self.released += 1;
        } else {
            tracing::warn!(resource = resource.raw(), "release of unknown host resource");
        }
    }
}
