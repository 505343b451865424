/// Opaque handle to an object owned by a rendering backend.
///
/// Backends hand these out from `add_path` / `add_circle` / `add_group`; the
/// map core only stores them and passes them back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Handle(u32);

impl Handle {
    pub const fn new(index: u32) -> Self {
        Handle(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Monotonic handle source for backends that do not have their own ids.
#[derive(Debug, Default, Clone)]
pub struct HandleAllocator {
    next: u32,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self) -> Handle {
        let h = Handle(self.next);
        self.next += 1;
        h
    }

    pub fn issued(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::{Handle, HandleAllocator};

    #[test]
    fn allocator_is_sequential() {
        let mut a = HandleAllocator::new();
        assert_eq!(a.alloc(), Handle::new(0));
        assert_eq!(a.alloc(), Handle::new(1));
        assert_eq!(a.issued(), 2);
    }
}
