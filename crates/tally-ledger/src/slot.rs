use crate::error::{Result, StoreError};
use crate::store::HabitStore;

/// Explicit holder for the process-wide store.
///
/// The application constructs the store once at startup and hands
/// consumers a reference through this slot; until then the slot is
/// `Empty` and every access fails with [`StoreError::Uninitialized`].
/// This replaces a lazily initialized nullable global with a state the
/// type system can see.
#[derive(Default)]
pub enum StoreSlot {
    #[default]
    Empty,
    Open(HabitStore),
}

impl StoreSlot {
    pub fn open(store: HabitStore) -> Self {
        StoreSlot::Open(store)
    }

    /// The store, or [`StoreError::Uninitialized`] if it was never opened.
    pub fn get(&self) -> Result<&HabitStore> {
        match self {
            StoreSlot::Open(store) => Ok(store),
            StoreSlot::Empty => Err(StoreError::Uninitialized),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, StoreSlot::Open(_))
    }

    /// Take the store out, leaving the slot empty. Used at teardown.
    pub fn close(&mut self) -> Option<HabitStore> {
        match std::mem::take(self) {
            StoreSlot::Open(store) => Some(store),
            StoreSlot::Empty => None,
        }
    }
}
