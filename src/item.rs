use std::fmt;

/// An opaque item observed in a transaction.
///
/// Equality, hashing and ordering all delegate to the wrapped value. The
/// ordering is what breaks ties between equally frequent items when a
/// transaction is sorted, so it must be total and deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item<T>(T);

impl<T> Item<T> {
    /// Wraps a raw item value.
    pub fn new(value: T) -> Self {
        Item(value)
    }

    /// Returns the wrapped value.
    pub fn value(&self) -> &T {
        &self.0
    }

    /// Unwraps the raw value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Item<T> {
    fn from(value: T) -> Self {
        Item(value)
    }
}

impl<T: fmt::Display> fmt::Display for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
