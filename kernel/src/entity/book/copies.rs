use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct TotalCopies(u32);

impl TotalCopies {
    pub fn new(copies: impl Into<u32>) -> Self {
        Self(copies.into())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CopiesAvailable(u32);

impl CopiesAvailable {
    pub fn new(copies: impl Into<u32>) -> Self {
        Self(copies.into())
    }

    pub fn full(total: &TotalCopies) -> Self {
        Self(*total.as_ref())
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// `None` when no copy is left to hand out.
    pub fn checked_decrement(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
