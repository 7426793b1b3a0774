//! # Field Transfer Policy
//!
//! Record codecs do not stop at the first failed field. Every field the flag
//! word selects is transferred, and the outcome is the logical AND of all of
//! them. Later fields still consume their bytes, so the cursor ends where a
//! well-formed record would have ended.
//!
//! A record whose status failed is untrustworthy as a whole. Callers must
//! discard it rather than apply any of its fields to a live entity.
//!
//! ## Absent Fields
//!
//! ```text
//! presence bit | relative mode | destination
//! -------------+---------------+---------------------------
//!     set      |      any      | value read from the wire
//!    clear     |     clear     | hard-coded default
//!    clear     |      set      | left untouched (baseline)
//! ```

use crate::error::{CodecError, CodecResult};

/// Aggregate outcome of a sequence of field transfers.
#[derive(Debug, Default)]
#[must_use]
pub struct TransferStatus {
    first_error: Option<CodecError>,
    failures: u32,
}

impl TransferStatus {
    /// Creates a status with no failures recorded.
    pub const fn new() -> Self {
        Self {
            first_error: None,
            failures: 0,
        }
    }

    /// Records a failure. Only the first error is kept for reporting.
    pub fn record(&mut self, error: CodecError) {
        self.failures = self.failures.saturating_add(1);
        if self.first_error.is_none() {
            self.first_error = Some(error);
        }
    }

    /// Unwraps a field result, substituting the type's default on failure.
    #[inline]
    pub fn take<T: Default>(&mut self, result: CodecResult<T>) -> T {
        self.take_or(result, T::default())
    }

    /// Unwraps a field result, substituting `fallback` on failure.
    #[inline]
    pub fn take_or<T>(&mut self, result: CodecResult<T>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(error) => {
                self.record(error);
                fallback
            }
        }
    }

    /// Records the failure of a result with no value.
    #[inline]
    pub fn check(&mut self, result: CodecResult<()>) {
        if let Err(error) = result {
            self.record(error);
        }
    }

    /// True while every transfer so far has succeeded.
    #[inline]
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.first_error.is_none()
    }

    /// Number of failed transfers.
    #[inline]
    #[must_use]
    pub const fn failures(&self) -> u32 {
        self.failures
    }

    /// Converts the aggregate into a result carrying the first error.
    pub fn finish(self) -> CodecResult<()> {
        match self.first_error {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }
}

/// Where a flag-gated field's decoded value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldSource {
    /// The field is on the wire.
    Wire,
    /// The field is absent and resets to its hard-coded default.
    Default,
    /// The field is absent and the receiver's baseline value stands.
    Unchanged,
}

impl FieldSource {
    /// Resolves the source from a presence bit and the relative-mode bit.
    #[inline]
    #[must_use]
    pub const fn select(present: bool, relative: bool) -> Self {
        match (present, relative) {
            (true, _) => Self::Wire,
            (false, false) => Self::Default,
            (false, true) => Self::Unchanged,
        }
    }

    /// Applies the source to a destination slot.
    ///
    /// `read` runs only for [`FieldSource::Wire`]; an unchanged field writes
    /// nothing to the destination.
    #[inline]
    pub fn apply<T>(self, slot: &mut T, default: T, read: impl FnOnce() -> T) {
        match self {
            Self::Wire => *slot = read(),
            Self::Default => *slot = default,
            Self::Unchanged => {}
        }
    }
}
