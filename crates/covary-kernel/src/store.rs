//! The store decision procedure.
//!
//! A store `array[index] = value` is decided in a fixed order:
//!
//! 1. **Admissibility.** The actual kinds must be legal upcasts of the
//!    declared kinds. If not, static typing would have rejected the program
//!    and the store is reported as not applicable. This is not a failure.
//! 2. **Bounds.** `index` must lie in `[0, length)`. This is checked before
//!    anything about the value, so a bounds failure is observable even when
//!    the value would also be rejected.
//! 3. **Outcome.** The store-outcome table decides between success,
//!    null-not-permitted, and store-incompatible.
//!
//! Only a successful decision writes to the array.

use crate::error::StoreError;
use crate::kind::{Array, ArrayKind, ElementKind, Value, classify_array, classify_value};
use crate::table::{Outcome, store_outcome, upcast_permitted};
use serde::{Deserialize, Serialize};

/// Which declared kind the actual kind could not be upcast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "side", rename_all = "snake_case")]
pub enum Inadmissible {
    Array {
        actual: ArrayKind,
        declared: ElementKind,
    },
    Value {
        actual: ElementKind,
        declared: ElementKind,
    },
}

impl std::fmt::Display for Inadmissible {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Array { actual, declared } => {
                write!(f, "{actual} array cannot be declared as {declared} array")
            }
            Self::Value { actual, declared } => {
                write!(f, "{actual} value cannot be declared as {declared}")
            }
        }
    }
}

/// A store that raised no failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StoreAttempt {
    /// The value is now in the slot.
    Stored,
    /// The declared kinds do not fit the actual ones; nothing was attempted.
    NotApplicable { reason: Inadmissible },
}

impl StoreAttempt {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored)
    }
}

/// The inputs of a decision, with the runtime references already classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRequest {
    pub array_kind: ArrayKind,
    pub length: usize,
    pub index: i64,
    pub value_kind: ElementKind,
    pub declared_array: ElementKind,
    pub declared_value: ElementKind,
}

impl StoreRequest {
    /// The in-bounds slot, if any.
    pub fn slot(&self) -> Option<usize> {
        usize::try_from(self.index)
            .ok()
            .filter(|&slot| slot < self.length)
    }
}

/// Decide a store without touching any array.
pub fn decide(request: &StoreRequest) -> Result<StoreAttempt, StoreError> {
    if !upcast_permitted(request.array_kind.into(), request.declared_array) {
        let reason = Inadmissible::Array {
            actual: request.array_kind,
            declared: request.declared_array,
        };
        tracing::trace!(%reason, "store not applicable");
        return Ok(StoreAttempt::NotApplicable { reason });
    }
    if !upcast_permitted(request.value_kind, request.declared_value) {
        let reason = Inadmissible::Value {
            actual: request.value_kind,
            declared: request.declared_value,
        };
        tracing::trace!(%reason, "store not applicable");
        return Ok(StoreAttempt::NotApplicable { reason });
    }

    if request.slot().is_none() {
        return Err(StoreError::IndexOutOfBounds {
            index: request.index,
            length: request.length,
        });
    }

    match store_outcome(request.array_kind, request.value_kind) {
        Outcome::Success => Ok(StoreAttempt::Stored),
        Outcome::NullNotPermitted => Err(StoreError::NullNotPermitted {
            array_kind: request.array_kind,
        }),
        Outcome::StoreIncompatible => Err(StoreError::StoreIncompatible {
            array_kind: request.array_kind,
            value_kind: request.value_kind,
        }),
    }
}

/// Store `value` into `array[index]` if every check passes.
///
/// `declared_array` and `declared_value` are the static kinds the caller
/// has already resolved for `array` and `value`. The array is written only
/// when the result is `Ok(StoreAttempt::Stored)`.
pub fn attempt_store(
    array: &mut Array,
    index: i64,
    value: Value,
    declared_array: ElementKind,
    declared_value: ElementKind,
) -> Result<StoreAttempt, StoreError> {
    let request = StoreRequest {
        array_kind: classify_array(array),
        length: array.len(),
        index,
        value_kind: classify_value(&value),
        declared_array,
        declared_value,
    };

    let decision = decide(&request);
    match (&decision, request.slot()) {
        (Ok(StoreAttempt::Stored), Some(slot)) => {
            array.write(slot, value);
            tracing::debug!(
                array_kind = %request.array_kind,
                value_kind = %request.value_kind,
                index,
                "store succeeded"
            );
        }
        (Err(err), _) => {
            tracing::debug!(
                array_kind = %request.array_kind,
                value_kind = %request.value_kind,
                index,
                class = err.class(),
                "store rejected: {err}"
            );
        }
        _ => {}
    }
    decision
}
