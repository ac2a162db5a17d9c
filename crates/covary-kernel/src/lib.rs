//! # Covary Kernel
//!
//! Decides whether a store into a covariantly typed array is permitted.
//!
//! Arrays may be declared with a broader element kind than they actually
//! have, so every store needs a dynamic check. Value classes make the check
//! irregular: a primitive value class is flattened and never null, and a
//! value class admits only itself (or null).
//!
//! ## Architecture
//!
//! ```text
//! kind         ← ElementKind / ArrayKind, runtime classification
//!     │
//! table        ← UPCAST_PERMITTED, STORE_OUTCOMES (literal ground truth)
//!     │
//! store        ← admissibility → bounds → outcome, then the one write
//!     │
//! conformance  ← exhaustive sweep, fixture scenarios, witnesses
//! ```

pub mod config;
pub mod conformance;
pub mod error;
pub mod kind;
pub mod store;
pub mod table;
pub mod witness;

pub use config::ConformanceConfig;
pub use conformance::{CaseResult, StoreCase, generate_cases, run_conformance, run_store_case};
pub use error::{CovaryError, StoreError};
pub use kind::{
    Array, ArrayKind, ClassShape, ElementKind, RuntimeClass, Universe, Value, classify_array,
    classify_value,
};
pub use store::{Inadmissible, StoreAttempt, StoreRequest, attempt_store, decide};
pub use table::{
    Outcome, STORE_OUTCOMES, UPCAST_PERMITTED, statically_assignable, store_outcome,
    upcast_permitted, validate_tables,
};
pub use witness::{ConformanceReport, StoreWitness};
