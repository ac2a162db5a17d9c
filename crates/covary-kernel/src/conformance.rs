//! Exhaustive conformance sweep and single-case fixtures.
//!
//! The sweep walks every actual array kind, every statically legal pair of
//! declared kinds, and every value kind. For each combination it:
//!
//! - skips the case when the actual kinds are not legal upcasts of the
//!   declared ones (the store could never happen under sound typing),
//! - stores into an in-range slot of a fresh array and compares the result
//!   with [`store_outcome`],
//! - checks that the slot holds the value after success and that the array
//!   is untouched after a failure,
//! - stores again just past the end and at `-1`, requiring an
//!   index-out-of-bounds failure whatever the value.
//!
//! Disagreements become [`StoreWitness`]es in a [`ConformanceReport`].

use crate::config::ConformanceConfig;
use crate::error::{CovaryError, StoreError, failure_class};
use crate::kind::{ArrayKind, ElementKind, Universe, classify_value};
use crate::store::{Inadmissible, StoreAttempt, StoreRequest, attempt_store, decide};
use crate::table::{Outcome, statically_assignable, store_outcome, validate_tables};
use crate::witness::{ConformanceReport, StoreWitness};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Kinds that can appear as a declared type.
const DECLARABLE: [ElementKind; 4] = [
    ElementKind::Identity,
    ElementKind::Interface,
    ElementKind::ValueClass,
    ElementKind::PrimitiveValueClass,
];

/// One combination of actual and declared kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepCase {
    pub array: ArrayKind,
    pub declared_array: ElementKind,
    pub value: ElementKind,
    pub declared_value: ElementKind,
}

impl SweepCase {
    fn context(&self, index: i64, phase: &str) -> Value {
        json!({
            "arrayKind": self.array,
            "declaredArray": self.declared_array,
            "valueKind": self.value,
            "declaredValue": self.declared_value,
            "index": index,
            "phase": phase,
        })
    }
}

/// Every case the sweep visits, in a fixed order.
pub fn generate_cases() -> Vec<SweepCase> {
    let mut cases = Vec::new();
    for array in ArrayKind::ALL {
        for declared_array in DECLARABLE {
            for declared_value in DECLARABLE {
                if !statically_assignable(declared_array, declared_value) {
                    continue;
                }
                for value in ElementKind::ALL {
                    cases.push(SweepCase {
                        array,
                        declared_array,
                        value,
                        declared_value,
                    });
                }
            }
        }
    }
    cases
}

fn observed_class(result: &Result<StoreAttempt, StoreError>) -> &'static str {
    match result {
        Ok(StoreAttempt::Stored) => Outcome::Success.as_str(),
        Ok(StoreAttempt::NotApplicable { .. }) => "not_applicable",
        Err(err) => err.class(),
    }
}

/// Slot indices of one sweep, checked to fit the signed index type.
#[derive(Debug, Clone, Copy)]
struct SweepSlots {
    length: usize,
    target: usize,
    past_end: i64,
}

impl SweepSlots {
    fn new(config: &ConformanceConfig) -> Result<Self, CovaryError> {
        let past_end = i64::try_from(config.array_length).map_err(|_| {
            CovaryError::InvalidConfig(format!(
                "array_length {} does not fit a signed index",
                config.array_length
            ))
        })?;
        Ok(Self {
            length: config.array_length,
            target: config.target_index,
            past_end,
        })
    }

    /// `target < length <= i64::MAX`, so this never saturates.
    fn target_index(&self) -> i64 {
        i64::try_from(self.target).unwrap_or(i64::MAX)
    }
}

/// Run one case. Returns false when the case is not applicable.
fn run_case(
    universe: &Universe,
    slots: SweepSlots,
    case: &SweepCase,
    failures: &mut Vec<StoreWitness>,
) -> bool {
    let fresh = universe.array_of(case.array, slots.length);
    let value = universe.sample_value(case.value);
    debug_assert_eq!(classify_value(&value), case.value);

    let index = slots.target_index();
    let mut array = fresh.clone();
    let result = attempt_store(
        &mut array,
        index,
        value.clone(),
        case.declared_array,
        case.declared_value,
    );
    if let Ok(StoreAttempt::NotApplicable { .. }) = result {
        if array != fresh {
            failures.push(StoreWitness::new(
                failure_class::SLOT_MISMATCH,
                "array modified by a store that was not applicable",
                Some(case.context(index, "in_range")),
            ));
        }
        return false;
    }

    let expected = store_outcome(case.array, case.value).as_str();
    let observed = observed_class(&result);
    if observed != expected {
        tracing::debug!(?case, expected, observed, "outcome mismatch");
        failures.push(
            StoreWitness::new(
                failure_class::OUTCOME_MISMATCH,
                format!("expected {expected}, observed {observed}"),
                Some(case.context(index, "in_range")),
            )
            .with_details(json!({"expected": expected, "observed": observed})),
        );
    }

    let slot_ok = if result.is_ok() {
        array.get(slots.target) == Some(&value)
    } else {
        array == fresh
    };
    if !slot_ok {
        failures.push(StoreWitness::new(
            failure_class::SLOT_MISMATCH,
            format!("array contents disagree with {observed}"),
            Some(case.context(index, "in_range")),
        ));
    }

    for index in [slots.past_end, -1] {
        let mut array = fresh.clone();
        let result = attempt_store(
            &mut array,
            index,
            value.clone(),
            case.declared_array,
            case.declared_value,
        );
        let observed = observed_class(&result);
        if observed != failure_class::INDEX_OUT_OF_BOUNDS || array != fresh {
            failures.push(
                StoreWitness::new(
                    failure_class::OUTCOME_MISMATCH,
                    format!("expected index_out_of_bounds, observed {observed}"),
                    Some(case.context(index, "out_of_bounds")),
                )
                .with_details(json!({
                    "expected": failure_class::INDEX_OUT_OF_BOUNDS,
                    "observed": observed,
                })),
            );
        }
    }

    true
}

/// Sweep every case `config.invocation_count` times.
pub fn run_conformance(config: &ConformanceConfig) -> Result<ConformanceReport, CovaryError> {
    config.validate()?;
    validate_tables()?;
    let slots = SweepSlots::new(config)?;

    let universe = Universe::standard();
    let cases = generate_cases();
    let mut executed = 0;
    let mut skipped = 0;
    let mut failures = Vec::new();

    tracing::info!(
        profile = %config.profile,
        cases = cases.len(),
        invocations = config.invocation_count,
        "conformance sweep started"
    );

    for _ in 0..config.invocation_count {
        for case in &cases {
            if run_case(&universe, slots, case, &mut failures) {
                executed += 1;
            } else {
                skipped += 1;
            }
        }
    }

    let report = ConformanceReport::new(config.profile.clone(), executed, skipped, failures);
    tracing::info!(
        result = %report.result,
        executed,
        skipped,
        failures = report.failures.len(),
        "conformance sweep finished"
    );
    Ok(report)
}

// ─── Fixtures ───────────────────────────────────────────────────────────────

/// A single store scenario, as written in `case.json` fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCase {
    pub array: ArrayKind,
    pub value: ElementKind,
    /// Defaults to the actual array kind.
    #[serde(default)]
    pub declared_array: Option<ElementKind>,
    /// Defaults to the actual value kind, or Identity for null.
    #[serde(default)]
    pub declared_value: Option<ElementKind>,
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default = "default_index")]
    pub index: i64,
}

fn default_length() -> usize {
    2
}

fn default_index() -> i64 {
    1
}

impl StoreCase {
    pub fn from_fixture(case: &Value) -> Result<Self, CovaryError> {
        serde_json::from_value(case.clone()).map_err(|e| CovaryError::InvalidFixture(e.to_string()))
    }

    pub fn declared_array(&self) -> ElementKind {
        self.declared_array.unwrap_or(self.array.into())
    }

    pub fn declared_value(&self) -> ElementKind {
        self.declared_value.unwrap_or(match self.value {
            ElementKind::NullRef => ElementKind::Identity,
            kind => kind,
        })
    }
}

/// Observable result of a single store, as written in `expect.json` fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseResult {
    Stored,
    NotApplicable { reason: Inadmissible },
    Failed { class: String, message: String },
}

impl From<Result<StoreAttempt, StoreError>> for CaseResult {
    fn from(result: Result<StoreAttempt, StoreError>) -> Self {
        match result {
            Ok(StoreAttempt::Stored) => Self::Stored,
            Ok(StoreAttempt::NotApplicable { reason }) => Self::NotApplicable { reason },
            Err(err) => Self::Failed {
                class: err.class().to_string(),
                message: err.to_string(),
            },
        }
    }
}

/// Decide a fixture scenario against the classes of `universe`.
///
/// Only the kinds and the length matter to the decision, so no array is
/// allocated and any `length` is accepted.
pub fn run_store_case(universe: &Universe, case: &StoreCase) -> CaseResult {
    let request = StoreRequest {
        array_kind: universe.component_for(case.array).kind(),
        length: case.length,
        index: case.index,
        value_kind: classify_value(&universe.sample_value(case.value)),
        declared_array: case.declared_array(),
        declared_value: case.declared_value(),
    };
    decide(&request).into()
}
