//! The two compatibility tables.
//!
//! Both tables are literal ground truth. The five-kind lattice is
//! irregular (an Interface value stores into an Identity array, but an
//! Identity value does not store into an Interface array), so the data is
//! written out cell by cell and checked by [`validate_tables`] rather than
//! derived.
//!
//! The array types make both tables exhaustive: every `ElementKind` pair has
//! an upcast entry, and every `ArrayKind` × `ElementKind` pair has a store
//! entry. There is no NullRef row in the store table because arrays are
//! never absent.

use crate::error::CovaryError;
use crate::kind::{ArrayKind, ElementKind};
use serde::{Deserialize, Serialize};

/// Result of storing a value of one actual kind into an array of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    NullNotPermitted,
    StoreIncompatible,
}

impl Outcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NullNotPermitted => "null_not_permitted",
            Self::StoreIncompatible => "store_incompatible",
        }
    }

    fn short(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::NullNotPermitted => "nonnull",
            Self::StoreIncompatible => "incompat",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const T: bool = true;
const F: bool = false;

/// `UPCAST_PERMITTED[actual][declared]`: whether a reference of the actual
/// kind may be treated as the declared kind without a cast failure.
///
/// Columns and rows follow [`ElementKind::ALL`]. The NullRef column is all
/// false: nothing is ever declared as NullRef.
pub const UPCAST_PERMITTED: [[bool; 5]; 5] = [
    //  null  ident iface value prim
    [F, T, T, T, F], // NullRef: anything nullable
    [F, T, F, F, F], // Identity: Object only
    [F, T, T, F, F], // Interface: Object, SomeIface
    [F, T, T, T, F], // ValueClass: Object, SomeIface, PointV
    [F, T, T, F, T], // PrimitiveValueClass: Object, SomeIface, PointPV
];

use self::Outcome::{NullNotPermitted as N, StoreIncompatible as I, Success as S};

/// `STORE_OUTCOMES[actual_array][actual_value]`.
///
/// Rows follow [`ArrayKind::ALL`], columns follow [`ElementKind::ALL`].
pub const STORE_OUTCOMES: [[Outcome; 5]; 4] = [
    //  null ident iface value prim
    [S, S, S, S, S], // Identity array: holds any reference
    [S, I, S, S, S], // Interface array: rejects non-implementing identity objects
    [S, I, I, S, I], // ValueClass array: null or the exact value class
    [N, I, I, I, S], // PrimitiveValueClass array: the exact class, never null
];

/// Whether a reference of kind `actual` may be treated as `declared`.
pub fn upcast_permitted(actual: ElementKind, declared: ElementKind) -> bool {
    UPCAST_PERMITTED[actual.index()][declared.index()]
}

/// What happens when a value of `value` kind is stored into an array of `array` kind.
pub fn store_outcome(array: ArrayKind, value: ElementKind) -> Outcome {
    STORE_OUTCOMES[array.index()][value.index()]
}

/// Whether the host language's static typing admits storing an expression
/// declared as `declared_value` into an array declared as `declared_array`.
///
/// Either the declared kinds coincide, or the array is declared as Identity
/// or Interface and is strictly less specific than the value. NullRef is
/// never a declared kind.
pub fn statically_assignable(declared_array: ElementKind, declared_value: ElementKind) -> bool {
    if declared_array == ElementKind::NullRef || declared_value == ElementKind::NullRef {
        return false;
    }
    declared_array == declared_value
        || (declared_array < declared_value && declared_array < ElementKind::ValueClass)
}

fn violation(description: String) -> Result<(), CovaryError> {
    Err(CovaryError::TableInvariant { description })
}

/// Check the structural invariants of both tables.
///
/// Returns the first violation found.
pub fn validate_tables() -> Result<(), CovaryError> {
    for declared in ElementKind::ALL {
        if upcast_permitted(ElementKind::NullRef, declared)
            != (declared != ElementKind::NullRef
                && declared != ElementKind::PrimitiveValueClass)
        {
            return violation(format!("null upcast to {declared} is wrong"));
        }
    }

    for actual in ElementKind::ALL {
        if upcast_permitted(actual, ElementKind::NullRef) {
            return violation(format!("{actual} may be declared null_ref"));
        }
        if !upcast_permitted(actual, ElementKind::Identity) {
            return violation(format!("{actual} does not upcast to identity"));
        }
        if actual != ElementKind::NullRef && !upcast_permitted(actual, actual) {
            return violation(format!("{actual} does not upcast to itself"));
        }
    }

    for value in ElementKind::ALL {
        if store_outcome(ArrayKind::Identity, value) != Outcome::Success {
            return violation(format!("identity array rejects {value}"));
        }
    }

    for array in ArrayKind::ALL {
        if store_outcome(array, array.element_kind()) != Outcome::Success {
            return violation(format!("{array} array rejects its own kind"));
        }
        for value in ElementKind::ALL {
            let outcome = store_outcome(array, value);
            let null_into_primitive =
                array == ArrayKind::PrimitiveValueClass && value == ElementKind::NullRef;
            if (outcome == Outcome::NullNotPermitted) != null_into_primitive {
                return violation(format!(
                    "storing {value} into {array} array yields {outcome}"
                ));
            }
        }
    }

    Ok(())
}

const LABELS: [&str; 5] = ["null", "obj", "iface", "val", "prim"];

/// Fixed-width text grid of [`UPCAST_PERMITTED`], rows actual, columns declared.
pub fn render_upcast_table() -> String {
    let mut out = format!("{:<6}", "upcast");
    for label in LABELS {
        out.push_str(&format!("{label:>6}"));
    }
    for actual in ElementKind::ALL {
        out.push('\n');
        out.push_str(&format!("{:<6}", LABELS[actual.index()]));
        for declared in ElementKind::ALL {
            let cell = if upcast_permitted(actual, declared) { "yes" } else { "-" };
            out.push_str(&format!("{cell:>6}"));
        }
    }
    out
}

/// Fixed-width text grid of [`STORE_OUTCOMES`], rows array, columns value.
pub fn render_store_table() -> String {
    let mut out = format!("{:<6}", "store");
    for label in LABELS {
        out.push_str(&format!("{label:>9}"));
    }
    for array in ArrayKind::ALL {
        out.push('\n');
        out.push_str(&format!("{:<6}", LABELS[array.element_kind().index()]));
        for value in ElementKind::ALL {
            out.push_str(&format!("{:>9}", store_outcome(array, value).short()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_valid() {
        validate_tables().unwrap();
    }

    #[test]
    fn interface_covariance_is_asymmetric() {
        assert_eq!(
            store_outcome(ArrayKind::Identity, ElementKind::Interface),
            Outcome::Success
        );
        assert_eq!(
            store_outcome(ArrayKind::Interface, ElementKind::Identity),
            Outcome::StoreIncompatible
        );
        assert_eq!(
            store_outcome(ArrayKind::Interface, ElementKind::ValueClass),
            Outcome::Success
        );
        assert_eq!(
            store_outcome(ArrayKind::Interface, ElementKind::PrimitiveValueClass),
            Outcome::Success
        );
    }

    #[test]
    fn value_class_exactness() {
        assert_eq!(
            store_outcome(ArrayKind::ValueClass, ElementKind::PrimitiveValueClass),
            Outcome::StoreIncompatible
        );
        assert_eq!(
            store_outcome(ArrayKind::PrimitiveValueClass, ElementKind::ValueClass),
            Outcome::StoreIncompatible
        );
        assert_eq!(
            store_outcome(ArrayKind::ValueClass, ElementKind::NullRef),
            Outcome::Success
        );
    }

    #[test]
    fn null_never_upcasts_to_primitive() {
        assert!(!upcast_permitted(
            ElementKind::NullRef,
            ElementKind::PrimitiveValueClass
        ));
        assert!(upcast_permitted(ElementKind::NullRef, ElementKind::ValueClass));
    }

    #[test]
    fn static_assignability() {
        use ElementKind::*;
        assert!(statically_assignable(Identity, Identity));
        assert!(statically_assignable(Identity, PrimitiveValueClass));
        assert!(statically_assignable(Interface, ValueClass));
        assert!(statically_assignable(PrimitiveValueClass, PrimitiveValueClass));
        assert!(!statically_assignable(Interface, Identity));
        assert!(!statically_assignable(ValueClass, PrimitiveValueClass));
        assert!(!statically_assignable(PrimitiveValueClass, ValueClass));
        assert!(!statically_assignable(NullRef, NullRef));
        assert!(!statically_assignable(Identity, NullRef));

        let admitted = ElementKind::ALL
            .iter()
            .flat_map(|a| ElementKind::ALL.iter().map(move |v| (*a, *v)))
            .filter(|(a, v)| statically_assignable(*a, *v))
            .count();
        // obj: 4, iface: 3, val: 1, prim: 1
        assert_eq!(admitted, 9);
    }

    #[test]
    fn upcast_table_snapshot() {
        insta::assert_snapshot!(render_upcast_table(), @r"
        upcast  null   obj iface   val  prim
        null       -   yes   yes   yes     -
        obj        -   yes     -     -     -
        iface      -   yes   yes     -     -
        val        -   yes   yes   yes     -
        prim       -   yes   yes     -   yes
        ");
    }

    #[test]
    fn store_table_snapshot() {
        insta::assert_snapshot!(render_store_table(), @r"
        store      null      obj    iface      val     prim
        obj          ok       ok       ok       ok       ok
        iface        ok incompat       ok       ok       ok
        val          ok incompat incompat       ok incompat
        prim    nonnull incompat incompat incompat       ok
        ");
    }
}
