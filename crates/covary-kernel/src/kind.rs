//! Element kinds and the runtime model they are computed from.
//!
//! Five kinds cover every reference the checker sees:
//!
//! - **NullRef**: the null reference
//! - **Identity**: an ordinary object with reference identity
//! - **Interface**: a reference typed by the interface
//! - **ValueClass**: a value-class instance, nullable when held by reference
//! - **PrimitiveValueClass**: a flattened value-class instance, never null
//!
//! The derived order exists for table indexing only. It says nothing about
//! subtyping; that lives in [`crate::table`].
//!
//! Values and arrays are classified structurally: a value by its runtime
//! class (or by being null), an array by its component class, never by what
//! it currently holds.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The kind of a runtime value, an array component, or a declared type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    NullRef,
    Identity,
    Interface,
    ValueClass,
    PrimitiveValueClass,
}

impl ElementKind {
    /// All kinds in table order.
    pub const ALL: [ElementKind; 5] = [
        ElementKind::NullRef,
        ElementKind::Identity,
        ElementKind::Interface,
        ElementKind::ValueClass,
        ElementKind::PrimitiveValueClass,
    ];

    /// Row/column index into the compatibility tables.
    pub const fn index(self) -> usize {
        match self {
            Self::NullRef => 0,
            Self::Identity => 1,
            Self::Interface => 2,
            Self::ValueClass => 3,
            Self::PrimitiveValueClass => 4,
        }
    }

    /// The array kind with this component kind, if one exists.
    ///
    /// NullRef has none: arrays are never absent.
    pub const fn as_array_kind(self) -> Option<ArrayKind> {
        match self {
            Self::NullRef => None,
            Self::Identity => Some(ArrayKind::Identity),
            Self::Interface => Some(ArrayKind::Interface),
            Self::ValueClass => Some(ArrayKind::ValueClass),
            Self::PrimitiveValueClass => Some(ArrayKind::PrimitiveValueClass),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NullRef => "null_ref",
            Self::Identity => "identity",
            Self::Interface => "interface",
            Self::ValueClass => "value_class",
            Self::PrimitiveValueClass => "primitive_value_class",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "null_ref" | "null" => Ok(Self::NullRef),
            "identity" | "obj" | "object" => Ok(Self::Identity),
            "interface" | "iface" => Ok(Self::Interface),
            "value_class" | "val" | "value" => Ok(Self::ValueClass),
            "primitive_value_class" | "prim" | "primitive" => Ok(Self::PrimitiveValueClass),
            _ => Err(format!("unknown element kind: {s}")),
        }
    }
}

/// The kind of an array, named by its component kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ArrayKind {
    Identity,
    Interface,
    ValueClass,
    PrimitiveValueClass,
}

impl ArrayKind {
    pub const ALL: [ArrayKind; 4] = [
        ArrayKind::Identity,
        ArrayKind::Interface,
        ArrayKind::ValueClass,
        ArrayKind::PrimitiveValueClass,
    ];

    /// Row index into the store-outcome table.
    pub const fn index(self) -> usize {
        match self {
            Self::Identity => 0,
            Self::Interface => 1,
            Self::ValueClass => 2,
            Self::PrimitiveValueClass => 3,
        }
    }

    pub const fn element_kind(self) -> ElementKind {
        match self {
            Self::Identity => ElementKind::Identity,
            Self::Interface => ElementKind::Interface,
            Self::ValueClass => ElementKind::ValueClass,
            Self::PrimitiveValueClass => ElementKind::PrimitiveValueClass,
        }
    }
}

impl From<ArrayKind> for ElementKind {
    fn from(kind: ArrayKind) -> Self {
        kind.element_kind()
    }
}

impl std::fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.element_kind().as_str())
    }
}

impl std::str::FromStr for ArrayKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind: ElementKind = s.parse()?;
        kind.as_array_kind()
            .ok_or_else(|| format!("`{s}` is not an array component kind"))
    }
}

// ─── Runtime model ──────────────────────────────────────────────────────────

/// How a runtime class is laid out and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassShape {
    /// Ordinary class with reference identity.
    Identity,
    /// The interface type itself.
    Interface,
    /// Value class: no identity, nullable by reference.
    Value,
    /// Primitive value class: flattened, never null.
    PrimitiveValue,
}

/// A runtime class as the surrounding runtime describes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeClass {
    pub name: String,
    pub shape: ClassShape,
    /// Whether instances satisfy the interface type.
    pub implements_interface: bool,
}

impl RuntimeClass {
    pub fn new(name: impl Into<String>, shape: ClassShape, implements_interface: bool) -> Self {
        Self {
            name: name.into(),
            shape,
            implements_interface,
        }
    }

    /// Whether a reference of this class satisfies the interface type.
    pub fn satisfies_interface(&self) -> bool {
        self.shape == ClassShape::Interface || self.implements_interface
    }

    /// Most specific kind this class satisfies.
    ///
    /// Primitive value and value shapes are mutually exclusive, so the
    /// check order only matters between them and the interface test.
    pub fn kind(&self) -> ArrayKind {
        match self.shape {
            ClassShape::PrimitiveValue => ArrayKind::PrimitiveValueClass,
            ClassShape::Value => ArrayKind::ValueClass,
            _ if self.satisfies_interface() => ArrayKind::Interface,
            _ => ArrayKind::Identity,
        }
    }
}

/// An instance of a runtime class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub class: Arc<RuntimeClass>,
    pub fields: Vec<f64>,
}

/// A reference as seen by the checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    Null,
    Instance(Instance),
}

impl Value {
    pub fn instance(class: &Arc<RuntimeClass>, fields: Vec<f64>) -> Self {
        Self::Instance(Instance {
            class: Arc::clone(class),
            fields,
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn class(&self) -> Option<&RuntimeClass> {
        match self {
            Self::Null => None,
            Self::Instance(inst) => Some(&inst.class),
        }
    }
}

/// A one-dimensional array with a fixed component class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Array {
    component: Arc<RuntimeClass>,
    slots: Vec<Value>,
}

impl Array {
    /// Allocate `length` slots.
    ///
    /// Primitive value arrays start filled with a zeroed instance of the
    /// component class; every other array starts filled with null.
    pub fn new(component: Arc<RuntimeClass>, length: usize) -> Self {
        let initial = if component.shape == ClassShape::PrimitiveValue {
            Value::instance(&component, Vec::new())
        } else {
            Value::Null
        };
        Self {
            slots: vec![initial; length],
            component,
        }
    }

    pub fn component(&self) -> &RuntimeClass {
        &self.component
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[Value] {
        &self.slots
    }

    /// Unchecked write used once every store check has passed.
    pub(crate) fn write(&mut self, index: usize, value: Value) {
        self.slots[index] = value;
    }
}

/// Kind of a runtime value.
pub fn classify_value(value: &Value) -> ElementKind {
    match value.class() {
        None => ElementKind::NullRef,
        Some(class) => class.kind().into(),
    }
}

/// Kind of an array, from its component class alone.
pub fn classify_array(array: &Array) -> ArrayKind {
    array.component().kind()
}

// ─── Universe ───────────────────────────────────────────────────────────────

/// The fixed set of classes the checker is exercised against.
///
/// - `Object`: the root identity class
/// - `SomeIface`: the interface
/// - `PointV`: value class implementing `SomeIface`
/// - `PointPV`: primitive value class implementing `SomeIface`
/// - `Bogus`: identity class implementing `SomeIface`
#[derive(Debug, Clone)]
pub struct Universe {
    pub object: Arc<RuntimeClass>,
    pub some_iface: Arc<RuntimeClass>,
    pub point_v: Arc<RuntimeClass>,
    pub point_pv: Arc<RuntimeClass>,
    pub bogus: Arc<RuntimeClass>,
}

impl Default for Universe {
    fn default() -> Self {
        Self::standard()
    }
}

impl Universe {
    pub fn standard() -> Self {
        Self {
            object: Arc::new(RuntimeClass::new("Object", ClassShape::Identity, false)),
            some_iface: Arc::new(RuntimeClass::new("SomeIface", ClassShape::Interface, true)),
            point_v: Arc::new(RuntimeClass::new("PointV", ClassShape::Value, true)),
            point_pv: Arc::new(RuntimeClass::new(
                "PointPV",
                ClassShape::PrimitiveValue,
                true,
            )),
            bogus: Arc::new(RuntimeClass::new("Bogus", ClassShape::Identity, true)),
        }
    }

    /// Component class used for arrays of the given kind.
    pub fn component_for(&self, kind: ArrayKind) -> &Arc<RuntimeClass> {
        match kind {
            ArrayKind::Identity => &self.object,
            ArrayKind::Interface => &self.some_iface,
            ArrayKind::ValueClass => &self.point_v,
            ArrayKind::PrimitiveValueClass => &self.point_pv,
        }
    }

    pub fn array_of(&self, kind: ArrayKind, length: usize) -> Array {
        Array::new(Arc::clone(self.component_for(kind)), length)
    }

    /// A representative value of the given kind.
    ///
    /// The Identity sample is a bare `Object`. Note that `Bogus`, though an
    /// identity class, classifies as Interface because it implements it.
    pub fn sample_value(&self, kind: ElementKind) -> Value {
        match kind {
            ElementKind::NullRef => Value::Null,
            ElementKind::Identity => Value::instance(&self.object, Vec::new()),
            ElementKind::Interface => Value::instance(&self.bogus, Vec::new()),
            ElementKind::ValueClass => Value::instance(&self.point_v, vec![1.0, 2.0]),
            ElementKind::PrimitiveValueClass => Value::instance(&self.point_pv, vec![3.0, 4.0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_index() {
        for (i, kind) in ElementKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        for (i, kind) in ArrayKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert!(ElementKind::NullRef < ElementKind::PrimitiveValueClass);
    }

    #[test]
    fn classify_sample_values() {
        let u = Universe::standard();
        for kind in ElementKind::ALL {
            assert_eq!(classify_value(&u.sample_value(kind)), kind);
        }
    }

    #[test]
    fn bogus_classifies_as_interface() {
        let u = Universe::standard();
        let bogus = Value::instance(&u.bogus, Vec::new());
        assert_eq!(classify_value(&bogus), ElementKind::Interface);
    }

    #[test]
    fn classify_array_ignores_contents() {
        let u = Universe::standard();
        for kind in ArrayKind::ALL {
            let array = u.array_of(kind, 2);
            assert_eq!(classify_array(&array), kind);
        }
        let empty = u.array_of(ArrayKind::ValueClass, 0);
        assert_eq!(classify_array(&empty), ArrayKind::ValueClass);

        let bogus_array = Array::new(Arc::clone(&u.bogus), 1);
        assert_eq!(classify_array(&bogus_array), ArrayKind::Interface);
    }

    #[test]
    fn primitive_array_never_starts_null() {
        let u = Universe::standard();
        let array = u.array_of(ArrayKind::PrimitiveValueClass, 3);
        assert!(array.slots().iter().all(|v| !v.is_null()));

        let array = u.array_of(ArrayKind::ValueClass, 3);
        assert!(array.slots().iter().all(Value::is_null));
    }

    #[test]
    fn kind_parse() {
        assert_eq!("prim".parse::<ElementKind>().unwrap(), ElementKind::PrimitiveValueClass);
        assert_eq!("value-class".parse::<ElementKind>().unwrap(), ElementKind::ValueClass);
        assert_eq!("OBJ".parse::<ElementKind>().unwrap(), ElementKind::Identity);
        assert_eq!("null".parse::<ElementKind>().unwrap(), ElementKind::NullRef);
        assert!("widget".parse::<ElementKind>().is_err());
        assert!("null".parse::<ArrayKind>().is_err());
        assert_eq!("iface".parse::<ArrayKind>().unwrap(), ArrayKind::Interface);
    }

    #[test]
    fn kind_serde_snake_case() {
        let json = serde_json::to_value(ElementKind::PrimitiveValueClass).unwrap();
        assert_eq!(json, "primitive_value_class");
        let back: ArrayKind = serde_json::from_value(serde_json::json!("value_class")).unwrap();
        assert_eq!(back, ArrayKind::ValueClass);
    }
}
