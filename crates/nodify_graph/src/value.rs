// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin values and the capability pins use to resolve them.

use crate::error::{GraphError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared object with named fields.
///
/// Cloning an `ObjectRef` yields another handle to the same object;
/// equality between handles is identity, not structure.
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<IndexMap<String, PinValue>>>);

impl ObjectRef {
    /// Create a new empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an object from `(field, value)` pairs, keeping their order
    pub fn from_fields<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PinValue)>,
    {
        let map = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self(Rc::new(RefCell::new(map)))
    }

    /// Read a field
    pub fn get(&self, field: &str) -> Option<PinValue> {
        self.0.borrow().get(field).cloned()
    }

    /// Write a field, appending it if it does not exist yet
    pub fn set(&self, field: impl Into<String>, value: PinValue) {
        self.0.borrow_mut().insert(field.into(), value);
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Snapshot of all fields in declaration order
    pub fn fields(&self) -> Vec<(String, PinValue)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the object has no fields
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Whether both handles point at the same object
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Field names only: objects may reference themselves.
        f.debug_tuple("ObjectRef")
            .field(&self.field_names())
            .finish()
    }
}

/// Value carried by a pin
#[derive(Debug, Clone, Default)]
pub enum PinValue {
    /// No value
    #[default]
    Undefined,
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// String
    String(String),
    /// Shared object
    Object(ObjectRef),
}

impl PinValue {
    /// The object handle, if this is an object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Whether both values are the very same object
    pub fn is_same_reference(&self, other: &PinValue) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq for PinValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for PinValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PinValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PinValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PinValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ObjectRef> for PinValue {
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

/// How a pin reaches its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueAccess {
    /// The pin stores its value
    ByValue,
    /// The pin reads a field of a container on every access
    ByReference,
    /// The pin stands for its node's backing object
    This,
}

/// Value capability of a pin, fixed at construction
#[derive(Debug, Clone)]
pub enum PinBinding {
    /// Stored value
    Value(PinValue),
    /// Field of a shared container
    Reference {
        /// Container object
        container: ObjectRef,
        /// Field name within the container
        field: String,
    },
    /// The owning node's backing object
    This(ObjectRef),
}

impl PinBinding {
    /// Bind to a field of `target`, which must be an object
    pub fn by_reference(target: &PinValue, field: impl Into<String>) -> Result<Self> {
        let field = field.into();
        let Some(container) = target.as_object() else {
            return Err(GraphError::InvalidPinDeclaration(format!(
                "reference to field '{field}' needs an object container"
            )));
        };
        Ok(Self::Reference { container: container.clone(), field })
    }

    /// Bind to the backing object `target`, which must be an object
    pub fn this(target: &PinValue) -> Result<Self> {
        match target.as_object() {
            Some(object) => Ok(Self::This(object.clone())),
            None => Err(GraphError::InvalidPinDeclaration(
                "a this-pin must be backed by an object".to_string(),
            )),
        }
    }

    /// Access mode of this binding
    pub fn access(&self) -> ValueAccess {
        match self {
            Self::Value(_) => ValueAccess::ByValue,
            Self::Reference { .. } => ValueAccess::ByReference,
            Self::This(_) => ValueAccess::This,
        }
    }

    /// Current value. References are re-read on every call.
    pub fn resolve(&self) -> PinValue {
        match self {
            Self::Value(value) => value.clone(),
            Self::Reference { container, field } => container.get(field).unwrap_or_default(),
            Self::This(object) => PinValue::Object(object.clone()),
        }
    }
}
