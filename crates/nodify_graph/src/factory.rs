// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyed factory for node and pin variants.
//!
//! Custom variants are registered under a string key and created through
//! the same entry points as the built-in ones. The factory checks that a
//! constructor produced the requested entity kind before handing it out.

use crate::error::{EntityKind, GraphError, Result};
use crate::node::Node;
use crate::pin::{Pin, PinDirection, PinKind};
use crate::value::{PinBinding, PinValue};
use indexmap::IndexMap;
use std::fmt;

/// Key of the built-in object-backed node
pub const OBJECT_NODE: &str = "object-node";

/// An entity produced by a factory constructor
#[derive(Debug, Clone)]
pub enum Entity {
    /// A node
    Node(Node),
    /// A pin
    Pin(Pin),
}

impl Entity {
    /// Kind of the produced entity
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Node(_) => EntityKind::Node,
            Self::Pin(_) => EntityKind::Pin,
        }
    }
}

/// Arguments handed to a constructor
#[derive(Debug, Clone)]
pub struct FactoryArgs {
    /// Direction for pin constructors
    pub direction: PinDirection,
    /// Value, backing object or reference container
    pub value: PinValue,
    /// Field of `value` to bind by reference, if any
    pub field: Option<String>,
}

impl FactoryArgs {
    /// Arguments carrying `value`, for an output pin by default
    pub fn new(value: impl Into<PinValue>) -> Self {
        Self {
            direction: PinDirection::Output,
            value: value.into(),
            field: None,
        }
    }

    /// Set the pin direction
    pub fn with_direction(mut self, direction: PinDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Bind `field` of the value by reference
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

type Constructor = Box<dyn Fn(&FactoryArgs) -> Result<Entity>>;

/// Registry of entity constructors by key
#[derive(Default)]
pub struct EntityFactory {
    constructors: IndexMap<String, Constructor>,
}

impl EntityFactory {
    /// Create a new empty factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory with the built-in pin kinds and the object node
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        for kind in [PinKind::Boolean, PinKind::Number, PinKind::String, PinKind::Object] {
            let key = kind.tag().to_string();
            factory.insert_builtin(key, move |args| value_pin(kind.clone(), args));
        }
        factory.insert_builtin(PinKind::THIS_TAG, |args| Pin::this(&args.value).map(Entity::Pin));
        factory.insert_builtin(OBJECT_NODE, |args| Node::for_object("", &args.value).map(Entity::Node));
        factory
    }

    fn insert_builtin<F>(&mut self, key: impl Into<String>, constructor: F)
    where
        F: Fn(&FactoryArgs) -> Result<Entity> + 'static,
    {
        self.constructors.insert(key.into(), Box::new(constructor));
    }

    /// Register a constructor under `key`
    pub fn register<F>(&mut self, key: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&FactoryArgs) -> Result<Entity> + 'static,
    {
        let key = key.into();
        if self.constructors.contains_key(&key) {
            return Err(GraphError::DuplicateFactory(key));
        }
        tracing::debug!("Registered factory '{}'", key);
        self.constructors.insert(key, Box::new(constructor));
        Ok(())
    }

    /// Remove the constructor under `key`
    pub fn unregister(&mut self, key: &str) -> bool {
        self.constructors.shift_remove(key).is_some()
    }

    /// Remove every constructor
    pub fn clear(&mut self) {
        self.constructors.clear();
    }

    /// Whether a constructor is registered under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.constructors.contains_key(key)
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Create a node, then place and label it
    pub fn create_node(
        &self,
        key: &str,
        position: [f32; 2],
        label: impl Into<String>,
        args: &FactoryArgs,
    ) -> Result<Node> {
        match self.construct(key, args)? {
            Entity::Node(node) => Ok(node.with_position(position[0], position[1]).with_label(label)),
            other => Err(mismatch(key, EntityKind::Node, &other)),
        }
    }

    /// Create a pin
    pub fn create_pin(&self, key: &str, args: &FactoryArgs) -> Result<Pin> {
        match self.construct(key, args)? {
            Entity::Pin(pin) => Ok(pin),
            other => Err(mismatch(key, EntityKind::Pin, &other)),
        }
    }

    fn construct(&self, key: &str, args: &FactoryArgs) -> Result<Entity> {
        let constructor = self
            .constructors
            .get(key)
            .ok_or_else(|| GraphError::UnknownFactory(key.to_string()))?;
        constructor(args)
    }
}

impl fmt::Debug for EntityFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityFactory")
            .field("keys", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn mismatch(key: &str, expected: EntityKind, found: &Entity) -> GraphError {
    GraphError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

fn value_pin(kind: PinKind, args: &FactoryArgs) -> Result<Entity> {
    let pin = match &args.field {
        Some(field) => Pin::by_reference(args.direction, kind, &args.value, field.clone())?,
        None => Pin::new(args.direction, kind, PinBinding::Value(args.value.clone())),
    };
    Ok(Entity::Pin(pin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ObjectRef, ValueAccess};

    #[test]
    fn test_builtin_keys() {
        let factory = EntityFactory::with_builtins();
        let keys: Vec<_> = factory.keys().collect();
        assert_eq!(
            keys,
            ["boolean-pin", "number-pin", "string-pin", "object-pin", "this-pin", OBJECT_NODE]
        );
    }

    #[test]
    fn test_builtin_pins() {
        let factory = EntityFactory::with_builtins();
        let pin = factory
            .create_pin("number-pin", &FactoryArgs::new(4.0).with_direction(PinDirection::Input))
            .unwrap();
        assert_eq!(pin.type_tag(), "number-pin");
        assert_eq!(pin.direction(), PinDirection::Input);
        assert_eq!(pin.value(), PinValue::Number(4.0));

        let object = PinValue::Object(ObjectRef::from_fields([("on", PinValue::Bool(true))]));
        let pin = factory
            .create_pin("boolean-pin", &FactoryArgs::new(object.clone()).with_field("on"))
            .unwrap();
        assert_eq!(pin.value_access(), ValueAccess::ByReference);
        assert_eq!(pin.label, "on");

        let this = factory.create_pin("this-pin", &FactoryArgs::new(object)).unwrap();
        assert_eq!(this.value_access(), ValueAccess::This);
    }

    #[test]
    fn test_object_node() {
        let factory = EntityFactory::with_builtins();
        let object = PinValue::Object(ObjectRef::from_fields([("a", PinValue::from("x"))]));
        let node = factory
            .create_node(OBJECT_NODE, [40.0, 80.0], "JSON-Node", &FactoryArgs::new(object))
            .unwrap();
        assert_eq!(node.label, "JSON-Node");
        assert_eq!(node.position, [40.0, 80.0]);
        assert_eq!(node.outputs().len(), 1);
    }

    #[test]
    fn test_duplicate_key() {
        let mut factory = EntityFactory::with_builtins();
        let err = factory
            .register("boolean-pin", |args| value_pin(PinKind::Boolean, args))
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateFactory(key) if key == "boolean-pin"));

        assert!(factory.unregister("boolean-pin"));
        assert!(!factory.contains("boolean-pin"));
        factory.clear();
        assert_eq!(factory.keys().count(), 0);
    }

    #[test]
    fn test_type_mismatch() {
        let factory = EntityFactory::with_builtins();
        let err = factory
            .create_node("string-pin", [0.0, 0.0], "oops", &FactoryArgs::new("text"))
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::TypeMismatch { expected: EntityKind::Node, found: EntityKind::Pin, .. }
        ));

        let object = PinValue::Object(ObjectRef::new());
        let err = factory.create_pin(OBJECT_NODE, &FactoryArgs::new(object)).unwrap_err();
        assert!(matches!(err, GraphError::TypeMismatch { expected: EntityKind::Pin, .. }));
    }

    #[test]
    fn test_unknown_key_and_invalid_reference() {
        let factory = EntityFactory::with_builtins();
        assert!(matches!(
            factory.create_pin("vec3-pin", &FactoryArgs::new(1.0)),
            Err(GraphError::UnknownFactory(_))
        ));
        assert!(matches!(
            factory.create_pin("number-pin", &FactoryArgs::new(1.0).with_field("x")),
            Err(GraphError::InvalidPinDeclaration(_))
        ));
    }

    #[test]
    fn test_custom_kind() {
        let mut factory = EntityFactory::new();
        factory
            .register("vec3-pin", |args| value_pin(PinKind::Custom("vec3-pin".into()), args))
            .unwrap();
        let pin = factory.create_pin("vec3-pin", &FactoryArgs::new(0.0)).unwrap();
        assert_eq!(pin.type_tag(), "vec3-pin");
    }
}
