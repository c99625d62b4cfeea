//! Typed shapes and the describer abstraction.
//!
//! A [`Shape`] turns one typed data definition into a JSON-Schema fragment
//! plus the named sub-schemas it references. The core never looks inside a
//! shape any other way.
//!
//! Two adapters are provided:
//!
//! - [`Schemars`] for any type deriving [`schemars::JsonSchema`];
//! - [`Provided`] for types implementing [`SchemaProvider`] by hand.
//!
//! ```ignore
//! use shapedoc_core::shape::{Schemars, Shape};
//!
//! #[derive(schemars::JsonSchema)]
//! struct Details { name: String, age: Option<u32> }
//!
//! let described = Schemars::<Details>::new().describe()?;
//! assert_eq!(described.schema["required"], serde_json::json!(["name"]));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{Map, Value};

/// Prefix of every `$ref` emitted into a document.
pub const REF_PREFIX: &str = "#/components/schemas/";

/// Locations where describers may nest their reusable sub-schemas.
const DEFINITION_POINTERS: [&str; 3] = ["/components/schemas", "/$defs", "/definitions"];

/// Error raised when a shape cannot be turned into a schema.
#[derive(Debug, Clone)]
pub struct DescribeError {
    pub shape: String,
    pub message: String,
}

impl DescribeError {
    pub fn new(shape: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DescribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to describe shape `{}`: {}", self.shape, self.message)
    }
}

impl std::error::Error for DescribeError {}

/// A schema fragment together with the named definitions it references.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescription {
    pub schema: Value,
    pub definitions: Map<String, Value>,
}

impl ShapeDescription {
    /// Split a root schema as produced by a JSON-Schema generator.
    ///
    /// Drops `$schema`, hoists nested definitions (under
    /// `components.schemas`, `$defs` or `definitions`) one level out, and
    /// rewrites local `$ref` pointers to the components location.
    pub fn from_root(shape: &str, root: Value) -> Result<Self, DescribeError> {
        let Value::Object(mut schema) = root else {
            return Err(DescribeError::new(shape, "root schema is not an object"));
        };
        schema.remove("$schema");

        let mut definitions = Map::new();
        for pointer in DEFINITION_POINTERS {
            if let Some(Value::Object(found)) = take_pointer(&mut schema, pointer) {
                definitions.extend(found);
            }
        }

        let mut schema = Value::Object(schema);
        let recursive = refers_to_root(&schema) || definitions.values().any(refers_to_root);
        rewrite_refs(&mut schema, shape);
        for definition in definitions.values_mut() {
            rewrite_refs(definition, shape);
        }
        // A self-referencing root must be addressable from the components.
        if recursive {
            definitions.insert(shape.to_string(), schema.clone());
        }

        Ok(Self { schema, definitions })
    }

    /// The documentation attached to the shape itself, if any.
    pub fn documentation(&self) -> Option<&str> {
        self.schema.get("description").and_then(Value::as_str)
    }

    /// Property schemas of an object shape, in declaration order.
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.schema.get("properties").and_then(Value::as_object)
    }
}

/// Remove the value at a `/`-separated pointer, pruning parents left empty.
fn take_pointer(root: &mut Map<String, Value>, pointer: &str) -> Option<Value> {
    let segments: Vec<&str> = pointer.trim_start_matches('/').split('/').collect();
    let (last, parents) = segments.split_last()?;

    if parents.is_empty() {
        return root.remove(*last);
    }

    let head = parents[0];
    let taken = {
        let mut current = root.get_mut(head)?.as_object_mut()?;
        for segment in &parents[1..] {
            current = current.get_mut(*segment)?.as_object_mut()?;
        }
        current.remove(*last)
    };

    if root
        .get(head)
        .and_then(Value::as_object)
        .is_some_and(|m| m.values().all(|v| v.as_object().is_some_and(Map::is_empty)))
    {
        root.remove(head);
    }
    taken
}

/// Whether `value` contains a `$ref` to the document root (`"#"`).
fn refers_to_root(value: &Value) -> bool {
    match value {
        Value::Object(obj) => {
            obj.get("$ref").and_then(Value::as_str) == Some("#")
                || obj.values().any(refers_to_root)
        }
        Value::Array(arr) => arr.iter().any(refers_to_root),
        _ => false,
    }
}

/// Recursively rewrite `$ref` paths to the OpenAPI components location.
///
/// A root self-reference `"#"` points at `root` in the components.
fn rewrite_refs(value: &mut Value, root: &str) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                if ref_str == "#" {
                    *ref_str = format!("{REF_PREFIX}{root}");
                } else {
                    for local in ["#/$defs/", "#/definitions/"] {
                        if let Some(name) = ref_str.strip_prefix(local) {
                            *ref_str = format!("{REF_PREFIX}{name}");
                            break;
                        }
                    }
                }
            }
            for (_, v) in obj.iter_mut() {
                rewrite_refs(v, root);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                rewrite_refs(v, root);
            }
        }
        _ => {}
    }
}

/// A typed data shape that can describe itself as JSON Schema.
///
/// Implementations must be deterministic and side-effect free.
pub trait Shape: Send + Sync + 'static {
    /// Name used in diagnostics (typically the type name).
    fn name(&self) -> Cow<'static, str>;

    /// Produce the schema fragment and its named definitions.
    fn describe(&self) -> Result<ShapeDescription, DescribeError>;
}

impl fmt::Debug for dyn Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shape").field(&self.name()).finish()
    }
}

/// Shared, type-erased handle to a shape.
pub type ShapeRef = Arc<dyn Shape>;

/// Adapter describing any [`JsonSchema`] type with OpenAPI 3.0 settings.
pub struct Schemars<T: ?Sized>(PhantomData<fn() -> T>);

impl<T: ?Sized> Schemars<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized> Default for Schemars<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: JsonSchema + ?Sized + 'static> Shape for Schemars<T> {
    fn name(&self) -> Cow<'static, str> {
        T::schema_name()
    }

    fn describe(&self) -> Result<ShapeDescription, DescribeError> {
        let generator = SchemaSettings::openapi3().into_generator();
        let root = generator.into_root_schema_for::<T>();
        let root = serde_json::to_value(&root)
            .map_err(|e| DescribeError::new(self.name(), e.to_string()))?;
        ShapeDescription::from_root(&self.name(), root)
    }
}

/// Trait for types that can provide their own JSON Schema.
///
/// Implement this when deriving [`JsonSchema`] is not an option.
pub trait SchemaProvider {
    /// The schema name (typically the type name, e.g. `"User"`).
    fn schema_name() -> &'static str;

    /// Return a JSON Schema representation of this type.
    ///
    /// Referenced sub-schemas may be nested under `definitions` or `$defs`.
    fn json_schema() -> Value;
}

/// Adapter describing a [`SchemaProvider`] type.
pub struct Provided<T: ?Sized>(PhantomData<fn() -> T>);

impl<T: ?Sized> Provided<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized> Default for Provided<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SchemaProvider + ?Sized + 'static> Shape for Provided<T> {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(T::schema_name())
    }

    fn describe(&self) -> Result<ShapeDescription, DescribeError> {
        ShapeDescription::from_root(T::schema_name(), T::json_schema())
    }
}

/// Shape handle for a [`JsonSchema`] type.
pub fn shape_of<T: JsonSchema + ?Sized + 'static>() -> ShapeRef {
    Arc::new(Schemars::<T>::new())
}

/// Shape handle for a [`SchemaProvider`] type.
pub fn provided_shape<T: SchemaProvider + ?Sized + 'static>() -> ShapeRef {
    Arc::new(Provided::<T>::new())
}
