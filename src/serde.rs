//! JSON-deserializable schema description.
//!
//! These types describe the *shape* of the binary data to be decoded.
//! They are intended to be constructed from JSON (for example a schema
//! file shipped with your application) and then compiled into core
//! `bytecraft` types via [crate::schema::Schema::from_def].

use serde::{Deserialize, Serialize};

/// Top-level schema definition consisting of a list of fields.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchemaDef {
    /// All fields of the root scope, in decode order.
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Field name; becomes the key in the decoded record.
    pub name: String,
    /// Whether this is a primitive, composite, or array field.
    pub kind: FieldKindDef,
}

/// Kind of field in the schema.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum FieldKindDef {
    /// Fixed-width numeric value.
    Primitive {
        width: WidthDef,
        kind: NumKindDef,
        #[serde(default)]
        endianness: EndiannessDef,
    },
    /// Ordered children forming an independent name scope.
    Composite { fields: Vec<FieldDef> },
    /// Repeated element with a literal or referenced count.
    Array {
        element: Box<FieldDef>,
        length: LengthSpecDef,
    },
}

/// Width of a primitive field in bytes.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub enum WidthDef {
    W1,
    W2,
    W4,
    W8,
}

/// Numeric interpretation of a primitive field.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub enum NumKindDef {
    Unsigned,
    Signed,
    Float,
}

/// Byte order of a primitive field; defaults to little-endian.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub enum EndiannessDef {
    #[default]
    Little,
    Big,
}

/// Number of elements in an array field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub enum LengthSpecDef {
    /// Known count.
    Literal(usize),
    /// Name of a previously-declared integer sibling.
    FieldRef(String),
}
