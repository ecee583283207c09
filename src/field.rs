//! Definition of logical fields used to build a [crate::schema::Schema].

/// A single named field in a schema: a primitive, a nested composite,
/// or a length-driven array.
#[derive(Debug, Clone)]
pub struct Field {
    /// Name used as the key in the decoded record.
    pub name: String,
    /// What the field contains and how it is laid out.
    pub kind: FieldKind,
}

impl Field {
    /// Primitive field with explicit width, numeric kind, and endianness.
    pub fn primitive(
        name: impl Into<String>,
        width: Width,
        kind: NumKind,
        endianness: Endianness,
    ) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Primitive {
                width,
                kind,
                endianness,
            },
        }
    }

    /// Composite field whose children decode in order into a nested record.
    pub fn composite(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Composite { fields },
        }
    }

    /// Array field repeating `element` according to `length`.
    pub fn array(name: impl Into<String>, element: Field, length: LengthSpec) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Array {
                element: Box::new(element),
                length,
            },
        }
    }
}

/// Distinguishes primitive fields from composites and arrays.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Fixed-width numeric value.
    Primitive {
        width: Width,
        kind: NumKind,
        endianness: Endianness,
    },
    /// Ordered children forming an independent name scope.
    Composite { fields: Vec<Field> },
    /// Repeated element; count is literal or read from a sibling field.
    Array {
        element: Box<Field>,
        length: LengthSpec,
    },
}

/// Width of a primitive field in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W1,
    W2,
    W4,
    W8,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::W1 => 1,
            Width::W2 => 2,
            Width::W4 => 4,
            Width::W8 => 8,
        }
    }
}

/// Numeric interpretation of a primitive field's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumKind {
    /// Zero-extended unsigned integer.
    Unsigned,
    /// Two's-complement signed integer.
    Signed,
    /// IEEE-754 float; width must be 4 or 8 bytes.
    Float,
}

/// Byte order of a primitive field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Number of elements in an array field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthSpec {
    /// Known at build time.
    Literal(usize),
    /// Read at decode time from a previously-decoded integer sibling.
    FieldRef(String),
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldDef> for Field {
    fn from(value: crate::serde::FieldDef) -> Self {
        Field {
            name: value.name,
            kind: value.kind.into(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldKindDef> for FieldKind {
    fn from(value: crate::serde::FieldKindDef) -> Self {
        match value {
            crate::serde::FieldKindDef::Primitive {
                width,
                kind,
                endianness,
            } => FieldKind::Primitive {
                width: width.into(),
                kind: kind.into(),
                endianness: endianness.into(),
            },
            crate::serde::FieldKindDef::Composite { fields } => FieldKind::Composite {
                fields: fields.into_iter().map(Into::into).collect(),
            },
            crate::serde::FieldKindDef::Array { element, length } => FieldKind::Array {
                element: Box::new((*element).into()),
                length: length.into(),
            },
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::WidthDef> for Width {
    fn from(value: crate::serde::WidthDef) -> Self {
        match value {
            crate::serde::WidthDef::W1 => Width::W1,
            crate::serde::WidthDef::W2 => Width::W2,
            crate::serde::WidthDef::W4 => Width::W4,
            crate::serde::WidthDef::W8 => Width::W8,
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::NumKindDef> for NumKind {
    fn from(value: crate::serde::NumKindDef) -> Self {
        match value {
            crate::serde::NumKindDef::Unsigned => NumKind::Unsigned,
            crate::serde::NumKindDef::Signed => NumKind::Signed,
            crate::serde::NumKindDef::Float => NumKind::Float,
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::EndiannessDef> for Endianness {
    fn from(value: crate::serde::EndiannessDef) -> Self {
        match value {
            crate::serde::EndiannessDef::Little => Endianness::Little,
            crate::serde::EndiannessDef::Big => Endianness::Big,
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::LengthSpecDef> for LengthSpec {
    fn from(value: crate::serde::LengthSpecDef) -> Self {
        match value {
            crate::serde::LengthSpecDef::Literal(count) => LengthSpec::Literal(count),
            crate::serde::LengthSpecDef::FieldRef(name) => LengthSpec::FieldRef(name),
        }
    }
}
