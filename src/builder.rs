//! Incremental, order-preserving construction of schemas.
//!
//! The builder assembles one composite scope at a time and rejects
//! invalid declarations at the call site: duplicate names, dangling or
//! mistyped length references. `build` consumes the builder, so a
//! finalized schema can never be extended.
//!
//! Schemas are built once and decoded many times; front-loading the
//! validation here means the decode path only ever checks buffer
//! content, never schema shape.

use crate::{
    errors::CompileError,
    field::{Endianness, Field, FieldKind, LengthSpec, NumKind, Width},
    schema::Schema,
};

/// Builds one composite scope field by field.
///
/// # Example
///
/// ```
/// use bytecraft::builder::SchemaBuilder;
/// use bytecraft::field::{Endianness, Field, LengthSpec, NumKind, Width};
///
/// let schema = SchemaBuilder::new()
///     .primitive("count", Width::W4, NumKind::Unsigned, Endianness::Little)?
///     .array(
///         "items",
///         Field::primitive("item", Width::W2, NumKind::Unsigned, Endianness::Little),
///         LengthSpec::FieldRef("count".to_string()),
///     )?
///     .build()?;
/// assert_eq!(schema.fields().len(), 2);
/// # Ok::<(), bytecraft::errors::CompileError>(())
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a primitive field to the scope under construction.
    pub fn primitive(
        mut self,
        name: impl Into<String>,
        width: Width,
        kind: NumKind,
        endianness: Endianness,
    ) -> Result<Self, CompileError> {
        let name = name.into();
        self.check_new_name(&name)?;
        if kind == NumKind::Float && !matches!(width, Width::W4 | Width::W8) {
            return Err(CompileError::InvalidFloatWidth { name });
        }
        self.fields.push(Field::primitive(name, width, kind, endianness));
        Ok(self)
    }

    /// Appends an array field. A `FieldRef` length must name an integer
    /// primitive already declared in this scope.
    pub fn array(
        mut self,
        name: impl Into<String>,
        element: Field,
        length: LengthSpec,
    ) -> Result<Self, CompileError> {
        let name = name.into();
        self.check_new_name(&name)?;

        if let LengthSpec::FieldRef(reference) = &length {
            match self.fields.iter().find(|field| &field.name == reference) {
                None => {
                    return Err(CompileError::UnknownLengthField {
                        array: name,
                        reference: reference.clone(),
                    });
                }
                Some(field) if !is_integer_primitive(field) => {
                    return Err(CompileError::InvalidLengthType {
                        array: name,
                        reference: reference.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        self.fields.push(Field::array(name, element, length));
        Ok(self)
    }

    /// Appends a composite field whose children are declared in an
    /// independent sub-scope.
    pub fn nested(
        mut self,
        name: impl Into<String>,
        build: impl FnOnce(SchemaBuilder) -> Result<SchemaBuilder, CompileError>,
    ) -> Result<Self, CompileError> {
        let name = name.into();
        self.check_new_name(&name)?;

        let child = build(SchemaBuilder::new())?;
        if child.fields.is_empty() {
            return Err(CompileError::EmptyComposite { name });
        }

        self.fields.push(Field::composite(name, child.fields));
        Ok(self)
    }

    /// Finalizes the builder into an immutable [Schema]. Consumes the
    /// builder; the full compile validation runs once more over the
    /// assembled tree, including element scopes the per-call checks do
    /// not see.
    pub fn build(self) -> Result<Schema, CompileError> {
        Schema::compile(&self.fields)
    }

    fn check_new_name(&self, name: &str) -> Result<(), CompileError> {
        if name.is_empty() {
            return Err(CompileError::EmptyName);
        }
        if self.fields.iter().any(|field| field.name == name) {
            return Err(CompileError::DuplicateField {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

fn is_integer_primitive(field: &Field) -> bool {
    matches!(
        field.kind,
        FieldKind::Primitive {
            kind: NumKind::Unsigned | NumKind::Signed,
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_builder_rejects_duplicate_at_call_site() {
        let err = SchemaBuilder::new()
            .primitive("x", Width::W1, NumKind::Unsigned, Endianness::Little)
            .unwrap()
            .primitive("x", Width::W2, NumKind::Unsigned, Endianness::Little)
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::DuplicateField {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn test_builder_rejects_unknown_length_reference() {
        let err = SchemaBuilder::new()
            .array(
                "items",
                Field::primitive("item", Width::W2, NumKind::Unsigned, Endianness::Little),
                LengthSpec::FieldRef("count".to_string()),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownLengthField {
                array: "items".to_string(),
                reference: "count".to_string()
            }
        );
    }

    #[test]
    fn test_builder_rejects_float_length_reference() {
        let err = SchemaBuilder::new()
            .primitive("scale", Width::W4, NumKind::Float, Endianness::Little)
            .unwrap()
            .array(
                "items",
                Field::primitive("item", Width::W2, NumKind::Unsigned, Endianness::Little),
                LengthSpec::FieldRef("scale".to_string()),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidLengthType {
                array: "items".to_string(),
                reference: "scale".to_string()
            }
        );
    }

    #[test]
    fn test_builder_rejects_bad_float_width() {
        let err = SchemaBuilder::new()
            .primitive("half", Width::W2, NumKind::Float, Endianness::Little)
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidFloatWidth {
                name: "half".to_string()
            }
        );
    }

    #[test]
    fn test_builder_rejects_empty_nested_scope() {
        let err = SchemaBuilder::new()
            .nested("header", Ok)
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::EmptyComposite {
                name: "header".to_string()
            }
        );
    }

    #[test]
    fn test_nested_scopes_have_independent_names() {
        let schema = SchemaBuilder::new()
            .primitive("id", Width::W1, NumKind::Unsigned, Endianness::Little)
            .unwrap()
            .nested("inner", |b| {
                b.primitive("id", Width::W2, NumKind::Unsigned, Endianness::Big)
            })
            .unwrap()
            .build()
            .unwrap();

        let decoded = schema.decode(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(decoded.value.get("id"), Some(&Value::UInt(1)));
        let inner = decoded.value.get("inner").unwrap().as_record().unwrap();
        assert_eq!(inner.get("id"), Some(&Value::UInt(0x0203)));
    }

    #[test]
    fn test_nested_length_reference_resolves_in_sub_scope() {
        let schema = SchemaBuilder::new()
            .nested("body", |b| {
                b.primitive("count", Width::W1, NumKind::Unsigned, Endianness::Little)?
                    .array(
                        "items",
                        Field::primitive("item", Width::W1, NumKind::Unsigned, Endianness::Little),
                        LengthSpec::FieldRef("count".to_string()),
                    )
            })
            .unwrap()
            .build()
            .unwrap();

        let decoded = schema.decode(&[0x02, 0x0A, 0x0B]).unwrap();
        let body = decoded.value.get("body").unwrap().as_record().unwrap();
        assert_eq!(
            body.get("items"),
            Some(&Value::Sequence(vec![Value::UInt(10), Value::UInt(11)]))
        );
    }

    #[test]
    fn test_builder_matches_direct_compile() {
        let built = SchemaBuilder::new()
            .primitive("count", Width::W4, NumKind::Unsigned, Endianness::Little)
            .unwrap()
            .array(
                "items",
                Field::primitive("item", Width::W2, NumKind::Unsigned, Endianness::Little),
                LengthSpec::FieldRef("count".to_string()),
            )
            .unwrap()
            .build()
            .unwrap();

        let compiled = Schema::compile(&[
            Field::primitive("count", Width::W4, NumKind::Unsigned, Endianness::Little),
            Field::array(
                "items",
                Field::primitive("item", Width::W2, NumKind::Unsigned, Endianness::Little),
                LengthSpec::FieldRef("count".to_string()),
            ),
        ])
        .unwrap();

        let data = [0x01, 0x00, 0x00, 0x00, 0x2A, 0x00];
        assert_eq!(built.decode(&data).unwrap(), compiled.decode(&data).unwrap());
    }
}
