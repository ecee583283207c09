//! Schema: compiled field tree used to decode byte buffers into records.

use crate::{
    compiled::{self, CompiledField},
    context::DecodeContext,
    errors::{CompileError, DecodeError, EncodeError},
    field::Field,
    value::Record,
};

/// A compiled schema: the frozen root scope of a record layout.
///
/// Build one with [Schema::compile] or through
/// [crate::builder::SchemaBuilder], then call [Schema::decode] many
/// times. The tree is immutable after compilation, so one schema can
/// serve any number of concurrent decode calls.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<CompiledField>,
}

/// Result of a successful decode: the root record plus the number of
/// bytes the schema consumed. Buffers may be longer than the schema
/// needs; trailing bytes are not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: Record,
    pub consumed: usize,
}

impl Schema {
    /// Compiles a slice of [Field]s into a schema. Fails if any field is
    /// invalid; no partially-valid schema is ever returned.
    pub fn compile(fields: &[Field]) -> Result<Self, CompileError> {
        Ok(Self {
            fields: compiled::compile_scope(fields)?,
        })
    }

    /// Shorthand for [crate::builder::SchemaBuilder::new].
    pub fn builder() -> crate::builder::SchemaBuilder {
        crate::builder::SchemaBuilder::new()
    }

    /// Compiled fields of the root scope, in declaration order.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    /// Converts a deserialized [crate::serde::SchemaDef] and compiles it.
    #[cfg(feature = "serde")]
    pub fn from_def(def: crate::serde::SchemaDef) -> Result<Self, CompileError> {
        let fields: Vec<Field> = def.fields.into_iter().map(Into::into).collect();
        Self::compile(&fields)
    }

    /// Decodes `data` against this schema. Depth-first, single pass, no
    /// backtracking; any failure aborts the whole decode and no partial
    /// record is returned.
    pub fn decode(&self, data: &[u8]) -> Result<Decoded, DecodeError> {
        let mut ctx = DecodeContext::new(data);
        let mut record = Record::with_capacity(self.fields.len());

        for field in &self.fields {
            let value = field.decode(&mut ctx, &record)?;
            record.insert(field.name.clone(), value);
        }

        Ok(Decoded {
            value: record,
            consumed: ctx.offset(),
        })
    }

    /// Encodes `record` into bytes laid out exactly as this schema
    /// decodes them. Array lengths must agree with their literal count
    /// or with the referenced sibling's value.
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        for field in &self.fields {
            field.encode(&mut out, record)?;
        }
        Ok(out)
    }
}
