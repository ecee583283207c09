//! Compiled, validated form of a field tree.
//!
//! [crate::schema::Schema::compile] turns definition-form
//! [Field]s into this frozen representation once, so the decode path
//! never re-validates schema shape. Invalid combinations (float widths,
//! arrays of arrays, dangling length references) are unrepresentable
//! here; decode only ever checks buffer content.

use std::collections::HashMap;

use crate::{
    bytes,
    context::DecodeContext,
    errors::{CompileError, DecodeError, EncodeError},
    field::{Endianness, Field, FieldKind, LengthSpec, NumKind, Width},
    value::{Record, Value},
};

#[derive(Debug, Clone)]
pub struct CompiledField {
    pub name: String,
    pub kind: CompiledFieldKind,
}

#[derive(Debug, Clone)]
pub enum CompiledFieldKind {
    Primitive(CompiledPrimitive),
    Composite(CompiledComposite),
    Array(CompiledArray),
}

#[derive(Debug, Clone, Copy)]
pub struct CompiledPrimitive {
    pub scalar: ScalarKind,
    pub endianness: Endianness,
}

/// Width and numeric kind flattened into one dispatch code, with the
/// float-width restriction already enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Unsigned(Width),
    Signed(Width),
    F32,
    F64,
}

impl ScalarKind {
    fn new(width: Width, kind: NumKind) -> Option<ScalarKind> {
        match kind {
            NumKind::Unsigned => Some(ScalarKind::Unsigned(width)),
            NumKind::Signed => Some(ScalarKind::Signed(width)),
            NumKind::Float => match width {
                Width::W4 => Some(ScalarKind::F32),
                Width::W8 => Some(ScalarKind::F64),
                _ => None,
            },
        }
    }

    pub fn width_bytes(self) -> usize {
        match self {
            ScalarKind::Unsigned(width) | ScalarKind::Signed(width) => width.bytes(),
            ScalarKind::F32 => 4,
            ScalarKind::F64 => 8,
        }
    }

    fn is_integer(self) -> bool {
        matches!(self, ScalarKind::Unsigned(_) | ScalarKind::Signed(_))
    }
}

#[derive(Debug, Clone)]
pub struct CompiledComposite {
    pub fields: Vec<CompiledField>,
}

#[derive(Debug, Clone)]
pub struct CompiledArray {
    pub element: CompiledElement,
    pub count: ArrayCount,
}

/// Array elements are primitives or composites; arrays of arrays are
/// rejected at compile time.
#[derive(Debug, Clone)]
pub enum CompiledElement {
    Primitive(CompiledPrimitive),
    Composite(CompiledComposite),
}

/// Number of elements in an array field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayCount {
    /// Known at build time.
    Fixed(usize),
    /// Read at decode time from an integer field decoded earlier in the
    /// same scope.
    FieldRef(String),
}

/// Compiles one composite scope, checking name uniqueness and length
/// references against the fields declared so far.
pub(crate) fn compile_scope(fields: &[Field]) -> Result<Vec<CompiledField>, CompileError> {
    let mut compiled = Vec::with_capacity(fields.len());
    // name -> whether the field is an integer primitive
    let mut declared: HashMap<&str, bool> = HashMap::new();

    for field in fields {
        if field.name.is_empty() {
            return Err(CompileError::EmptyName);
        }
        if declared.contains_key(field.name.as_str()) {
            return Err(CompileError::DuplicateField {
                name: field.name.clone(),
            });
        }

        let kind = compile_kind(field, &declared)?;
        let is_integer = matches!(
            &kind,
            CompiledFieldKind::Primitive(p) if p.scalar.is_integer()
        );
        declared.insert(field.name.as_str(), is_integer);
        compiled.push(CompiledField {
            name: field.name.clone(),
            kind,
        });
    }

    Ok(compiled)
}

fn compile_kind(
    field: &Field,
    declared: &HashMap<&str, bool>,
) -> Result<CompiledFieldKind, CompileError> {
    match &field.kind {
        FieldKind::Primitive {
            width,
            kind,
            endianness,
        } => {
            let scalar =
                ScalarKind::new(*width, *kind).ok_or_else(|| CompileError::InvalidFloatWidth {
                    name: field.name.clone(),
                })?;
            Ok(CompiledFieldKind::Primitive(CompiledPrimitive {
                scalar,
                endianness: *endianness,
            }))
        }
        FieldKind::Composite { fields } => {
            if fields.is_empty() {
                return Err(CompileError::EmptyComposite {
                    name: field.name.clone(),
                });
            }
            Ok(CompiledFieldKind::Composite(CompiledComposite {
                fields: compile_scope(fields)?,
            }))
        }
        FieldKind::Array { element, length } => {
            let count = match length {
                LengthSpec::Literal(count) => ArrayCount::Fixed(*count),
                LengthSpec::FieldRef(reference) => match declared.get(reference.as_str()) {
                    None => {
                        return Err(CompileError::UnknownLengthField {
                            array: field.name.clone(),
                            reference: reference.clone(),
                        });
                    }
                    Some(false) => {
                        return Err(CompileError::InvalidLengthType {
                            array: field.name.clone(),
                            reference: reference.clone(),
                        });
                    }
                    Some(true) => ArrayCount::FieldRef(reference.clone()),
                },
            };

            // Element scopes are independent; nothing from the enclosing
            // scope is visible inside them.
            let element = match compile_kind(element, &HashMap::new())? {
                CompiledFieldKind::Primitive(primitive) => CompiledElement::Primitive(primitive),
                CompiledFieldKind::Composite(composite) => CompiledElement::Composite(composite),
                CompiledFieldKind::Array(_) => {
                    return Err(CompileError::InvalidArrayElement {
                        array: field.name.clone(),
                    });
                }
            };

            Ok(CompiledFieldKind::Array(CompiledArray { element, count }))
        }
    }
}

impl CompiledField {
    pub(crate) fn decode(
        &self,
        ctx: &mut DecodeContext<'_>,
        scope: &Record,
    ) -> Result<Value, DecodeError> {
        let value = match &self.kind {
            CompiledFieldKind::Primitive(primitive) => primitive.decode(ctx),
            CompiledFieldKind::Composite(composite) => composite.decode(ctx),
            CompiledFieldKind::Array(array) => array.decode(ctx, scope),
        };
        value.map_err(|e| e.under(&self.name))
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>, scope: &Record) -> Result<(), EncodeError> {
        let value = scope.get(&self.name).ok_or_else(|| EncodeError::MissingField {
            path: self.name.clone(),
        })?;
        let result = match &self.kind {
            CompiledFieldKind::Primitive(primitive) => primitive.encode(out, value),
            CompiledFieldKind::Composite(composite) => composite.encode(out, value),
            CompiledFieldKind::Array(array) => array.encode(out, value, scope),
        };
        result.map_err(|e| e.under(&self.name))
    }
}

impl CompiledPrimitive {
    fn decode(&self, ctx: &mut DecodeContext<'_>) -> Result<Value, DecodeError> {
        Ok(match self.scalar {
            ScalarKind::Unsigned(width) => Value::UInt(ctx.read_unsigned(width, self.endianness)?),
            ScalarKind::Signed(width) => Value::Int(ctx.read_signed(width, self.endianness)?),
            ScalarKind::F32 => Value::Float(f64::from(ctx.read_f32(self.endianness)?)),
            ScalarKind::F64 => Value::Float(ctx.read_f64(self.endianness)?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>, value: &Value) -> Result<(), EncodeError> {
        let mismatch = || EncodeError::ValueMismatch {
            path: String::new(),
        };
        let out_of_range = || EncodeError::ValueOutOfRange {
            path: String::new(),
        };

        match self.scalar {
            ScalarKind::Unsigned(width) => {
                let v = value.as_uint().ok_or_else(mismatch)?;
                if !fits_unsigned(v, width) {
                    return Err(out_of_range());
                }
                bytes::write_unsigned(out, v, width, self.endianness);
            }
            ScalarKind::Signed(width) => {
                let v = value.as_int().ok_or_else(mismatch)?;
                if !fits_signed(v, width) {
                    return Err(out_of_range());
                }
                bytes::write_unsigned(out, v as u64, width, self.endianness);
            }
            ScalarKind::F32 => {
                let v = value.as_float().ok_or_else(mismatch)?;
                bytes::write_f32(out, v as f32, self.endianness);
            }
            ScalarKind::F64 => {
                let v = value.as_float().ok_or_else(mismatch)?;
                bytes::write_f64(out, v, self.endianness);
            }
        }
        Ok(())
    }
}

impl CompiledComposite {
    fn decode(&self, ctx: &mut DecodeContext<'_>) -> Result<Value, DecodeError> {
        let mut record = Record::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = field.decode(ctx, &record)?;
            record.insert(field.name.clone(), value);
        }
        Ok(Value::Record(record))
    }

    fn encode(&self, out: &mut Vec<u8>, value: &Value) -> Result<(), EncodeError> {
        let record = value.as_record().ok_or_else(|| EncodeError::ValueMismatch {
            path: String::new(),
        })?;
        for field in &self.fields {
            field.encode(out, record)?;
        }
        Ok(())
    }
}

impl CompiledArray {
    fn decode(&self, ctx: &mut DecodeContext<'_>, scope: &Record) -> Result<Value, DecodeError> {
        let count = self.resolve_count(scope)?;

        // Counts beyond the remaining byte count are rejected before
        // any element is allocated or decoded.
        let remaining = ctx.remaining();
        if count > remaining as u64 {
            return Err(DecodeError::LengthExceedsBuffer {
                path: String::new(),
                count,
                available: remaining,
            });
        }

        let count = count as usize;
        let mut values = Vec::with_capacity(count);
        for index in 0..count {
            let value = self
                .element
                .decode(ctx)
                .map_err(|e| e.under(&format!("[{index}]")))?;
            values.push(value);
        }
        Ok(Value::Sequence(values))
    }

    fn resolve_count(&self, scope: &Record) -> Result<u64, DecodeError> {
        match &self.count {
            ArrayCount::Fixed(count) => Ok(*count as u64),
            ArrayCount::FieldRef(reference) => match scope.get(reference) {
                Some(Value::UInt(v)) => Ok(*v),
                Some(Value::Int(v)) if *v >= 0 => Ok(*v as u64),
                Some(Value::Int(v)) => Err(DecodeError::NegativeLength {
                    path: String::new(),
                    reference: reference.clone(),
                    value: *v,
                }),
                // Compilation guarantees the reference is an integer
                // decoded earlier in this scope; anything else is the
                // same invariant violation as a missing value.
                None | Some(_) => Err(DecodeError::LengthFieldNotYetDecoded {
                    path: String::new(),
                    reference: reference.clone(),
                }),
            },
        }
    }

    fn encode(&self, out: &mut Vec<u8>, value: &Value, scope: &Record) -> Result<(), EncodeError> {
        let values = value.as_sequence().ok_or_else(|| EncodeError::ValueMismatch {
            path: String::new(),
        })?;

        let expected = match &self.count {
            ArrayCount::Fixed(count) => *count,
            ArrayCount::FieldRef(reference) => match scope.get(reference) {
                Some(Value::UInt(v)) => *v as usize,
                Some(Value::Int(v)) if *v >= 0 => *v as usize,
                _ => {
                    return Err(EncodeError::MissingField {
                        path: reference.clone(),
                    });
                }
            },
        };
        if values.len() != expected {
            return Err(EncodeError::LengthMismatch {
                path: String::new(),
                expected,
                actual: values.len(),
            });
        }

        for (index, value) in values.iter().enumerate() {
            self.element
                .encode(out, value)
                .map_err(|e| e.under(&format!("[{index}]")))?;
        }
        Ok(())
    }
}

impl CompiledElement {
    fn decode(&self, ctx: &mut DecodeContext<'_>) -> Result<Value, DecodeError> {
        match self {
            CompiledElement::Primitive(primitive) => primitive.decode(ctx),
            CompiledElement::Composite(composite) => composite.decode(ctx),
        }
    }

    fn encode(&self, out: &mut Vec<u8>, value: &Value) -> Result<(), EncodeError> {
        match self {
            CompiledElement::Primitive(primitive) => primitive.encode(out, value),
            CompiledElement::Composite(composite) => composite.encode(out, value),
        }
    }
}

fn fits_unsigned(value: u64, width: Width) -> bool {
    width.bytes() == 8 || value >> (8 * width.bytes()) == 0
}

fn fits_signed(value: i64, width: Width) -> bool {
    if width.bytes() == 8 {
        return true;
    }
    let bits = 8 * width.bytes() as u32;
    let max = (1i64 << (bits - 1)) - 1;
    let min = -(1i64 << (bits - 1));
    (min..=max).contains(&value)
}
