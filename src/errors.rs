//! Error types for schema compilation, decoding, and encoding.

use thiserror::Error;

/// Errors produced when compiling [crate::field::Field]s into a
/// [crate::schema::Schema].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Field name is empty.
    #[error("field name is empty")]
    EmptyName,
    /// Field name already used in the same composite scope.
    #[error("duplicate field name {name:?}")]
    DuplicateField { name: String },
    /// Array length refers to a name not declared earlier in the same scope.
    #[error("array {array:?} references unknown length field {reference:?}")]
    UnknownLengthField { array: String, reference: String },
    /// Array length refers to a field that is not an integer primitive.
    #[error("array {array:?} length field {reference:?} is not an integer")]
    InvalidLengthType { array: String, reference: String },
    /// Float fields must be 4 or 8 bytes wide.
    #[error("float field {name:?} must be 4 or 8 bytes wide")]
    InvalidFloatWidth { name: String },
    /// Composite has no child fields.
    #[error("composite {name:?} has no fields")]
    EmptyComposite { name: String },
    /// Array element must be a primitive or a composite, not another array.
    #[error("array {array:?} element must be a primitive or a composite")]
    InvalidArrayElement { array: String },
}

/// Raw bounds failure from [crate::bytes]; the decode engine attaches
/// the field path and surfaces it as [DecodeError::TruncatedInput].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("need {needed} bytes at offset {offset}, {available} available")]
pub struct OutOfBounds {
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}

/// Errors produced when decoding a buffer against a compiled schema.
///
/// Every variant carries the `/`-joined path of the field being decoded
/// (array elements appear as `name[index]`) so malformed input can be
/// diagnosed without re-running the decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Buffer is shorter than the schema demands at `offset`.
    #[error("truncated input at {path}: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedInput {
        path: String,
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// Declared element count cannot fit in the remaining buffer.
    #[error("array {path}: {count} elements exceed {available} remaining bytes")]
    LengthExceedsBuffer {
        path: String,
        count: u64,
        available: usize,
    },
    /// Length reference resolved to nothing decoded yet. Compilation
    /// orders references before their arrays, so this is a defensive
    /// invariant check.
    #[error("array {path}: length field {reference:?} not decoded yet")]
    LengthFieldNotYetDecoded { path: String, reference: String },
    /// Signed length field decoded to a negative value.
    #[error("array {path}: length field {reference:?} is negative ({value})")]
    NegativeLength {
        path: String,
        reference: String,
        value: i64,
    },
}

impl DecodeError {
    /// Prefixes the error path with an enclosing field name or an
    /// `[index]` segment while the error unwinds out of the decode.
    pub(crate) fn under(mut self, segment: &str) -> Self {
        let path = match &mut self {
            DecodeError::TruncatedInput { path, .. }
            | DecodeError::LengthExceedsBuffer { path, .. }
            | DecodeError::LengthFieldNotYetDecoded { path, .. }
            | DecodeError::NegativeLength { path, .. } => path,
        };
        *path = join_path(segment, path);
        self
    }
}

impl From<OutOfBounds> for DecodeError {
    fn from(raw: OutOfBounds) -> Self {
        DecodeError::TruncatedInput {
            path: String::new(),
            offset: raw.offset,
            needed: raw.needed,
            available: raw.available,
        }
    }
}

/// Errors produced when encoding a record against a compiled schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Record has no value under a schema field name.
    #[error("missing field {path}")]
    MissingField { path: String },
    /// Value variant does not match the field kind.
    #[error("value for {path} does not match the field kind")]
    ValueMismatch { path: String },
    /// Integer value does not fit the field width.
    #[error("value for {path} does not fit the field width")]
    ValueOutOfRange { path: String },
    /// Sequence length disagrees with the declared or referenced count.
    #[error("array {path}: expected {expected} elements, got {actual}")]
    LengthMismatch {
        path: String,
        expected: usize,
        actual: usize,
    },
}

impl EncodeError {
    pub(crate) fn under(mut self, segment: &str) -> Self {
        let path = match &mut self {
            EncodeError::MissingField { path }
            | EncodeError::ValueMismatch { path }
            | EncodeError::ValueOutOfRange { path }
            | EncodeError::LengthMismatch { path, .. } => path,
        };
        *path = join_path(segment, path);
        self
    }
}

fn join_path(segment: &str, rest: &str) -> String {
    if rest.is_empty() {
        segment.to_string()
    } else if rest.starts_with('[') {
        format!("{segment}{rest}")
    } else {
        format!("{segment}/{rest}")
    }
}
