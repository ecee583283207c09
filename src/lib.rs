//! # bytecraft
//!
//! A library for byte-level parsing of binary records using declarative
//! schemas.
//!
//! Describe a record layout once (primitive fields with explicit width,
//! numeric kind, and endianness, nested composites, and arrays whose
//! length comes from a previously-decoded field), compile it into an
//! immutable [schema::Schema], then decode byte buffers into structured
//! [value::Value]s as many times as needed. A compiled schema is safely
//! shared across threads; each decode call owns its own cursor state.
//!
//! ## Example
//!
//! ```
//! use bytecraft::builder::SchemaBuilder;
//! use bytecraft::field::{Endianness, Field, LengthSpec, NumKind, Width};
//! use bytecraft::value::Value;
//!
//! let point = Field::composite("point", vec![
//!     Field::primitive("x", Width::W2, NumKind::Unsigned, Endianness::Little),
//!     Field::primitive("y", Width::W2, NumKind::Unsigned, Endianness::Little),
//! ]);
//! let schema = SchemaBuilder::new()
//!     .primitive("len", Width::W4, NumKind::Unsigned, Endianness::Little)?
//!     .array("points", point, LengthSpec::FieldRef("len".to_string()))?
//!     .build()?;
//!
//! let data = [0x01, 0x00, 0x00, 0x00, 0x7B, 0x00, 0xC8, 0x01];
//! let decoded = schema.decode(&data)?;
//! assert_eq!(decoded.consumed, 8);
//! assert_eq!(decoded.value.get("len"), Some(&Value::UInt(1)));
//! let points = decoded.value.get("points").unwrap().as_sequence().unwrap();
//! assert_eq!(points[0].as_record().unwrap().get("x"), Some(&Value::UInt(123)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod bytes;
pub mod compiled;
pub mod context;
pub mod errors;
pub mod field;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;
