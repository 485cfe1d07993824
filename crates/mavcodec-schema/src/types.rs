//! Scalar type table.

use std::fmt;

/// Scalar wire types a field can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    Char,
}

impl FieldType {
    /// Resolve a dialect type name.
    ///
    /// Accepts the `uint8_t_mavlink_version` alias used by `HEARTBEAT`.
    /// Array suffixes are not accepted here; see [`parse_type_spec`].
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "int8_t" => FieldType::Int8,
            "uint8_t" | "uint8_t_mavlink_version" => FieldType::UInt8,
            "int16_t" => FieldType::Int16,
            "uint16_t" => FieldType::UInt16,
            "int32_t" => FieldType::Int32,
            "uint32_t" => FieldType::UInt32,
            "int64_t" => FieldType::Int64,
            "uint64_t" => FieldType::UInt64,
            "float" => FieldType::Float,
            "double" => FieldType::Double,
            "char" => FieldType::Char,
            _ => return None,
        };
        Some(ty)
    }

    /// Canonical dialect name, as folded into the CRC extra.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Int8 => "int8_t",
            FieldType::UInt8 => "uint8_t",
            FieldType::Int16 => "int16_t",
            FieldType::UInt16 => "uint16_t",
            FieldType::Int32 => "int32_t",
            FieldType::UInt32 => "uint32_t",
            FieldType::Int64 => "int64_t",
            FieldType::UInt64 => "uint64_t",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Char => "char",
        }
    }

    /// Width of one element in bytes.
    pub fn width(self) -> usize {
        match self {
            FieldType::Int8 | FieldType::UInt8 | FieldType::Char => 1,
            FieldType::Int16 | FieldType::UInt16 => 2,
            FieldType::Int32 | FieldType::UInt32 | FieldType::Float => 4,
            FieldType::Int64 | FieldType::UInt64 | FieldType::Double => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            FieldType::Int8 | FieldType::Int16 | FieldType::Int32 | FieldType::Int64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, FieldType::Float | FieldType::Double)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Width in bytes of a scalar type name, if it is in the table.
pub fn type_width(name: &str) -> Option<usize> {
    FieldType::from_name(name).map(FieldType::width)
}

/// Total size of a scalar (`array_length == 0`) or fixed-array field.
///
/// `None` for an unknown type or a size that overflows `usize`.
pub fn field_size(name: &str, array_length: usize) -> Option<usize> {
    type_width(name).and_then(|width| width.checked_mul(array_length.max(1)))
}

/// Split `uint16_t[4]` into `("uint16_t", Some(4))`.
///
/// Returns `None` for a malformed suffix such as `char[]` or `char[x]`.
pub fn parse_type_spec(spec: &str) -> Option<(&str, Option<usize>)> {
    let spec = spec.trim();
    match spec.split_once('[') {
        None => Some((spec, None)),
        Some((base, rest)) => {
            let len = rest.strip_suffix(']')?.trim().parse::<usize>().ok()?;
            Some((base.trim(), Some(len)))
        }
    }
}
