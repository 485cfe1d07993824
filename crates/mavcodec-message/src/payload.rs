//! Field codec: message values to and from a contiguous payload.
//!
//! Fields are laid out in wire order (see
//! [`MessageDefinition::wire_order`]) with every element little-endian and
//! no padding. Character arrays are fixed-size strings: truncated on a
//! character boundary or zero-padded on encode, cut at the first NUL on
//! decode.

use bytes::{Buf, BufMut};
use mavcodec_frame::MAX_PAYLOAD;
use mavcodec_schema::{FieldDefinition, FieldType, MessageDefinition};

use crate::error::{MessageError, Result};
use crate::value::{FieldValue, Fields};

#[derive(Debug, Clone, Copy)]
enum Scalar {
    Int(i64),
    UInt(u64),
    Float(f64),
}

/// Serialize `values` into a payload for `definition`.
///
/// Absent fields and missing trailing array elements are zero. Values not
/// named by the definition are ignored.
pub fn pack_payload(definition: &MessageDefinition, values: &Fields) -> Result<Vec<u8>> {
    let order = definition.wire_order()?;
    let size = definition.payload_size()?;
    if size > MAX_PAYLOAD {
        return Err(MessageError::PayloadTooLarge {
            message: definition.name.clone(),
            size,
            max: MAX_PAYLOAD,
        });
    }

    let mut payload = Vec::with_capacity(size);
    for field in order {
        let ty = field_type(definition, field)?;
        let writer = FieldWriter { definition, field, ty };
        match values.get(&field.name) {
            None => payload.put_bytes(0, ty.width() * field.element_count()),
            Some(value) => writer.write(&mut payload, value)?,
        }
    }

    debug_assert_eq!(payload.len(), size);
    Ok(payload)
}

/// Deserialize a payload for `definition`.
///
/// Bytes beyond the definition's size are ignored.
pub fn unpack_payload(definition: &MessageDefinition, payload: &[u8]) -> Result<Fields> {
    let order = definition.wire_order()?;
    let size = definition.payload_size()?;
    if payload.len() < size {
        return Err(MessageError::TruncatedPayload {
            message: definition.name.clone(),
            expected: size,
            actual: payload.len(),
        });
    }

    let mut src = &payload[..size];
    let mut fields = Fields::new();
    for field in order {
        let ty = field_type(definition, field)?;
        let value = read_field(&mut src, field, ty);
        fields.insert(field.name.clone(), value);
    }
    Ok(fields)
}

fn field_type(definition: &MessageDefinition, field: &FieldDefinition) -> Result<FieldType> {
    field
        .field_type()
        .ok_or_else(|| MessageError::UnsupportedFieldType {
            message: definition.name.clone(),
            field: field.name.clone(),
            type_name: field.type_name.clone(),
        })
}

struct FieldWriter<'a> {
    definition: &'a MessageDefinition,
    field: &'a FieldDefinition,
    ty: FieldType,
}

impl FieldWriter<'_> {
    fn write(&self, dst: &mut Vec<u8>, value: &FieldValue) -> Result<()> {
        if self.ty == FieldType::Char {
            return self.write_chars(dst, value);
        }

        if !self.field.is_array() {
            let scalar = match *value {
                FieldValue::Int(v) => Scalar::Int(v),
                FieldValue::UInt(v) => Scalar::UInt(v),
                FieldValue::Float(v) => Scalar::Float(v),
                _ => return Err(self.invalid("expected a number")),
            };
            return self.write_scalar(dst, scalar);
        }

        let elements: Vec<Scalar> = match value {
            FieldValue::UIntArray(items) => items.iter().map(|&v| Scalar::UInt(v)).collect(),
            FieldValue::IntArray(items) => items.iter().map(|&v| Scalar::Int(v)).collect(),
            FieldValue::FloatArray(items) => items.iter().map(|&v| Scalar::Float(v)).collect(),
            _ => return Err(self.invalid("expected an array of numbers")),
        };
        if elements.len() > self.field.array_length {
            return Err(self.invalid(&format!(
                "{} elements exceed array length {}",
                elements.len(),
                self.field.array_length
            )));
        }
        for element in &elements {
            self.write_scalar(dst, *element)?;
        }
        let missing = self.field.array_length - elements.len();
        dst.put_bytes(0, missing * self.ty.width());
        Ok(())
    }

    fn write_chars(&self, dst: &mut Vec<u8>, value: &FieldValue) -> Result<()> {
        let len = self.field.element_count();
        match value {
            FieldValue::Text(text) => {
                let bytes = text.as_bytes();
                let mut take = bytes.len().min(len);
                while !text.is_char_boundary(take) {
                    take -= 1;
                }
                dst.put_slice(&bytes[..take]);
                dst.put_bytes(0, len - take);
                Ok(())
            }
            // A single character given by its code.
            FieldValue::UInt(code) if !self.field.is_array() => {
                let byte = u8::try_from(*code).map_err(|_| self.invalid("char code out of range"))?;
                dst.put_u8(byte);
                Ok(())
            }
            _ => Err(self.invalid("expected text")),
        }
    }

    fn write_scalar(&self, dst: &mut Vec<u8>, value: Scalar) -> Result<()> {
        match self.ty {
            FieldType::Int8 => dst.put_i8(self.signed(value, i8::MIN.into(), i8::MAX.into())? as i8),
            FieldType::Int16 => {
                dst.put_i16_le(self.signed(value, i16::MIN.into(), i16::MAX.into())? as i16)
            }
            FieldType::Int32 => {
                dst.put_i32_le(self.signed(value, i32::MIN.into(), i32::MAX.into())? as i32)
            }
            FieldType::Int64 => dst.put_i64_le(self.signed(value, i64::MIN, i64::MAX)?),
            FieldType::UInt8 | FieldType::Char => {
                dst.put_u8(self.unsigned(value, u8::MAX.into())? as u8)
            }
            FieldType::UInt16 => dst.put_u16_le(self.unsigned(value, u16::MAX.into())? as u16),
            FieldType::UInt32 => dst.put_u32_le(self.unsigned(value, u32::MAX.into())? as u32),
            FieldType::UInt64 => dst.put_u64_le(self.unsigned(value, u64::MAX)?),
            FieldType::Float => dst.put_f32_le(float(value) as f32),
            FieldType::Double => dst.put_f64_le(float(value)),
        }
        Ok(())
    }

    fn signed(&self, value: Scalar, min: i64, max: i64) -> Result<i64> {
        let v = match value {
            Scalar::Int(v) => Some(v),
            Scalar::UInt(v) => i64::try_from(v).ok(),
            Scalar::Float(v) => integral(v).and_then(|v| i64::try_from(v).ok()),
        };
        v.filter(|v| (min..=max).contains(v))
            .ok_or_else(|| self.out_of_range(value))
    }

    fn unsigned(&self, value: Scalar, max: u64) -> Result<u64> {
        let v = match value {
            Scalar::UInt(v) => Some(v),
            Scalar::Int(v) => u64::try_from(v).ok(),
            Scalar::Float(v) => integral(v).and_then(|v| u64::try_from(v).ok()),
        };
        v.filter(|v| *v <= max)
            .ok_or_else(|| self.out_of_range(value))
    }

    fn out_of_range(&self, value: Scalar) -> MessageError {
        let shown = match value {
            Scalar::Int(v) => v.to_string(),
            Scalar::UInt(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
        };
        self.invalid(&format!("{shown} does not fit in {}", self.ty))
    }

    fn invalid(&self, reason: &str) -> MessageError {
        MessageError::InvalidValue {
            message: self.definition.name.clone(),
            field: self.field.name.clone(),
            reason: reason.to_string(),
        }
    }
}

fn float(value: Scalar) -> f64 {
    match value {
        Scalar::Int(v) => v as f64,
        Scalar::UInt(v) => v as f64,
        Scalar::Float(v) => v,
    }
}

/// Whole-number floats widened to i128 so both integer ranges can be checked.
fn integral(v: f64) -> Option<i128> {
    // 2^64 bounds; anything past them is out of range for every integer type.
    const LIMIT: f64 = 18_446_744_073_709_551_616.0;
    (v.is_finite() && v.fract() == 0.0 && v.abs() < LIMIT).then_some(v as i128)
}

fn read_field(src: &mut &[u8], field: &FieldDefinition, ty: FieldType) -> FieldValue {
    if ty == FieldType::Char {
        let len = field.element_count();
        let raw = &src[..len];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(len);
        let text = String::from_utf8_lossy(&raw[..end]).into_owned();
        src.advance(len);
        return FieldValue::Text(text);
    }

    if !field.is_array() {
        return match read_scalar(src, ty) {
            Scalar::Int(v) => FieldValue::Int(v),
            Scalar::UInt(v) => FieldValue::UInt(v),
            Scalar::Float(v) => FieldValue::Float(v),
        };
    }

    let count = field.array_length;
    if ty.is_float() {
        FieldValue::FloatArray((0..count).map(|_| float(read_scalar(src, ty))).collect())
    } else if ty.is_signed() {
        FieldValue::IntArray(
            (0..count)
                .map(|_| match read_scalar(src, ty) {
                    Scalar::Int(v) => v,
                    _ => 0,
                })
                .collect(),
        )
    } else {
        FieldValue::UIntArray(
            (0..count)
                .map(|_| match read_scalar(src, ty) {
                    Scalar::UInt(v) => v,
                    _ => 0,
                })
                .collect(),
        )
    }
}

// Callers guarantee `src` holds the whole field.
fn read_scalar(src: &mut &[u8], ty: FieldType) -> Scalar {
    match ty {
        FieldType::Int8 => Scalar::Int(src.get_i8().into()),
        FieldType::Int16 => Scalar::Int(src.get_i16_le().into()),
        FieldType::Int32 => Scalar::Int(src.get_i32_le().into()),
        FieldType::Int64 => Scalar::Int(src.get_i64_le()),
        FieldType::UInt8 | FieldType::Char => Scalar::UInt(src.get_u8().into()),
        FieldType::UInt16 => Scalar::UInt(src.get_u16_le().into()),
        FieldType::UInt32 => Scalar::UInt(src.get_u32_le().into()),
        FieldType::UInt64 => Scalar::UInt(src.get_u64_le()),
        FieldType::Float => Scalar::Float(src.get_f32_le().into()),
        FieldType::Double => Scalar::Float(src.get_f64_le()),
    }
}
