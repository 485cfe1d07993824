use std::cmp::Reverse;
use std::collections::HashSet;

use mavcodec_frame::{Crc16, MAX_MESSAGE_ID, MAX_PAYLOAD};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::types::FieldType;

/// One field of a message as declared by the dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    /// Scalar type name as declared, e.g. `uint16_t`.
    pub type_name: String,
    /// Fixed array length; zero for scalars.
    pub array_length: usize,
    /// Associated enum. Informational only; values are not checked.
    pub enum_name: Option<String>,
}

impl FieldDefinition {
    /// A scalar field.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            array_length: 0,
            enum_name: None,
        }
    }

    /// A fixed-length array field. For `char` this is a fixed-size string.
    pub fn array(name: impl Into<String>, type_name: impl Into<String>, length: usize) -> Self {
        Self {
            array_length: length,
            ..Self::new(name, type_name)
        }
    }

    pub fn with_enum(self, enum_name: impl Into<String>) -> Self {
        Self {
            enum_name: Some(enum_name.into()),
            ..self
        }
    }

    /// Scalar type, if the type name is in the table.
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_name(&self.type_name)
    }

    pub fn is_array(&self) -> bool {
        self.array_length > 0
    }

    /// Number of elements on the wire (1 for scalars).
    pub fn element_count(&self) -> usize {
        self.array_length.max(1)
    }

    /// Total bytes on the wire. `None` for an unknown type or a length
    /// whose size does not fit in `usize`.
    pub fn size(&self) -> Option<usize> {
        self.field_type()
            .and_then(|ty| ty.width().checked_mul(self.element_count()))
    }
}

/// Immutable layout of one message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinition {
    /// 24-bit message id.
    pub id: u32,
    /// Human-readable name; used for lookup only, never sent.
    pub name: String,
    /// Seed byte folded into every frame checksum of this message.
    pub crc_extra: u8,
    /// Fields in declaration order.
    pub fields: Vec<FieldDefinition>,
}

impl MessageDefinition {
    /// Create a definition, computing the CRC extra from the layout.
    pub fn new(id: u32, name: impl Into<String>, fields: Vec<FieldDefinition>) -> Result<Self> {
        let name = name.into();
        let crc_extra = compute_crc_extra(&name, &fields)?;
        Ok(Self {
            id,
            name,
            crc_extra,
            fields,
        })
    }

    /// Create a definition with a precomputed CRC extra.
    pub fn with_crc_extra(
        id: u32,
        name: impl Into<String>,
        crc_extra: u8,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            crc_extra,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields in wire order.
    ///
    /// MAVLink sends fields grouped by element width, 8-byte types first,
    /// then 4, 2 and 1. Declaration order is kept inside each group. Arrays
    /// sort by their element width, not their total size.
    pub fn wire_order(&self) -> Result<Vec<&FieldDefinition>> {
        wire_order(&self.name, &self.fields)
    }

    /// Payload size in bytes: the sum of all field sizes.
    pub fn payload_size(&self) -> Result<usize> {
        self.fields.iter().try_fold(0usize, |total, field| {
            let ty = field
                .field_type()
                .ok_or_else(|| unsupported(&self.name, field))?;
            ty.width()
                .checked_mul(field.element_count())
                .and_then(|size| total.checked_add(size))
                .ok_or_else(|| {
                    self.invalid(format!("field {} overflows the payload size", field.name))
                })
        })
    }

    /// Check the structural rules a definition must satisfy to be encodable.
    pub fn validate(&self) -> Result<()> {
        self.validate_structure()?;
        let size = self.payload_size()?;
        if size > MAX_PAYLOAD {
            return Err(self.invalid(format!(
                "payload of {size} bytes exceeds {MAX_PAYLOAD}"
            )));
        }
        Ok(())
    }

    /// Rules that hold regardless of whether the field types are known.
    pub(crate) fn validate_structure(&self) -> Result<()> {
        if self.id > MAX_MESSAGE_ID {
            return Err(self.invalid(format!("id {} does not fit in 24 bits", self.id)));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(self.invalid("empty field name".to_string()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(self.invalid(format!("duplicate field {}", field.name)));
            }
            if field.array_length > u8::MAX as usize {
                return Err(self.invalid(format!(
                    "field {} array length {} exceeds 255",
                    field.name, field.array_length
                )));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> CatalogError {
        CatalogError::InvalidDefinition {
            message: self.name.clone(),
            reason,
        }
    }
}

fn unsupported(message: &str, field: &FieldDefinition) -> CatalogError {
    CatalogError::UnsupportedFieldType {
        message: message.to_string(),
        field: field.name.clone(),
        type_name: field.type_name.clone(),
    }
}

fn wire_order<'a>(message: &str, fields: &'a [FieldDefinition]) -> Result<Vec<&'a FieldDefinition>> {
    let mut keyed = fields
        .iter()
        .map(|field| {
            field
                .field_type()
                .map(|ty| (ty.width(), field))
                .ok_or_else(|| unsupported(message, field))
        })
        .collect::<Result<Vec<_>>>()?;
    // `sort_by_key` is stable, which keeps declaration order within a width.
    keyed.sort_by_key(|(width, _)| Reverse(*width));
    Ok(keyed.into_iter().map(|(_, field)| field).collect())
}

/// CRC extra for a message layout.
///
/// Folds `"NAME "` and then, for every field in wire order,
/// `"type "`, `"name "` and the array length byte (arrays only). The
/// 16-bit result is reduced to one byte as `low ^ high`.
pub fn compute_crc_extra(name: &str, fields: &[FieldDefinition]) -> Result<u8> {
    let mut crc = Crc16::new();
    crc.update(name.as_bytes());
    crc.update(b" ");

    for field in wire_order(name, fields)? {
        let ty = field
            .field_type()
            .ok_or_else(|| unsupported(name, field))?;
        crc.update(ty.name().as_bytes());
        crc.update(b" ");
        crc.update(field.name.as_bytes());
        crc.update(b" ");
        if field.is_array() {
            crc.update_byte(field.array_length as u8);
        }
    }

    let value = crc.value();
    Ok(((value & 0xFF) ^ (value >> 8)) as u8)
}

/// One named value of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub key: String,
    pub value: u64,
}

/// An enum as declared by the dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDefinition {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<EnumEntry>,
}

impl EnumDefinition {
    /// Entry key for a numeric value.
    pub fn key_for(&self, value: u64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.key.as_str())
    }

    /// Numeric value for an entry key.
    pub fn value_for(&self, key: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.value)
    }
}
