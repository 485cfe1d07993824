use std::collections::{BTreeMap, HashMap};
use std::fs::{File, Metadata};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::definition::{EnumDefinition, FieldDefinition, MessageDefinition};
use crate::error::{CatalogError, Result};
use crate::types::parse_type_spec;

/// Message definitions indexed by id and by name, plus dialect enums.
///
/// A catalog is built once and then shared read-only (typically behind an
/// `Arc`). Loading more definitions means building a new catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    messages: HashMap<u32, MessageDefinition>,
    by_name: HashMap<String, u32>,
    enums: BTreeMap<String, EnumDefinition>,
    dialect: Option<String>,
    version: Option<u32>,
    config: CatalogConfig,
}

impl Catalog {
    /// Create an empty catalog with default config.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create an empty catalog with explicit config.
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            messages: HashMap::new(),
            by_name: HashMap::new(),
            enums: BTreeMap::new(),
            dialect: None,
            version: None,
            config,
        }
    }

    /// Add a message definition.
    ///
    /// Ids and names must be unique. Unknown field types and oversized
    /// payloads are rejected under `strict_types` and logged otherwise.
    pub fn insert_message(&mut self, definition: MessageDefinition) -> Result<()> {
        definition.validate_structure()?;

        if self.messages.contains_key(&definition.id) || self.by_name.contains_key(&definition.name)
        {
            return Err(CatalogError::DuplicateMessage {
                id: definition.id,
                name: definition.name,
            });
        }

        if let Err(err) = definition.validate() {
            if self.config.strict_types {
                return Err(err);
            }
            warn!(
                message = %definition.name,
                id = definition.id,
                error = %err,
                "definition cannot be encoded or decoded"
            );
        }

        self.by_name.insert(definition.name.clone(), definition.id);
        self.messages.insert(definition.id, definition);
        Ok(())
    }

    /// Add an enum, merging entries into an existing enum of the same name.
    ///
    /// On a key clash the first value wins.
    pub fn insert_enum(&mut self, definition: EnumDefinition) {
        let Some(existing) = self.enums.get_mut(&definition.name) else {
            self.enums.insert(definition.name.clone(), definition);
            return;
        };

        for entry in definition.entries {
            match existing.value_for(&entry.key) {
                None => existing.entries.push(entry),
                Some(value) if value != entry.value => {
                    warn!(
                        enum_name = %existing.name,
                        key = %entry.key,
                        kept = value,
                        ignored = entry.value,
                        "conflicting enum entry"
                    );
                }
                Some(_) => {}
            }
        }
    }

    /// Parse a catalog document and add its contents.
    pub fn register_json(&mut self, json: &str) -> Result<()> {
        let document: CatalogDocument = serde_json::from_str(json)?;

        if self.dialect.is_none() {
            self.dialect = document.dialect;
        }
        if self.version.is_none() {
            self.version = document.version;
        }

        let message_count = document.messages.len();
        for message in document.messages {
            self.insert_message(message.into_definition()?)?;
        }
        let enum_count = document.enums.len();
        for definition in document.enums {
            self.insert_enum(definition);
        }

        debug!(
            messages = message_count,
            enums = enum_count,
            "registered catalog document"
        );
        Ok(())
    }

    /// Build a catalog from one JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.register_json(json)?;
        Ok(catalog)
    }

    /// Build a catalog from one JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with_config(path, CatalogConfig::default())
    }

    /// Build a catalog from one JSON file with explicit config.
    pub fn from_file_with_config(path: &Path, config: CatalogConfig) -> Result<Self> {
        let mut catalog = Self::with_config(config);
        let metadata = std::fs::metadata(path)
            .map_err(|err| CatalogError::LoadFailed(format!("{}: {err}", path.display())))?;
        let content = read_limited(path, &metadata, config.max_catalog_file_size)?;
        catalog.register_json(&content)?;
        Ok(catalog)
    }

    /// Load and merge every `*.json` file in a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, CatalogConfig::default())
    }

    /// Load and merge every `*.json` file in a directory with explicit config.
    ///
    /// Files are read in name order. Symlinked catalog files are refused.
    pub fn from_directory_with_config(path: &Path, config: CatalogConfig) -> Result<Self> {
        let mut catalog = Self::with_config(config);

        let entries = std::fs::read_dir(path)
            .map_err(|err| CatalogError::LoadFailed(format!("{}: {err}", path.display())))?;
        let mut entries = entries
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|err| CatalogError::LoadFailed(err.to_string()))?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut loaded = 0usize;
        for entry in entries {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let is_catalog_file = file_name.to_ascii_lowercase().ends_with(".json");
            let entry_path = entry.path();
            let path_metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| CatalogError::LoadFailed(err.to_string()))?;
            let file_type = path_metadata.file_type();

            if file_type.is_symlink() {
                if is_catalog_file {
                    return Err(CatalogError::LoadFailed(format!(
                        "refusing to load catalog symlink: {file_name}"
                    )));
                }
                continue;
            }
            if !file_type.is_file() || !is_catalog_file {
                continue;
            }

            loaded = loaded.saturating_add(1);
            if loaded > config.max_files_from_directory {
                return Err(CatalogError::LoadFailed(format!(
                    "catalog file count exceeds configured max ({}): {}",
                    config.max_files_from_directory, loaded
                )));
            }

            let content = read_limited(&entry_path, &path_metadata, config.max_catalog_file_size)?;
            debug!(file = %file_name, "loading catalog file");
            catalog.register_json(&content)?;
        }

        Ok(catalog)
    }

    /// Load a file, or every catalog file in a directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_path_with_config(path, CatalogConfig::default())
    }

    pub fn from_path_with_config(path: &Path, config: CatalogConfig) -> Result<Self> {
        if path.is_dir() {
            Self::from_directory_with_config(path, config)
        } else {
            Self::from_file_with_config(path, config)
        }
    }

    /// Definition for a message id.
    pub fn message(&self, id: u32) -> Option<&MessageDefinition> {
        self.messages.get(&id)
    }

    /// Definition for a message name.
    pub fn message_by_name(&self, name: &str) -> Option<&MessageDefinition> {
        self.by_name.get(name).and_then(|id| self.messages.get(id))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.messages.contains_key(&id)
    }

    /// All definitions, ordered by id.
    pub fn messages(&self) -> Vec<&MessageDefinition> {
        let mut messages: Vec<&MessageDefinition> = self.messages.values().collect();
        messages.sort_unstable_by_key(|m| m.id);
        messages
    }

    pub fn enum_definition(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums.get(name)
    }

    /// All enums, ordered by name.
    pub fn enums(&self) -> impl Iterator<Item = &EnumDefinition> {
        self.enums.values()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn dialect(&self) -> Option<&str> {
        self.dialect.as_deref()
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    dialect: Option<String>,
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    messages: Vec<MessageDocument>,
    #[serde(default)]
    enums: Vec<EnumDefinition>,
}

#[derive(Debug, Deserialize)]
struct MessageDocument {
    id: u32,
    name: String,
    #[serde(default)]
    crc_extra: Option<u8>,
    #[serde(default)]
    fields: Vec<FieldDocument>,
}

#[derive(Debug, Deserialize)]
struct FieldDocument {
    name: String,
    #[serde(rename = "type")]
    type_spec: String,
    #[serde(default)]
    array_length: Option<usize>,
    #[serde(default, rename = "enum")]
    enum_name: Option<String>,
}

impl MessageDocument {
    fn into_definition(self) -> Result<MessageDefinition> {
        let fields = self
            .fields
            .into_iter()
            .map(|field| field.into_definition(&self.name))
            .collect::<Result<Vec<_>>>()?;

        match self.crc_extra {
            Some(crc_extra) => Ok(MessageDefinition::with_crc_extra(
                self.id, self.name, crc_extra, fields,
            )),
            None => MessageDefinition::new(self.id, self.name, fields),
        }
    }
}

impl FieldDocument {
    fn into_definition(self, message: &str) -> Result<FieldDefinition> {
        let invalid = |reason: String| CatalogError::InvalidDefinition {
            message: message.to_string(),
            reason,
        };

        let (type_name, suffix_length) = parse_type_spec(&self.type_spec).ok_or_else(|| {
            invalid(format!(
                "field {} has malformed type {:?}",
                self.name, self.type_spec
            ))
        })?;

        let array_length = match (suffix_length, self.array_length) {
            (Some(0), _) => {
                return Err(invalid(format!("field {} has a zero-length array", self.name)));
            }
            (Some(a), Some(b)) if a != b => {
                return Err(invalid(format!(
                    "field {} declares array length {a} and {b}",
                    self.name
                )));
            }
            (Some(len), _) | (None, Some(len)) => len,
            (None, None) => 0,
        };

        let mut field = FieldDefinition::array(self.name, type_name, array_length);
        field.enum_name = self.enum_name;
        Ok(field)
    }
}

fn read_limited(path: &Path, path_metadata: &Metadata, max_bytes: usize) -> Result<String> {
    let display = path.display();
    let file = File::open(path)
        .map_err(|err| CatalogError::LoadFailed(format!("failed opening catalog {display}: {err}")))?;
    let opened_metadata = file
        .metadata()
        .map_err(|err| CatalogError::LoadFailed(err.to_string()))?;

    #[cfg(unix)]
    {
        if !same_file_identity(path_metadata, &opened_metadata) {
            return Err(CatalogError::LoadFailed(format!(
                "catalog file changed during load: {display}"
            )));
        }
    }
    #[cfg(not(unix))]
    let _ = path_metadata;

    if opened_metadata.len() > max_bytes as u64 {
        return Err(CatalogError::LoadFailed(format!(
            "catalog file too large ({} bytes): {display}",
            opened_metadata.len()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| CatalogError::LoadFailed(format!("failed reading catalog {display}: {err}")))?;
    if content.len() > max_bytes {
        return Err(CatalogError::LoadFailed(format!(
            "catalog file too large while reading: {display}"
        )));
    }
    Ok(content)
}

#[cfg(unix)]
fn same_file_identity(path_metadata: &Metadata, opened_metadata: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::definition::EnumEntry;

    const COMMON: &str = r#"{
        "dialect": "common",
        "version": 3,
        "messages": [
            {
                "id": 0,
                "name": "HEARTBEAT",
                "fields": [
                    { "name": "type", "type": "uint8_t", "enum": "MAV_TYPE" },
                    { "name": "autopilot", "type": "uint8_t" },
                    { "name": "base_mode", "type": "uint8_t" },
                    { "name": "custom_mode", "type": "uint32_t" },
                    { "name": "system_status", "type": "uint8_t" },
                    { "name": "mavlink_version", "type": "uint8_t_mavlink_version" }
                ]
            },
            {
                "id": 22,
                "name": "PARAM_VALUE",
                "fields": [
                    { "name": "param_id", "type": "char[16]" },
                    { "name": "param_value", "type": "float" },
                    { "name": "param_type", "type": "uint8_t" },
                    { "name": "param_count", "type": "uint16_t" },
                    { "name": "param_index", "type": "uint16_t" }
                ]
            }
        ],
        "enums": [
            {
                "name": "MAV_TYPE",
                "entries": [
                    { "key": "MAV_TYPE_GENERIC", "value": 0 },
                    { "key": "MAV_TYPE_FIXED_WING", "value": 1 }
                ]
            }
        ]
    }"#;

    const EXTRA: &str = r#"{
        "messages": [
            {
                "id": 42000,
                "name": "VENDOR_STATUS",
                "crc_extra": 99,
                "fields": [
                    { "name": "values", "type": "int16_t", "array_length": 3 }
                ]
            }
        ],
        "enums": [
            {
                "name": "MAV_TYPE",
                "entries": [
                    { "key": "MAV_TYPE_QUADROTOR", "value": 2 },
                    { "key": "MAV_TYPE_GENERIC", "value": 7 }
                ]
            }
        ]
    }"#;

    #[test]
    fn loads_document_and_indexes() {
        let catalog = Catalog::from_json_str(COMMON).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.dialect(), Some("common"));
        assert_eq!(catalog.version(), Some(3));

        let heartbeat = catalog.message(0).unwrap();
        assert_eq!(heartbeat.name, "HEARTBEAT");
        assert_eq!(heartbeat.crc_extra, 50);
        assert_eq!(
            heartbeat.field("type").unwrap().enum_name.as_deref(),
            Some("MAV_TYPE")
        );

        let param = catalog.message_by_name("PARAM_VALUE").unwrap();
        assert_eq!(param.id, 22);
        assert_eq!(param.crc_extra, 220);
        assert_eq!(param.field("param_id").unwrap().array_length, 16);
        assert_eq!(param.payload_size().unwrap(), 25);

        assert!(catalog.message(1).is_none());
        assert!(catalog.message_by_name("NOPE").is_none());
    }

    #[test]
    fn messages_iterate_by_id() {
        let mut catalog = Catalog::from_json_str(EXTRA).unwrap();
        catalog.register_json(COMMON).unwrap();
        let ids: Vec<u32> = catalog.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 22, 42000]);
        // The first document that declares a dialect sets it.
        assert_eq!(catalog.dialect(), Some("common"));
    }

    #[test]
    fn explicit_crc_extra_is_kept() {
        let catalog = Catalog::from_json_str(EXTRA).unwrap();
        let vendor = catalog.message(42000).unwrap();
        assert_eq!(vendor.crc_extra, 99);
        assert_eq!(vendor.payload_size().unwrap(), 6);
    }

    #[test]
    fn enums_merge_across_documents() {
        let mut catalog = Catalog::from_json_str(COMMON).unwrap();
        catalog.register_json(EXTRA).unwrap();

        let mav_type = catalog.enum_definition("MAV_TYPE").unwrap();
        assert_eq!(mav_type.entries.len(), 3);
        assert_eq!(mav_type.value_for("MAV_TYPE_QUADROTOR"), Some(2));
        assert_eq!(mav_type.value_for("MAV_TYPE_GENERIC"), Some(0));
        assert_eq!(catalog.enums().count(), 1);
    }

    #[test]
    fn insert_enum_creates_new() {
        let mut catalog = Catalog::new();
        catalog.insert_enum(EnumDefinition {
            name: "E".to_string(),
            entries: vec![EnumEntry {
                key: "A".to_string(),
                value: 1,
            }],
        });
        assert_eq!(catalog.enum_definition("E").unwrap().key_for(1), Some("A"));
    }

    #[test]
    fn duplicate_id_and_name_rejected() {
        let mut catalog = Catalog::from_json_str(COMMON).unwrap();

        let same_id = MessageDefinition::new(0, "OTHER", vec![]).unwrap();
        assert!(matches!(
            catalog.insert_message(same_id),
            Err(CatalogError::DuplicateMessage { id: 0, .. })
        ));

        let same_name = MessageDefinition::new(5, "HEARTBEAT", vec![]).unwrap();
        assert!(matches!(
            catalog.insert_message(same_name),
            Err(CatalogError::DuplicateMessage { .. })
        ));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn unknown_type_kept_in_permissive_mode() {
        let mut catalog = Catalog::new();
        let def = MessageDefinition::with_crc_extra(
            9,
            "ODD",
            1,
            vec![FieldDefinition::new("x", "uint128_t")],
        );
        catalog.insert_message(def).unwrap();
        assert!(catalog.contains(9));
    }

    #[test]
    fn unknown_type_rejected_in_strict_mode() {
        let mut catalog = Catalog::with_config(CatalogConfig {
            strict_types: true,
            ..CatalogConfig::default()
        });
        let def = MessageDefinition::with_crc_extra(
            9,
            "ODD",
            1,
            vec![FieldDefinition::new("x", "uint128_t")],
        );
        assert!(matches!(
            catalog.insert_message(def),
            Err(CatalogError::UnsupportedFieldType { .. })
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn unknown_type_without_crc_extra_fails_to_load() {
        let json = r#"{"messages":[{"id":1,"name":"X","fields":[{"name":"a","type":"quad"}]}]}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CatalogError::UnsupportedFieldType { .. })
        ));
    }

    #[test]
    fn wide_id_rejected() {
        let json = r#"{"messages":[{"id":16777216,"name":"X","crc_extra":1,"fields":[]}]}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CatalogError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn malformed_field_specs_rejected() {
        let cases = [
            r#"{"messages":[{"id":1,"name":"X","fields":[{"name":"a","type":"char[]"}]}]}"#,
            r#"{"messages":[{"id":1,"name":"X","fields":[{"name":"a","type":"char[0]"}]}]}"#,
            r#"{"messages":[{"id":1,"name":"X","fields":[{"name":"a","type":"char[4]","array_length":5}]}]}"#,
        ];
        for json in cases {
            assert!(
                matches!(
                    Catalog::from_json_str(json),
                    Err(CatalogError::InvalidDefinition { .. })
                ),
                "{json}"
            );
        }

        let agreeing =
            r#"{"messages":[{"id":1,"name":"X","fields":[{"name":"a","type":"char[4]","array_length":4}]}]}"#;
        assert!(Catalog::from_json_str(agreeing).is_ok());
    }

    #[test]
    fn invalid_json_reported() {
        assert!(matches!(
            Catalog::from_json_str("not-json"),
            Err(CatalogError::InvalidJson(_))
        ));
        assert!(matches!(
            Catalog::from_json_str(r#"{"messages":[{"name":"X"}]}"#),
            Err(CatalogError::InvalidJson(_))
        ));
    }

    #[test]
    fn from_directory_merges_json_files() {
        let dir = make_temp_catalog_dir("from-directory");
        write_file(&dir, "common.json", COMMON);
        write_file(&dir, "vendor.json", EXTRA);
        write_file(&dir, "notes.txt", "ignored");

        let catalog = Catalog::from_directory(&dir).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.message_by_name("VENDOR_STATUS").is_some());

        let via_path = Catalog::from_path(&dir).unwrap();
        assert_eq!(via_path.len(), 3);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_file_loads_single_document() {
        let dir = make_temp_catalog_dir("from-file");
        write_file(&dir, "common.json", COMMON);

        let catalog = Catalog::from_path(&dir.join("common.json")).unwrap();
        assert_eq!(catalog.len(), 2);

        assert!(matches!(
            Catalog::from_file(&dir.join("missing.json")),
            Err(CatalogError::LoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn duplicate_across_files_fails() {
        let dir = make_temp_catalog_dir("duplicate");
        write_file(&dir, "a.json", COMMON);
        write_file(&dir, "b.json", COMMON);

        assert!(matches!(
            Catalog::from_directory(&dir),
            Err(CatalogError::DuplicateMessage { .. })
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_catalog_is_rejected() {
        let dir = make_temp_catalog_dir("symlink");
        let target = dir.join("target.txt");
        std::fs::write(&target, COMMON.as_bytes()).unwrap();
        std::os::unix::fs::symlink(&target, dir.join("common.json")).unwrap();

        assert!(matches!(
            Catalog::from_directory(&dir),
            Err(CatalogError::LoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_count_limit_is_enforced() {
        let dir = make_temp_catalog_dir("count-limit");
        write_file(&dir, "common.json", COMMON);
        write_file(&dir, "vendor.json", EXTRA);

        let config = CatalogConfig {
            max_files_from_directory: 1,
            ..CatalogConfig::default()
        };
        assert!(matches!(
            Catalog::from_directory_with_config(&dir, config),
            Err(CatalogError::LoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_size_limit_is_enforced() {
        let dir = make_temp_catalog_dir("size-limit");
        write_file(&dir, "common.json", COMMON);

        let config = CatalogConfig {
            max_catalog_file_size: 8,
            ..CatalogConfig::default()
        };
        assert!(matches!(
            Catalog::from_directory_with_config(&dir, config),
            Err(CatalogError::LoadFailed(_))
        ));
        assert!(matches!(
            Catalog::from_file_with_config(&dir.join("common.json"), config),
            Err(CatalogError::LoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_fails() {
        let dir = std::env::temp_dir().join("mavcodec-schema-definitely-missing-dir");
        assert!(matches!(
            Catalog::from_directory(&dir),
            Err(CatalogError::LoadFailed(_))
        ));
    }

    #[test]
    fn config_access() {
        let config = CatalogConfig {
            strict_types: true,
            max_files_from_directory: 3,
            max_catalog_file_size: 1024,
        };
        let catalog = Catalog::with_config(config);
        assert_eq!(catalog.config(), &config);
        assert_eq!(Catalog::default().config(), &CatalogConfig::default());
    }

    #[cfg(unix)]
    #[test]
    fn same_file_identity_distinguishes_replaced_file() {
        let dir = make_temp_catalog_dir("identity-check");
        let first = dir.join("first.json");
        let second = dir.join("second.json");
        std::fs::write(&first, COMMON).unwrap();
        std::fs::write(&second, COMMON).unwrap();

        let first_meta = std::fs::symlink_metadata(&first).unwrap();
        let opened_first = File::open(&first).unwrap().metadata().unwrap();
        let opened_second = File::open(&second).unwrap().metadata().unwrap();

        assert!(same_file_identity(&first_meta, &opened_first));
        assert!(!same_file_identity(&first_meta, &opened_second));

        let _ = std::fs::remove_dir_all(&dir);
    }

    fn make_temp_catalog_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "mavcodec-schema-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(dir: &Path, file_name: &str, contents: &str) {
        std::fs::write(dir.join(file_name), contents.as_bytes()).unwrap();
    }
}
