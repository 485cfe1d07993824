/// Controls how definitions are admitted into a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// When true, messages with unknown field types or oversized payloads
    /// are rejected at load time. Otherwise they are kept and fail when
    /// encoded or decoded.
    pub strict_types: bool,
    /// Maximum number of catalog files loaded from a directory.
    pub max_files_from_directory: usize,
    /// Maximum bytes allowed per catalog file.
    pub max_catalog_file_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            strict_types: false,
            max_files_from_directory: 64,
            max_catalog_file_size: 4 * 1024 * 1024,
        }
    }
}
