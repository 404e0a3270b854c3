//! Import/export options

/// Options for importing calculator documents
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Reject documents whose calculator definition does not validate (default: true)
    pub validate: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// Options for exporting calculator documents
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Indent the JSON output (default: true)
    pub pretty: bool,
    /// Stamp the document with an `exported_at` RFC 3339 timestamp (default: true)
    pub include_exported_at: bool,
    /// Give every output a `formula_display`, converting the formula when no
    /// override is set (default: true)
    pub fill_formula_display: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            include_exported_at: true,
            fill_formula_display: true,
        }
    }
}

/// Rendering produced by an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Calculator document, re-importable
    #[default]
    Json,
    /// One row per field: `Type,Label,Symbol,Unit,Formula,Formula Display`
    Csv,
    /// Human-readable documentation page
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(format!("Unsupported format: {}", other)),
        }
    }
}
