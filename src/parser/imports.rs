use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// The kind of import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// ESM static import: `import { X } from './module'` or `import './module'`
    Esm,
    /// CommonJS require: `const X = require('./module')`
    Cjs,
}

/// One import occurrence found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport<'a> {
    /// Which alternative of the pattern matched.
    pub kind: ImportKind,
    /// The module specifier as written between the quotes, trimmed.
    pub specifier: &'a str,
}

impl RawImport<'_> {
    /// True for specifiers resolved inside the repository (`./x`, `../x`, `.`).
    pub fn is_internal(&self) -> bool {
        is_internal(self.specifier)
    }

    /// Detach from the scanned text so the import can outlive it.
    pub fn to_record(&self) -> ImportRecord {
        ImportRecord {
            kind: self.kind,
            specifier: self.specifier.to_owned(),
        }
    }
}

/// An owned import occurrence, carried out of a fetch task and stored as edge weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub kind: ImportKind,
    pub specifier: String,
}

/// Returns true when `specifier` is relative, i.e. starts with `.`.
pub fn is_internal(specifier: &str) -> bool {
    specifier.starts_with('.')
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// Unified lexical pattern for both import forms.
///
/// Group 1 captures the `import ... from '<spec>'` / `import '<spec>'` form,
/// group 2 the `require('<spec>')` form. This is a lexical scan: matches inside
/// comments and template strings are accepted.
const IMPORT_PATTERN: &str =
    r#"import\s+(?:[^'"`]+?from\s+)?['"]([^'"`]+)['"];?|require\(['"]([^'"`]+)['"]\)"#;

static IMPORT_RE: OnceLock<Regex> = OnceLock::new();

fn import_re() -> &'static Regex {
    // `Regex` is stateless per match call, so one compiled instance is shared
    // by every concurrent scan.
    IMPORT_RE.get_or_init(|| Regex::new(IMPORT_PATTERN).expect("invalid import pattern"))
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Scan `source` left to right and lazily yield every import occurrence.
///
/// Each call starts a fresh scan; nothing is carried between calls.
pub fn extract_imports(source: &str) -> impl Iterator<Item = RawImport<'_>> + '_ {
    import_re().captures_iter(source).filter_map(|caps| {
        let (kind, m) = match (caps.get(1), caps.get(2)) {
            (Some(m), _) => (ImportKind::Esm, m),
            (None, Some(m)) => (ImportKind::Cjs, m),
            (None, None) => return None,
        };
        let specifier = m.as_str().trim();
        if specifier.is_empty() {
            return None;
        }
        Some(RawImport { kind, specifier })
    })
}

/// Like [`extract_imports`], keeping only relative specifiers.
pub fn extract_internal_imports(source: &str) -> impl Iterator<Item = RawImport<'_>> + '_ {
    extract_imports(source).filter(|import| import.is_internal())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
