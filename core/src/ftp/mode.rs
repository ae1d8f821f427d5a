//! Transfer representation selection.

use std::path::Path;

/// Extensions transferred in ASCII mode when [`TransferMode::Auto`] is used.
const ASCII_EXTENSIONS: &[&str] = &[
    "txt", "text", "php", "phps", "php4", "js", "css", "htm", "html", "phtml", "shtml", "log",
    "xml",
];

/// Representation type requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    Ascii,
    #[default]
    Binary,
    /// Pick by the file extension of the transferred path.
    Auto,
}

/// Representation type actually sent to the server (`TYPE A` / `TYPE I`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Ascii,
    Binary,
}

impl TransferMode {
    /// Resolve to a concrete [`DataType`] for `path`.
    pub fn resolve(self, path: &str) -> DataType {
        match self {
            TransferMode::Ascii => DataType::Ascii,
            TransferMode::Binary => DataType::Binary,
            TransferMode::Auto => {
                let is_text = Path::new(path)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| {
                        ASCII_EXTENSIONS
                            .iter()
                            .any(|known| known.eq_ignore_ascii_case(ext))
                    });
                if is_text {
                    DataType::Ascii
                } else {
                    DataType::Binary
                }
            }
        }
    }
}
