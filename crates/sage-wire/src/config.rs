/// Reader configuration attached to a [`ByteCursor`](crate::ByteCursor).
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────────┐
/// │ Field         │ Purpose                                          │
/// ├───────────────┼──────────────────────────────────────────────────┤
/// │ char_encoding │ How null-terminated and fixed-length strings map │
/// │               │ bytes to characters                              │
/// └───────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// Length-prefixed strings ignore this setting: their encoding is part of
/// the operation (ASCII or UTF-16LE).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    pub char_encoding: CharEncoding,
}

impl ReaderConfig {
    /// Replace the character encoding.
    #[must_use]
    pub fn with_char_encoding(mut self, char_encoding: CharEncoding) -> Self {
        self.char_encoding = char_encoding;
        self
    }
}

/// Character encoding for strings whose length is counted in characters
/// or delimited by a terminator.
///
/// ```text
/// ┌────────────┬──────────────────────────────────────────────┐
/// │ Variant    │ One character is...                          │
/// ├────────────┼──────────────────────────────────────────────┤
/// │ SingleByte │ exactly one byte, mapped to U+0000..=U+00FF  │
/// │ Utf8       │ one UTF-8 scalar value (1-4 bytes)           │
/// └────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharEncoding {
    #[default]
    SingleByte,
    Utf8,
}

impl CharEncoding {
    /// Name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::SingleByte => "single-byte",
            Self::Utf8 => "UTF-8",
        }
    }
}
