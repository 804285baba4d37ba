use std::path::Path;

/// Asset file kinds, recognized by extension.
///
/// ```text
/// ┌───────────┬────────────────┬──────────────────────┐
/// │ Extension │ Kind           │ Leading header       │
/// ├───────────┼────────────────┼──────────────────────┤
/// │ .wav      │ Wave           │ RIFF / WAVE          │
/// │ .mp3      │ Mp3            │ ID3v2 (optional)     │
/// │ .bik      │ Bink           │ BIK                  │
/// │ .ani      │ AnimatedCursor │ RIFF / ACON          │
/// │ .bmp      │ Bitmap         │ BM + BITMAPINFO      │
/// │ .csf      │ StringTable    │ " FSC"               │
/// │ .wnd      │ WindowLayout   │ (text)               │
/// │ .txt      │ Text           │ (text)               │
/// │ other     │ Unsupported    │ -                    │
/// └───────────┴────────────────┴──────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Wave,
    Mp3,
    Bink,
    AnimatedCursor,
    Bitmap,
    StringTable,
    WindowLayout,
    Text,
    Unsupported,
}

impl FileKind {
    /// Classify a path by its extension, ignoring ASCII case.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return Self::Unsupported;
        };
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Self::Wave,
            "mp3" => Self::Mp3,
            "bik" => Self::Bink,
            "ani" => Self::AnimatedCursor,
            "bmp" => Self::Bitmap,
            "csf" => Self::StringTable,
            "wnd" => Self::WindowLayout,
            "txt" => Self::Text,
            _ => Self::Unsupported,
        }
    }

    /// Audio and video containers share one preview surface downstream.
    pub fn is_audio_video(self) -> bool {
        matches!(self, Self::Wave | Self::Mp3 | Self::Bink)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wave => "wave audio",
            Self::Mp3 => "MP3 audio",
            Self::Bink => "Bink video",
            Self::AnimatedCursor => "animated cursor",
            Self::Bitmap => "bitmap",
            Self::StringTable => "string table",
            Self::WindowLayout => "window layout",
            Self::Text => "text",
            Self::Unsupported => "unsupported",
        }
    }
}
