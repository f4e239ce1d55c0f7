use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IndentType {
    #[default]
    Spaces,
    Tabs,
    Both,
}

impl IndentType {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Spaces => 0,
            Self::Tabs => 1,
            Self::Both => 2,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Spaces),
            1 => Some(Self::Tabs),
            2 => Some(Self::Both),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AutoIndentMode {
    None,
    Basic,
    #[default]
    CurrentChars,
    MatchBraces,
}

impl AutoIndentMode {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Basic => 1,
            Self::CurrentChars => 2,
            Self::MatchBraces => 3,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Basic),
            2 => Some(Self::CurrentChars),
            3 => Some(Self::MatchBraces),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndentPrefs {
    #[serde(default = "default_indent_width")]
    pub width: u32,

    #[serde(default)]
    pub kind: IndentType,

    /// Width of a hard tab when mixing tabs and spaces
    #[serde(default = "default_hard_tab_width")]
    pub hard_tab_width: u32,

    #[serde(default)]
    pub detect_type: bool,

    #[serde(default)]
    pub detect_width: bool,

    #[serde(default)]
    pub auto_indent_mode: AutoIndentMode,
}

fn default_indent_width() -> u32 {
    4
}

fn default_hard_tab_width() -> u32 {
    8
}

impl Default for IndentPrefs {
    fn default() -> Self {
        Self {
            width: default_indent_width(),
            kind: IndentType::default(),
            hard_tab_width: default_hard_tab_width(),
            detect_type: false,
            detect_width: false,
            auto_indent_mode: AutoIndentMode::default(),
        }
    }
}

/// The editor and file preferences a project may override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditingPrefs {
    #[serde(default)]
    pub indentation: IndentPrefs,

    #[serde(default = "default_true")]
    pub final_new_line: bool,

    #[serde(default)]
    pub ensure_convert_new_lines: bool,

    #[serde(default)]
    pub strip_trailing_spaces: bool,

    #[serde(default)]
    pub replace_tabs: bool,

    #[serde(default)]
    pub line_wrapping: bool,

    #[serde(default = "default_line_break_column")]
    pub line_break_column: u32,

    #[serde(default = "default_true")]
    pub auto_continue_multiline: bool,
}

fn default_true() -> bool {
    true
}

fn default_line_break_column() -> u32 {
    72
}

impl Default for EditingPrefs {
    fn default() -> Self {
        Self {
            indentation: IndentPrefs::default(),
            final_new_line: true,
            ensure_convert_new_lines: false,
            strip_trailing_spaces: false,
            replace_tabs: false,
            line_wrapping: false,
            line_break_column: default_line_break_column(),
            auto_continue_multiline: true,
        }
    }
}

/// Preferences a document actually edits with: the project's overlay while a
/// project is open, the global defaults otherwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectivePrefs {
    pub editing: EditingPrefs,
    /// Column of the long line marker, `None` when the marker is hidden.
    pub long_line_column: Option<u32>,
}
