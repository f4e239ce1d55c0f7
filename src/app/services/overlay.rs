//! Per-project overrides of the global editing preferences.
//!
//! Every overridable preference is described once in [`STASH_FIELDS`]: the
//! section and key it is stored under, how to read and write it on
//! [`EditingPrefs`], and which global value it falls back to. Loading and
//! saving both walk that same table.

use crate::app::domain::document::DocumentHost;
use crate::app::domain::prefs::{AutoIndentMode, EditingPrefs, EffectivePrefs, IndentType};
use crate::app::domain::project::Project;
use crate::app::infrastructure::keyfile::KeyFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StashValue {
    Bool(bool),
    Int(i64),
}

pub struct StashField {
    pub section: &'static str,
    pub key: &'static str,
    get: fn(&EditingPrefs) -> StashValue,
    set: fn(&mut EditingPrefs, StashValue),
}

impl StashField {
    pub fn get(&self, prefs: &EditingPrefs) -> StashValue {
        (self.get)(prefs)
    }

    pub fn set(&self, prefs: &mut EditingPrefs, value: StashValue) {
        (self.set)(prefs, value)
    }

    fn load(&self, config: &KeyFile, prefs: &mut EditingPrefs, global: &EditingPrefs) {
        let value = match self.get(global) {
            StashValue::Bool(default) => {
                StashValue::Bool(config.get_bool(self.section, self.key, default))
            }
            StashValue::Int(default) => {
                StashValue::Int(config.get_integer(self.section, self.key, default))
            }
        };
        self.set(prefs, value);
    }

    fn save(&self, config: &mut KeyFile, prefs: &EditingPrefs) {
        match self.get(prefs) {
            StashValue::Bool(v) => config.set_bool(self.section, self.key, v),
            StashValue::Int(v) => config.set_integer(self.section, self.key, v),
        }
    }
}

macro_rules! bool_field {
    ($section:literal, $key:literal, $($field:ident).+) => {
        StashField {
            section: $section,
            key: $key,
            get: |p| StashValue::Bool(p.$($field).+),
            set: |p, v| {
                if let StashValue::Bool(b) = v {
                    p.$($field).+ = b;
                }
            },
        }
    };
}

macro_rules! uint_field {
    ($section:literal, $key:literal, $($field:ident).+) => {
        StashField {
            section: $section,
            key: $key,
            get: |p| StashValue::Int(i64::from(p.$($field).+)),
            set: |p, v| {
                if let StashValue::Int(i) = v {
                    if let Ok(n) = u32::try_from(i) {
                        p.$($field).+ = n;
                    }
                }
            },
        }
    };
}

pub static STASH_FIELDS: &[StashField] = &[
    uint_field!("indentation", "indent_width", indentation.width),
    StashField {
        section: "indentation",
        key: "indent_type",
        get: |p| StashValue::Int(p.indentation.kind.as_i64()),
        set: |p, v| {
            if let StashValue::Int(i) = v {
                if let Some(kind) = IndentType::from_i64(i) {
                    p.indentation.kind = kind;
                }
            }
        },
    },
    uint_field!("indentation", "indent_hard_tab_width", indentation.hard_tab_width),
    bool_field!("indentation", "detect_indent", indentation.detect_type),
    bool_field!("indentation", "detect_indent_width", indentation.detect_width),
    StashField {
        section: "indentation",
        key: "indent_mode",
        get: |p| StashValue::Int(p.indentation.auto_indent_mode.as_i64()),
        set: |p, v| {
            if let StashValue::Int(i) = v {
                if let Some(mode) = AutoIndentMode::from_i64(i) {
                    p.indentation.auto_indent_mode = mode;
                }
            }
        },
    },
    bool_field!("file_prefs", "final_new_line", final_new_line),
    bool_field!("file_prefs", "ensure_convert_new_lines", ensure_convert_new_lines),
    bool_field!("file_prefs", "strip_trailing_spaces", strip_trailing_spaces),
    bool_field!("file_prefs", "replace_tabs", replace_tabs),
    bool_field!("editor", "line_wrapping", line_wrapping),
    uint_field!("editor", "line_break_column", line_break_column),
    bool_field!("editor", "auto_continue_multiline", auto_continue_multiline),
];

/// Read the overlay from `config`; absent keys take the global value.
pub fn load(config: &KeyFile, global: &EditingPrefs) -> EditingPrefs {
    let mut prefs = global.clone();
    for field in STASH_FIELDS {
        field.load(config, &mut prefs, global);
    }
    prefs
}

pub fn save(config: &mut KeyFile, prefs: &EditingPrefs) {
    for field in STASH_FIELDS {
        field.save(config, prefs);
    }
}

/// Preferences documents should use: the project's overlay when one is
/// active, the globals otherwise.
pub fn effective(project: Option<&Project>, global: &EffectivePrefs) -> EffectivePrefs {
    match project {
        Some(project) => project.effective_prefs(global),
        None => global.clone(),
    }
}

/// Re-derive the preferences of every open document.
pub fn apply(host: &mut dyn DocumentHost, project: Option<&Project>, global: &EffectivePrefs) {
    host.apply_prefs(&effective(project, global));
}
