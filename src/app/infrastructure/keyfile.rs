//! Section/key configuration files.
//!
//! Project files and the default session file are flat `section -> key -> value`
//! stores. They are kept on disk as TOML documents where every top-level table is
//! a section. Values are strings, integers, booleans or string lists.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use toml::{Table, Value};

use super::error::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyFile {
    sections: BTreeMap<String, Table>,
}

impl KeyFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a file. A missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let root: Table = text.parse()?;
        let sections = root
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Table(table) => Some((name, table)),
                _ => None,
            })
            .collect();
        Ok(Self { sections })
    }

    pub fn to_data(&self) -> Result<String> {
        Ok(toml::to_string(&self.sections)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = self.to_data()?;
        fs::write(path, data)?;
        Ok(())
    }

    fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section)?.get(key)
    }

    fn section_mut(&mut self, section: &str) -> &mut Table {
        self.sections.entry(section.to_string()).or_default()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.value(section, key).is_some()
    }

    pub fn remove_section(&mut self, section: &str) -> bool {
        self.sections.remove(section).is_some()
    }

    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.value(section, key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    pub fn get_integer(&self, section: &str, key: &str, default: i64) -> i64 {
        self.value(section, key)
            .and_then(Value::as_integer)
            .unwrap_or(default)
    }

    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.value(section, key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Returns `None` when the key is absent or not a list.
    pub fn get_string_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        let items = self.value(section, key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn set_string(&mut self, section: &str, key: &str, value: &str) {
        self.section_mut(section)
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    pub fn set_integer(&mut self, section: &str, key: &str, value: i64) {
        self.section_mut(section)
            .insert(key.to_string(), Value::Integer(value));
    }

    pub fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.section_mut(section)
            .insert(key.to_string(), Value::Boolean(value));
    }

    pub fn set_string_list<S: AsRef<str>>(&mut self, section: &str, key: &str, values: &[S]) {
        let list = values
            .iter()
            .map(|v| Value::String(v.as_ref().to_string()))
            .collect();
        self.section_mut(section)
            .insert(key.to_string(), Value::Array(list));
    }
}
