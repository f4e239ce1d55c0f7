//! Project-scoped build commands.
//!
//! Stored in the `build-menu` section of the project file:
//! `filetypes` lists the filetypes with project commands, and each command is
//! three keys `<PREFIX>_<nn>_LB` (label), `_CM` (command) and `_WD` (working
//! directory) where the prefix is `<FT>_FT`, `NF` or `EX`.

use std::collections::BTreeMap;

use crate::app::infrastructure::keyfile::KeyFile;

pub const BUILD_SECTION: &str = "build-menu";
const FILETYPES_KEY: &str = "filetypes";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildCommand {
    pub label: String,
    pub command: String,
    pub working_dir: String,
}

impl BuildCommand {
    pub fn new(label: &str, command: &str, working_dir: &str) -> Self {
        Self {
            label: label.to_string(),
            command: command.to_string(),
            working_dir: working_dir.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.label.is_empty() && self.command.is_empty() && self.working_dir.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildGroup {
    Filetype,
    NonFiletype,
    Exec,
}

/// Editable copy of the project commands shown in the properties dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildTable {
    /// Filetype of the current document, if any.
    pub filetype: Option<String>,
    pub filetype_commands: Vec<BuildCommand>,
    pub non_filetype: Vec<BuildCommand>,
    pub exec: Vec<BuildCommand>,
}

#[derive(Debug, Default)]
pub struct BuildMenu {
    filetype_commands: BTreeMap<String, Vec<BuildCommand>>,
    non_filetype: Vec<BuildCommand>,
    exec: Vec<BuildCommand>,
}

fn read_group(config: &KeyFile, prefix: &str) -> Vec<BuildCommand> {
    let mut commands = Vec::new();
    let mut index = 0;
    loop {
        let key = |suffix: &str| format!("{}_{:02}_{}", prefix, index, suffix);
        if !config.has_key(BUILD_SECTION, &key("LB"))
            && !config.has_key(BUILD_SECTION, &key("CM"))
            && !config.has_key(BUILD_SECTION, &key("WD"))
        {
            break;
        }
        commands.push(BuildCommand {
            label: config.get_string(BUILD_SECTION, &key("LB"), ""),
            command: config.get_string(BUILD_SECTION, &key("CM"), ""),
            working_dir: config.get_string(BUILD_SECTION, &key("WD"), ""),
        });
        index += 1;
    }
    commands
}

fn write_group(config: &mut KeyFile, prefix: &str, commands: &[BuildCommand]) {
    for (index, cmd) in commands.iter().filter(|c| !c.is_blank()).enumerate() {
        let key = |suffix: &str| format!("{}_{:02}_{}", prefix, index, suffix);
        config.set_string(BUILD_SECTION, &key("LB"), &cmd.label);
        config.set_string(BUILD_SECTION, &key("CM"), &cmd.command);
        config.set_string(BUILD_SECTION, &key("WD"), &cmd.working_dir);
    }
}

fn filetype_prefix(filetype: &str) -> String {
    format!("{}_FT", filetype)
}

impl BuildMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load project commands from `config`. Returns the filetypes that received
    /// project commands, so the project can release them when it closes.
    pub fn load_project(&mut self, config: &KeyFile) -> Vec<String> {
        self.non_filetype = read_group(config, "NF");
        self.exec = read_group(config, "EX");

        let mut loaded = Vec::new();
        for filetype in config
            .get_string_list(BUILD_SECTION, FILETYPES_KEY)
            .unwrap_or_default()
        {
            let commands = read_group(config, &filetype_prefix(&filetype));
            if commands.is_empty() {
                continue;
            }
            self.filetype_commands.insert(filetype.clone(), commands);
            loaded.push(filetype);
        }
        loaded
    }

    /// Write the project commands of `filetypes`, plus the non-filetype and
    /// execute commands, replacing the previous build section.
    pub fn save_project(&self, config: &mut KeyFile, filetypes: &[String]) {
        config.remove_section(BUILD_SECTION);

        let stored: Vec<&String> = filetypes
            .iter()
            .filter(|ft| {
                self.filetype_commands
                    .get(*ft)
                    .is_some_and(|cmds| cmds.iter().any(|c| !c.is_blank()))
            })
            .collect();
        for filetype in &stored {
            if let Some(commands) = self.filetype_commands.get(*filetype) {
                write_group(config, &filetype_prefix(filetype), commands);
            }
        }
        if !stored.is_empty() {
            config.set_string_list(BUILD_SECTION, FILETYPES_KEY, &stored);
        }
        write_group(config, "NF", &self.non_filetype);
        write_group(config, "EX", &self.exec);
    }

    pub fn filetype_commands(&self, filetype: &str) -> Option<&[BuildCommand]> {
        self.filetype_commands.get(filetype).map(Vec::as_slice)
    }

    pub fn commands(&self, group: BuildGroup) -> &[BuildCommand] {
        match group {
            BuildGroup::NonFiletype => &self.non_filetype,
            BuildGroup::Exec => &self.exec,
            BuildGroup::Filetype => &[],
        }
    }

    pub fn table_for(&self, filetype: Option<&str>) -> BuildTable {
        BuildTable {
            filetype: filetype.map(str::to_string),
            filetype_commands: filetype
                .and_then(|ft| self.filetype_commands.get(ft))
                .cloned()
                .unwrap_or_default(),
            non_filetype: self.non_filetype.clone(),
            exec: self.exec.clone(),
        }
    }

    /// Take over the edited table. Returns `true` when the filetype commands changed.
    pub fn read_table(&mut self, table: &BuildTable) -> bool {
        self.non_filetype = table.non_filetype.clone();
        self.exec = table.exec.clone();

        let Some(filetype) = table.filetype.as_deref() else {
            return false;
        };
        let old = self.filetype_commands.get(filetype);
        let unchanged = match old {
            Some(old) => *old == table.filetype_commands,
            None => table.filetype_commands.iter().all(BuildCommand::is_blank),
        };
        if unchanged {
            return false;
        }
        self.filetype_commands
            .insert(filetype.to_string(), table.filetype_commands.clone());
        true
    }

    pub fn remove_filetype(&mut self, filetype: &str) {
        self.filetype_commands.remove(filetype);
    }

    pub fn remove_menu_items(&mut self, group: BuildGroup) {
        match group {
            BuildGroup::NonFiletype => self.non_filetype.clear(),
            BuildGroup::Exec => self.exec.clear(),
            BuildGroup::Filetype => self.filetype_commands.clear(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filetype_commands.is_empty() && self.non_filetype.is_empty() && self.exec.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> BuildTable {
        BuildTable {
            filetype: Some("Rust".to_string()),
            filetype_commands: vec![BuildCommand::new("_Compile", "cargo check", "%p")],
            non_filetype: vec![
                BuildCommand::new("_Make", "make", ""),
                BuildCommand::default(),
            ],
            exec: vec![BuildCommand::new("_Execute", "./run.sh", "%p")],
        }
    }

    #[test]
    fn test_read_table_reports_filetype_changes() {
        let mut menu = BuildMenu::new();
        assert!(menu.read_table(&sample_table()));
        assert!(!menu.read_table(&sample_table()));
        assert_eq!(menu.commands(BuildGroup::Exec).len(), 1);

        let untouched = BuildTable {
            filetype: Some("C".to_string()),
            filetype_commands: vec![BuildCommand::default()],
            ..Default::default()
        };
        assert!(!menu.read_table(&untouched));
        assert!(menu.filetype_commands("C").is_none());
    }

    #[test]
    fn test_save_then_load() {
        let mut menu = BuildMenu::new();
        menu.read_table(&sample_table());

        let mut config = KeyFile::new();
        menu.save_project(&mut config, &["Rust".to_string()]);
        assert_eq!(config.get_string(BUILD_SECTION, "Rust_FT_00_CM", ""), "cargo check");
        assert_eq!(config.get_string(BUILD_SECTION, "NF_00_LB", ""), "_Make");
        // blank entries are not written
        assert!(!config.has_key(BUILD_SECTION, "NF_01_LB"));

        let mut loaded = BuildMenu::new();
        assert_eq!(loaded.load_project(&config), vec!["Rust".to_string()]);
        assert_eq!(loaded.table_for(Some("Rust")).filetype_commands, sample_table().filetype_commands);
        assert_eq!(loaded.commands(BuildGroup::NonFiletype), &[BuildCommand::new("_Make", "make", "")]);
    }

    #[test]
    fn test_save_replaces_previous_section() {
        let mut config = KeyFile::new();
        config.set_string(BUILD_SECTION, "NF_05_CM", "stale");
        BuildMenu::new().save_project(&mut config, &[]);
        assert!(!config.has_key(BUILD_SECTION, "NF_05_CM"));
    }

    #[test]
    fn test_remove_entries() {
        let mut menu = BuildMenu::new();
        menu.read_table(&sample_table());
        menu.remove_filetype("Rust");
        assert!(menu.filetype_commands("Rust").is_none());
        menu.remove_menu_items(BuildGroup::NonFiletype);
        menu.remove_menu_items(BuildGroup::Exec);
        assert!(menu.is_empty());
    }
}
