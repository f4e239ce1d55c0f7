pub mod console;
pub mod dialogs;
pub mod file_dialogs;
