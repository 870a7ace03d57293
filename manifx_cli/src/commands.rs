pub mod history_command;
pub mod import_command;
pub mod manifest_command;
pub mod reset_history_command;
