pub mod app_command;
pub mod ui_command;

pub use app_command::AppCommand;
pub use ui_command::{parse_ui_command, UiCommand};

/// 命令行模式可补全的命令
pub const COMMAND_NAMES: [&str; 9] = [
    "search", "status", "clear", "add", "edit", "delete", "refresh", "help", "quit",
];
