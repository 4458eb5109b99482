use crate::storage::entity::{JobFields, JobPatch};
use std::str::FromStr;

/// 发往存储服务的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Add {
        fields: JobFields,
    },
    Update {
        id: String,
        patch: JobPatch,
    },
    Delete {
        id: String,
    },
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Unknown("".to_string()));
        }

        match parts[0] {
            "refresh" | "reload" => Ok(AppCommand::Refresh),
            "help" | "h" => Ok(AppCommand::Help),
            "quit" | "q" | "exit" => Ok(AppCommand::Quit),
            _ => Ok(AppCommand::Unknown(format!("未知命令: {}", parts[0]))),
        }
    }
}
