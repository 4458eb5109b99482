use crate::view::StatusFilter;

/// 命令行中由界面自身处理的命令（筛选、打开表单等）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Search(String),
    Status(StatusFilter),
    Clear,
    Add,
    Edit,
    Delete,
}

/// 不是界面命令时返回 None；参数不合法时返回用法提示
pub fn parse_ui_command(input: &str) -> Option<Result<UiCommand, String>> {
    let input = input.trim();
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (input, ""),
    };

    let cmd = match head {
        "search" | "s" => Ok(UiCommand::Search(rest.to_string())),
        "status" | "f" => {
            if rest.is_empty() {
                Err("用法: status <all|未投递|已投递|面试中|已拒绝|已通过>".to_string())
            } else {
                rest.parse::<StatusFilter>().map(UiCommand::Status)
            }
        }
        "clear" => Ok(UiCommand::Clear),
        "add" | "new" => Ok(UiCommand::Add),
        "edit" => Ok(UiCommand::Edit),
        "delete" | "del" | "rm" => Ok(UiCommand::Delete),
        _ => return None,
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_with_spaces() {
        assert_eq!(
            parse_ui_command("search 前端 开发"),
            Some(Ok(UiCommand::Search("前端 开发".to_string())))
        );
        assert_eq!(
            parse_ui_command("search"),
            Some(Ok(UiCommand::Search(String::new())))
        );
    }

    #[test]
    fn parses_status() {
        assert_eq!(
            parse_ui_command("status 面试中"),
            Some(Ok(UiCommand::Status(StatusFilter::Only("面试中".to_string()))))
        );
        assert_eq!(
            parse_ui_command("status all"),
            Some(Ok(UiCommand::Status(StatusFilter::All)))
        );
        assert!(matches!(parse_ui_command("status"), Some(Err(_))));
        assert!(matches!(parse_ui_command("status maybe"), Some(Err(_))));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_ui_command("clear"), Some(Ok(UiCommand::Clear)));
        assert_eq!(parse_ui_command("add"), Some(Ok(UiCommand::Add)));
        assert_eq!(parse_ui_command("edit"), Some(Ok(UiCommand::Edit)));
        assert_eq!(parse_ui_command("rm"), Some(Ok(UiCommand::Delete)));
    }

    #[test]
    fn service_commands_fall_through() {
        assert_eq!(parse_ui_command("help"), None);
        assert_eq!(parse_ui_command("quit"), None);
    }
}
