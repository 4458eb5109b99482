use crate::app_state::{App, FormField, InputMode, NoticeKind, ViewMode};
use crate::storage::entity::JobStatus;
use crate::view;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    // 创建布局
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // 顶部标题栏
            Constraint::Min(0),     // 中间内容区域
            Constraint::Length(10), // 底部命令/日志区域
        ])
        .split(f.size());

    render_top_bar(f, chunks[0]);

    // 中间内容区域（左侧表单 + 主视图）
    let middle_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(0)])
        .split(chunks[1]);

    render_form(f, middle_chunks[0], app);
    render_main_view(f, middle_chunks[1], app);
    render_bottom_bar(f, chunks[2], app);

    if app.input_mode == InputMode::Confirm {
        render_confirm(f, f.size());
    }
    render_notice(f, f.size(), app);
}

fn status_color(status: &str) -> Color {
    match status.parse::<JobStatus>() {
        Ok(JobStatus::NotSubmitted) => Color::Gray,
        Ok(JobStatus::Submitted) => Color::Blue,
        Ok(JobStatus::Interviewing) => Color::Yellow,
        Ok(JobStatus::Rejected) => Color::Red,
        Ok(JobStatus::Passed) => Color::Green,
        Err(_) => Color::DarkGray,
    }
}

fn panel_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_top_bar(f: &mut Frame, area: Rect) {
    let title_text = Line::from(vec![
        Span::styled(
            " IT岗位求职记录 ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - Terminal TUI"),
    ]);

    let paragraph = Paragraph::new(title_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let active = app.input_mode == InputMode::Form;
    let focus = if active { app.form.focus } else { None };
    let mut lines: Vec<Line> = Vec::new();

    for field in FormField::ALL {
        let focused = focus == Some(field);
        let label_style = if focused {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));

        if field == FormField::Status {
            let status = app.form.status.label();
            let text = if focused {
                format!("  ◀ {} ▶", status)
            } else {
                format!("  {}", status)
            };
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(status_color(status)),
            )));
            continue;
        }

        let value = app.form.value(field);
        let value_lines: Vec<&str> = value.split('\n').collect();
        let last = value_lines.len() - 1;
        for (i, part) in value_lines.into_iter().enumerate() {
            let mut spans = vec![Span::raw("  "), Span::raw(part)];
            if focused && i == last {
                spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
            }
            lines.push(Line::from(spans));
        }
    }

    lines.push(Line::from(""));
    let hint = if active {
        "Tab/↑↓切换 Enter/Ctrl+S保存 Esc取消"
    } else {
        "a 添加  e 编辑选中记录"
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    )));

    let title = if app.editing.is_some() {
        "编辑岗位"
    } else {
        "添加新岗位"
    };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(panel_style(active)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_main_view(f: &mut Frame, area: Rect, app: &mut App) {
    let active = matches!(app.input_mode, InputMode::Normal | InputMode::Search);
    match app.view_mode {
        ViewMode::List => {
            let rows: Vec<Row> = view::rows(&app.job_list)
                .into_iter()
                .map(|row| {
                    let color = status_color(&row.status);
                    Row::new(vec![
                        Cell::from(row.company_name),
                        Cell::from(row.job_title),
                        Cell::from(row.salary),
                        Cell::from(row.location),
                        Cell::from(Span::styled(row.status, Style::default().fg(color))),
                        Cell::from(row.created_at),
                    ])
                })
                .collect();

            let status_filter = app.filter_status.to_string();
            let query_info = if app.search_query.is_empty() && app.input_mode != InputMode::Search
            {
                String::new()
            } else if app.input_mode == InputMode::Search {
                format!(" 搜索: \"{}_\"", app.search_query)
            } else {
                format!(" 搜索: \"{}\"", app.search_query)
            };
            let title = format!(
                "岗位列表 [状态: {}]{} 共 {} 条",
                status_filter,
                query_info,
                app.job_list.len()
            );
            let block = Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(panel_style(active));

            if rows.is_empty() {
                let empty = Paragraph::new(Line::from(Span::styled(
                    "暂无岗位记录",
                    Style::default().fg(Color::Gray),
                )))
                .alignment(Alignment::Center)
                .block(block);
                f.render_widget(empty, area);
                return;
            }

            let header = Row::new(vec!["公司名称", "岗位名称", "薪资", "地点", "状态", "投递时间"])
                .style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            let widths = [
                Constraint::Percentage(20),
                Constraint::Percentage(22),
                Constraint::Percentage(12),
                Constraint::Percentage(10),
                Constraint::Percentage(10),
                Constraint::Percentage(26),
            ];
            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .highlight_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol(">> ");
            app.job_table_state.select(Some(app.selected_index));
            f.render_stateful_widget(table, area, &mut app.job_table_state);
        }
        ViewMode::Detail => {
            let content = match app.detail_record() {
                Some(job) => {
                    let mut lines = Vec::new();
                    for (label, value) in view::detail_lines(job) {
                        let label_span = Span::styled(
                            format!("{}: ", label),
                            Style::default().add_modifier(Modifier::BOLD),
                        );
                        let mut parts = value.split('\n');
                        let first = parts.next().unwrap_or("").to_string();
                        let value_style = if label == "状态" {
                            Style::default().fg(status_color(&job.status))
                        } else {
                            Style::default().fg(Color::Cyan)
                        };
                        lines.push(Line::from(vec![
                            label_span,
                            Span::styled(first, value_style),
                        ]));
                        for rest in parts {
                            lines.push(Line::from(Span::styled(
                                format!("  {}", rest),
                                value_style,
                            )));
                        }
                    }
                    lines
                }
                None => vec![Line::from("记录不存在或已被删除")],
            };

            let paragraph = Paragraph::new(content)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("岗位详情 (↑↓ 滚动, e 编辑, d 删除, Esc/x 返回)")
                        .style(panel_style(active)),
                )
                .wrap(Wrap { trim: false })
                .scroll((app.detail_scroll, 0));
            f.render_widget(paragraph, area);
        }
    }
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    // 命令输入区域
    let command_prompt = if app.input_mode == InputMode::Command {
        let mut spans = vec![Span::styled(
            "命令: ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )];
        let cur = app
            .command_input
            .char_indices()
            .nth(app.command_cursor)
            .map(|(i, _)| i)
            .unwrap_or(app.command_input.len());
        let (left, right) = app.command_input.split_at(cur);
        spans.push(Span::raw(left));
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(right));

        // 如果有建议，添加浅灰色幽灵文本
        if let Some(hint) = app.get_completion_hint() {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }

        vec![
            Line::from(spans),
            Line::from("Enter执行 Esc取消 Tab补全 ←→光标 Home/End ↑历史 ↓下一条"),
        ]
    } else {
        vec![
            Line::from(vec![
                Span::styled("命令: ", Style::default().fg(Color::Yellow)),
                Span::raw("(按 / 进入命令模式)"),
            ]),
            Line::from("a添加 e编辑 d删除 Enter详情 s搜索 f状态筛选 c清除筛选 ↑↓导航 q退出"),
        ]
    };
    let command_paragraph = Paragraph::new(command_prompt).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app.input_mode == InputMode::Command {
                "命令输入模式"
            } else {
                "命令输入"
            })
            .style(if app.input_mode == InputMode::Command {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            }),
    );
    f.render_widget(command_paragraph, bottom_chunks[0]);

    // 日志区域 - 最新的在顶部
    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with('✓') {
                Style::default().fg(Color::Green)
            } else if msg.starts_with('✗') {
                Style::default().fg(Color::Red)
            } else if msg.starts_with('⚠') {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("日志 (共 {} 条)", app.log_messages.len()))
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(log, bottom_chunks[1]);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn render_confirm(f: &mut Frame, area: Rect) {
    let rect = centered_rect(40, 5, area);
    let paragraph = Paragraph::new(vec![
        Line::from("确定要删除这个岗位记录吗？"),
        Line::from(Span::styled(
            "y 确认 / n 取消",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("确认删除")
            .style(Style::default().fg(Color::Red)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}

fn render_notice(f: &mut Frame, area: Rect, app: &App) {
    let Some(notice) = &app.notice else {
        return;
    };
    // 终端过小时不显示浮层
    if area.height < 4 || area.width < 4 {
        return;
    }
    let width = u16::try_from(notice.text.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_mul(2)
        .saturating_add(4)
        .min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width.saturating_add(1)),
        y: area.y + 1,
        width,
        height: 3,
    }
    .intersection(area);
    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    let paragraph = Paragraph::new(notice.text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}
