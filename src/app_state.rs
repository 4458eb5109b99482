use crate::commands::{parse_ui_command, AppCommand, UiCommand, COMMAND_NAMES};
use crate::storage::entity::{JobFields, JobRecord, JobStatus};
use crate::view::{self, StatusFilter};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(PartialEq, Debug, Clone)]
pub enum ViewMode {
    List,
    Detail,
}

#[derive(PartialEq, Debug, Clone)]
pub enum InputMode {
    Normal,
    Command,
    Search,
    Form,
    Confirm,
}

#[derive(Debug, PartialEq)]
pub enum AppEvent {
    Log(String),
    Message(String),
    Notice(String),
    Error(String),
    Records(Vec<JobRecord>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Company,
    Title,
    Salary,
    Location,
    Requirements,
    Notes,
    Status,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Company,
        FormField::Title,
        FormField::Salary,
        FormField::Location,
        FormField::Requirements,
        FormField::Notes,
        FormField::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Company => "公司名称 *",
            FormField::Title => "岗位名称 *",
            FormField::Salary => "薪资",
            FormField::Location => "地点",
            FormField::Requirements => "岗位要求",
            FormField::Notes => "备注",
            FormField::Status => "状态",
        }
    }

    pub fn multiline(self) -> bool {
        matches!(self, FormField::Requirements | FormField::Notes)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobForm {
    pub company_name: String,
    pub job_title: String,
    pub salary: String,
    pub location: String,
    pub requirements: String,
    pub notes: String,
    pub status: JobStatus,
    pub focus: Option<FormField>,
}

impl JobForm {
    pub fn from_record(job: &JobRecord) -> Self {
        Self {
            company_name: job.company_name.clone(),
            job_title: job.job_title.clone(),
            salary: job.salary.clone(),
            location: job.location.clone(),
            requirements: job.requirements.clone(),
            notes: job.notes.clone(),
            status: JobStatus::from_str(&job.status).unwrap_or_default(),
            focus: Some(FormField::Company),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Company => &self.company_name,
            FormField::Title => &self.job_title,
            FormField::Salary => &self.salary,
            FormField::Location => &self.location,
            FormField::Requirements => &self.requirements,
            FormField::Notes => &self.notes,
            FormField::Status => self.status.label(),
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Company => Some(&mut self.company_name),
            FormField::Title => Some(&mut self.job_title),
            FormField::Salary => Some(&mut self.salary),
            FormField::Location => Some(&mut self.location),
            FormField::Requirements => Some(&mut self.requirements),
            FormField::Notes => Some(&mut self.notes),
            FormField::Status => None,
        }
    }

    /// 去掉首尾空白后的字段；公司名称和岗位名称必填
    pub fn to_fields(&self) -> Result<JobFields, String> {
        let fields = JobFields {
            company_name: self.company_name.trim().to_string(),
            job_title: self.job_title.trim().to_string(),
            salary: self.salary.trim().to_string(),
            location: self.location.trim().to_string(),
            requirements: self.requirements.trim().to_string(),
            notes: self.notes.trim().to_string(),
            status: self.status.label().to_string(),
        };
        if fields.company_name.is_empty() || fields.job_title.is_empty() {
            return Err("请填写公司名称和岗位名称".to_string());
        }
        Ok(fields)
    }
}

/// 根据表单和当前编辑中的 id 构造提交命令
pub fn form_submit_command(form: &JobForm, editing: Option<&str>) -> Result<AppCommand, String> {
    let fields = form.to_fields()?;
    Ok(match editing {
        Some(id) => AppCommand::Update {
            id: id.to_string(),
            patch: fields.into(),
        },
        None => AppCommand::Add { fields },
    })
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub jobs_all: Vec<JobRecord>,
    pub job_list: Vec<JobRecord>,
    pub selected_index: usize,
    pub job_table_state: TableState,
    pub detail_id: Option<String>,
    pub detail_scroll: u16,
    pub form: JobForm,
    pub editing: Option<String>,
    pub pending_delete: Option<String>,
    pub search_query: String,
    pub filter_status: StatusFilter,
    pub command_input: String,
    pub command_cursor: usize,
    pub command_history: Vec<String>,
    pub command_history_index: Option<usize>,
    pub notice: Option<Notice>,
    pub notice_ttl: Duration,
    pub log_messages: Vec<String>,
    pub cmd_tx: mpsc::UnboundedSender<AppCommand>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
}

impl App {
    pub fn new(
        startup_info: Vec<String>,
        notice_ttl: Duration,
        cmd_tx: mpsc::UnboundedSender<AppCommand>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["应用已启动".to_string()];
        log_messages.extend(startup_info);

        App {
            view_mode: ViewMode::List,
            input_mode: InputMode::Normal,
            jobs_all: Vec::new(),
            job_list: Vec::new(),
            selected_index: 0,
            job_table_state: {
                let mut s = TableState::default();
                s.select(Some(0));
                s
            },
            detail_id: None,
            detail_scroll: 0,
            form: JobForm::default(),
            editing: None,
            pending_delete: None,
            search_query: String::new(),
            filter_status: StatusFilter::All,
            command_input: String::new(),
            command_cursor: 0,
            command_history: Vec::new(),
            command_history_index: None,
            notice: None,
            notice_ttl,
            log_messages,
            cmd_tx,
            evt_rx: Some(evt_rx),
        }
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    fn show_notice(&mut self, text: String, kind: NoticeKind) {
        let log_line = match kind {
            NoticeKind::Info if !text.starts_with('✓') => format!("✓ {}", text),
            NoticeKind::Error if !text.starts_with('✗') && !text.starts_with('⚠') => {
                format!("✗ {}", text)
            }
            _ => text.clone(),
        };
        self.add_log(log_line);
        self.notice = Some(Notice {
            text,
            kind,
            expires_at: Instant::now() + self.notice_ttl,
        });
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.show_notice(text.into(), NoticeKind::Info);
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.show_notice(text.into(), NoticeKind::Error);
    }

    /// 清除已过期的通知
    pub fn tick(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.notice = None;
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Log(msg) | AppEvent::Message(msg) => self.add_log(msg),
            AppEvent::Notice(msg) => self.notify(msg),
            AppEvent::Error(msg) => self.notify_error(msg),
            AppEvent::Records(list) => {
                self.jobs_all = list;
                self.apply_filters();
            }
        }
    }

    pub fn clamp_selection(&mut self) {
        if self.selected_index >= self.job_list.len() {
            self.selected_index = self.job_list.len().saturating_sub(1);
        }
        self.job_table_state.select(Some(self.selected_index));
    }

    pub fn apply_filters(&mut self) {
        self.job_list = view::filter(&self.jobs_all, &self.search_query, &self.filter_status);
        self.clamp_selection();
    }

    pub fn clear_filters(&mut self) {
        self.search_query.clear();
        self.filter_status = StatusFilter::All;
        self.apply_filters();
        self.notify("筛选条件已清除");
    }

    pub fn detail_record(&self) -> Option<&JobRecord> {
        let id = self.detail_id.as_deref()?;
        self.jobs_all.iter().find(|j| j.id == id)
    }

    /// 详情页对应详情记录，列表页对应选中行
    fn current_job(&self) -> Option<&JobRecord> {
        match self.view_mode {
            ViewMode::Detail => self.detail_record(),
            ViewMode::List => self.job_list.get(self.selected_index),
        }
    }

    pub fn open_add_form(&mut self) {
        self.editing = None;
        self.form = JobForm {
            focus: Some(FormField::Company),
            ..Default::default()
        };
        self.input_mode = InputMode::Form;
    }

    pub fn start_edit(&mut self) {
        let Some((id, form)) = self
            .current_job()
            .map(|job| (job.id.clone(), JobForm::from_record(job)))
        else {
            self.add_log("⚠ 没有可编辑的记录".to_string());
            return;
        };
        self.form = form;
        self.editing = Some(id);
        self.input_mode = InputMode::Form;
    }

    pub fn cancel_edit(&mut self) {
        let was_editing = self.editing.is_some();
        self.reset_form();
        if was_editing {
            self.notify("已取消编辑");
        }
    }

    fn reset_form(&mut self) {
        self.form = JobForm::default();
        self.editing = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_form(&mut self) {
        match form_submit_command(&self.form, self.editing.as_deref()) {
            Ok(cmd) => {
                let _ = self.cmd_tx.send(cmd);
                self.reset_form();
            }
            Err(msg) => self.notify_error(msg),
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(id) = self.current_job().map(|j| j.id.clone()) {
            self.pending_delete = Some(id);
            self.input_mode = InputMode::Confirm;
        }
    }

    pub fn open_detail(&mut self) {
        if let Some(job) = self.job_list.get(self.selected_index) {
            self.detail_id = Some(job.id.clone());
            self.detail_scroll = 0;
            self.view_mode = ViewMode::Detail;
        }
    }

    pub fn close_detail(&mut self) {
        self.view_mode = ViewMode::List;
        self.detail_id = None;
    }

    /// 获取当前的预测建议
    pub fn get_completion_hint(&self) -> Option<String> {
        let input = self.command_input.trim_start();
        if input.is_empty() || input.contains(char::is_whitespace) {
            return None;
        }
        COMMAND_NAMES
            .iter()
            .find(|cmd| cmd.starts_with(input) && **cmd != input)
            .map(|cmd| cmd[input.len()..].to_string())
    }

    fn run_ui_command(&mut self, cmd: UiCommand) {
        match cmd {
            UiCommand::Search(text) => {
                self.search_query = text;
                self.apply_filters();
            }
            UiCommand::Status(status) => {
                self.filter_status = status;
                self.apply_filters();
            }
            UiCommand::Clear => self.clear_filters(),
            UiCommand::Add => self.open_add_form(),
            UiCommand::Edit => self.start_edit(),
            UiCommand::Delete => self.request_delete(),
        }
    }

    fn leave_command_mode(&mut self) {
        self.command_input.clear();
        self.command_cursor = 0;
        if self.input_mode == InputMode::Command {
            self.input_mode = InputMode::Normal;
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                let cmd_owned = self.command_input.trim().to_string();
                self.input_mode = InputMode::Normal;
                if cmd_owned.is_empty() {
                    self.leave_command_mode();
                    return false;
                }
                self.command_history.push(cmd_owned.clone());
                self.command_history_index = None;
                self.leave_command_mode();

                if let Some(parsed) = parse_ui_command(&cmd_owned) {
                    match parsed {
                        Ok(cmd) => self.run_ui_command(cmd),
                        Err(usage) => self.notify_error(usage),
                    }
                    return false;
                }
                let app_cmd = AppCommand::from_str(&cmd_owned)
                    .unwrap_or_else(|_| AppCommand::Unknown(cmd_owned.clone()));
                let quit = app_cmd == AppCommand::Quit;
                let _ = self.cmd_tx.send(app_cmd);
                quit
            }
            KeyCode::Esc => {
                self.leave_command_mode();
                false
            }
            KeyCode::Tab => {
                if let Some(hint) = self.get_completion_hint() {
                    let insert = format!("{} ", hint);
                    let at = byte_index(&self.command_input, self.command_cursor);
                    self.command_input.insert_str(at, &insert);
                    self.command_cursor += insert.chars().count();
                }
                false
            }
            KeyCode::Up => {
                if self.command_history.is_empty() {
                    return false;
                }
                let next = match self.command_history_index {
                    None => self.command_history.len().saturating_sub(1),
                    Some(i) => i.saturating_sub(1),
                };
                self.command_history_index = Some(next);
                if let Some(cmd) = self.command_history.get(next) {
                    self.command_input = cmd.clone();
                    self.command_cursor = self.command_input.chars().count();
                }
                false
            }
            KeyCode::Down => {
                let Some(i) = self.command_history_index else {
                    return false;
                };
                let n = i + 1;
                if n >= self.command_history.len() {
                    self.command_history_index = None;
                    self.command_input.clear();
                    self.command_cursor = 0;
                    return false;
                }
                self.command_history_index = Some(n);
                if let Some(cmd) = self.command_history.get(n) {
                    self.command_input = cmd.clone();
                    self.command_cursor = self.command_input.chars().count();
                }
                false
            }
            KeyCode::Backspace => {
                if self.command_cursor > 0 {
                    self.command_cursor -= 1;
                    let at = byte_index(&self.command_input, self.command_cursor);
                    self.command_input.remove(at);
                }
                false
            }
            KeyCode::Delete => {
                if self.command_cursor < self.command_input.chars().count() {
                    let at = byte_index(&self.command_input, self.command_cursor);
                    self.command_input.remove(at);
                }
                false
            }
            KeyCode::Left => {
                self.command_cursor = self.command_cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                if self.command_cursor < self.command_input.chars().count() {
                    self.command_cursor += 1;
                }
                false
            }
            KeyCode::Home => {
                self.command_cursor = 0;
                false
            }
            KeyCode::End => {
                self.command_cursor = self.command_input.chars().count();
                false
            }
            KeyCode::Char(c) => {
                let at = byte_index(&self.command_input, self.command_cursor);
                self.command_input.insert(at, c);
                self.command_cursor += 1;
                false
            }
            _ => false,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.search_query.pop();
                self.apply_filters();
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.apply_filters();
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let focus = self.form.focus.unwrap_or(FormField::Company);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Char('s') if ctrl => self.submit_form(),
            KeyCode::Enter => {
                if focus.multiline() {
                    if let Some(text) = self.form.text_mut(focus) {
                        text.push('\n');
                    }
                } else {
                    self.submit_form();
                }
            }
            KeyCode::Tab | KeyCode::Down => self.form.focus = Some(focus.next()),
            KeyCode::BackTab | KeyCode::Up => self.form.focus = Some(focus.prev()),
            KeyCode::Left if focus == FormField::Status => {
                self.form.status = self.form.status.prev();
            }
            KeyCode::Right | KeyCode::Char(' ') if focus == FormField::Status => {
                self.form.status = self.form.status.next();
            }
            KeyCode::Backspace => {
                if let Some(text) = self.form.text_mut(focus) {
                    text.pop();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(text) = self.form.text_mut(focus) {
                    text.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(id) = self.pending_delete.take() {
                    if self.detail_id.as_deref() == Some(id.as_str()) {
                        self.close_detail();
                    }
                    let _ = self.cmd_tx.send(AppCommand::Delete { id });
                }
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    /// 返回 true 表示退出应用
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        match self.input_mode {
            InputMode::Command => return self.handle_command_key(key),
            InputMode::Search => {
                self.handle_search_key(key);
                return false;
            }
            InputMode::Form => {
                self.handle_form_key(key);
                return false;
            }
            InputMode::Confirm => {
                self.handle_confirm_key(key);
                return false;
            }
            InputMode::Normal => {}
        }

        // 正常模式下的按键处理
        match key.code {
            KeyCode::Char('q') => true,
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                self.command_cursor = 0;
                false
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.view_mode == ViewMode::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else if self.selected_index > 0 {
                    self.selected_index -= 1;
                    self.job_table_state.select(Some(self.selected_index));
                }
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.view_mode == ViewMode::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                } else if self.selected_index < self.job_list.len().saturating_sub(1) {
                    self.selected_index += 1;
                    self.job_table_state.select(Some(self.selected_index));
                }
                false
            }
            KeyCode::Enter => {
                if self.view_mode == ViewMode::List {
                    self.open_detail();
                }
                false
            }
            KeyCode::Esc | KeyCode::Char('x') => {
                if self.view_mode == ViewMode::Detail {
                    self.close_detail();
                }
                false
            }
            KeyCode::Char('a') => {
                self.open_add_form();
                false
            }
            KeyCode::Char('e') => {
                self.start_edit();
                false
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.request_delete();
                false
            }
            KeyCode::Char('s') => {
                self.input_mode = InputMode::Search;
                false
            }
            KeyCode::Char('f') => {
                self.filter_status = self.filter_status.cycle();
                self.apply_filters();
                false
            }
            KeyCode::Char('c') => {
                self.clear_filters();
                false
            }
            KeyCode::Char('r') => {
                let _ = self.cmd_tx.send(AppCommand::Refresh);
                false
            }
            _ => false,
        }
    }
}
