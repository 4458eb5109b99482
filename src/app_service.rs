use crate::app_state::AppEvent;
use crate::commands::AppCommand;
use crate::storage::repository::JobStore;
use crate::storage::StoreError;
use log::{error, info, warn};
use tokio::sync::mpsc;

const HELP_TEXT: &str = "可用命令: search <关键词> | status <all|未投递|已投递|面试中|已拒绝|已通过> | clear | add | edit | delete | refresh | help | quit";

/// 独占记录集合的服务，命令逐条顺序执行
pub struct StoreService {
    store: JobStore,
}

impl StoreService {
    pub fn new(store: JobStore) -> Self {
        Self { store }
    }

    pub fn snapshot(&self) -> AppEvent {
        AppEvent::Records(self.store.all().to_vec())
    }

    pub fn handle(&mut self, cmd: AppCommand) -> Vec<AppEvent> {
        match cmd {
            AppCommand::Add { fields } => match self.store.add(fields) {
                Ok(record) => {
                    info!("Job added via UI: {} / {}", record.company_name, record.job_title);
                    vec![self.snapshot(), AppEvent::Notice("岗位添加成功！".to_string())]
                }
                Err(e) => self.persist_failed("添加", e),
            },
            AppCommand::Update { id, patch } => match self.store.update(&id, patch) {
                Ok(_) => vec![self.snapshot(), AppEvent::Notice("岗位更新成功！".to_string())],
                Err(StoreError::NotFound(id)) => {
                    warn!("Update target not found: {}", id);
                    vec![
                        self.snapshot(),
                        AppEvent::Log(format!("⚠ 未找到岗位记录 [ID: {}]，未更新", id)),
                    ]
                }
                Err(e) => self.persist_failed("更新", e),
            },
            AppCommand::Delete { id } => match self.store.remove(&id) {
                Ok(Some(_)) => vec![self.snapshot(), AppEvent::Notice("岗位删除成功！".to_string())],
                Ok(None) => {
                    warn!("Delete target not found: {}", id);
                    vec![
                        self.snapshot(),
                        AppEvent::Log(format!("⚠ 未找到岗位记录 [ID: {}]", id)),
                    ]
                }
                Err(e) => self.persist_failed("删除", e),
            },
            AppCommand::Refresh => vec![self.snapshot()],
            AppCommand::Help => vec![AppEvent::Message(HELP_TEXT.to_string())],
            AppCommand::Quit => vec![AppEvent::Message("收到退出命令".to_string())],
            AppCommand::Unknown(msg) => vec![AppEvent::Error(msg)],
        }
    }

    fn persist_failed(&self, action: &str, e: StoreError) -> Vec<AppEvent> {
        error!("Failed to persist after {}: {}", action, e);
        vec![
            self.snapshot(),
            AppEvent::Error(format!("✗ {}后保存失败: {}", action, e)),
        ]
    }

    pub async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<AppCommand>,
        evt_tx: mpsc::UnboundedSender<AppEvent>,
    ) {
        let _ = evt_tx.send(self.snapshot());
        while let Some(cmd) = cmd_rx.recv().await {
            let quit = cmd == AppCommand::Quit;
            for evt in self.handle(cmd) {
                let _ = evt_tx.send(evt);
            }
            if quit {
                break;
            }
        }
        info!("Store service stopped");
    }
}
