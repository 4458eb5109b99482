use crate::storage::entity::{JobFields, JobPatch, JobRecord};
use crate::storage::error::StoreError;
use crate::storage::slot::Slot;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};

/// 持久化槽中保存全部记录的 key
pub const STORAGE_KEY: &str = "it-jobs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// 槽中没有数据
    Absent,
    Loaded,
    /// 数据无法读取或解析，内存中为空集合
    Unreadable,
}

/// 内存中的记录集合，每次变更都把完整快照写回槽
pub struct JobStore {
    slot: Box<dyn Slot>,
    jobs: Vec<JobRecord>,
    load_state: LoadState,
}

impl JobStore {
    pub fn load(slot: Box<dyn Slot>) -> Self {
        let (jobs, load_state) = match slot.read(STORAGE_KEY) {
            Ok(None) => (Vec::new(), LoadState::Absent),
            Ok(Some(text)) => match serde_json::from_str::<Vec<JobRecord>>(&text) {
                Ok(jobs) => {
                    info!("Loaded {} job records", jobs.len());
                    (jobs, LoadState::Loaded)
                }
                Err(e) => {
                    warn!("Stored job records are malformed, starting empty: {}", e);
                    (Vec::new(), LoadState::Unreadable)
                }
            },
            Err(e) => {
                warn!("Failed to read stored job records, starting empty: {}", e);
                (Vec::new(), LoadState::Unreadable)
            }
        };
        Self {
            slot,
            jobs,
            load_state,
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn all(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn add(&mut self, fields: JobFields) -> Result<JobRecord, StoreError> {
        self.add_at(fields, Utc::now())
    }

    pub fn add_at(&mut self, fields: JobFields, now: DateTime<Utc>) -> Result<JobRecord, StoreError> {
        let id = next_id(now.timestamp_millis(), &self.jobs);
        let created_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let record = JobRecord::new(id, created_at, fields);
        self.jobs.insert(0, record.clone());
        info!("Added job record {}", record.id);
        self.persist()?;
        Ok(record)
    }

    /// 合并更新；id 不存在时不修改、不写盘
    pub fn update(&mut self, id: &str, patch: JobPatch) -> Result<JobRecord, StoreError> {
        let Some(job) = self.jobs.iter_mut().find(|j| j.id == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        job.apply(patch);
        let updated = job.clone();
        info!("Updated job record {}", id);
        self.persist()?;
        Ok(updated)
    }

    /// 删除匹配的记录（不存在则不变），随后写回剩余集合
    pub fn remove(&mut self, id: &str) -> Result<Option<JobRecord>, StoreError> {
        let removed = self
            .jobs
            .iter()
            .position(|j| j.id == id)
            .map(|idx| self.jobs.remove(idx));
        if removed.is_some() {
            info!("Removed job record {}", id);
        }
        self.persist()?;
        Ok(removed)
    }

    pub fn replace_all(&mut self, jobs: Vec<JobRecord>) -> Result<(), StoreError> {
        self.jobs = jobs;
        self.persist()
    }

    pub fn persist(&mut self) -> Result<(), StoreError> {
        let text = serde_json::to_string(&self.jobs)?;
        self.slot.write(STORAGE_KEY, &text)?;
        self.load_state = LoadState::Loaded;
        Ok(())
    }
}

/// 以毫秒时间戳作为 id，冲突时递增直到唯一
fn next_id(millis: i64, existing: &[JobRecord]) -> String {
    let mut candidate = millis;
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|j| j.id == id) {
            return id;
        }
        candidate += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::error::SlotError;
    use crate::storage::slot::{FileSlot, MemorySlot};
    use chrono::TimeZone;
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn fields(company: &str, title: &str, status: &str) -> JobFields {
        JobFields {
            company_name: company.to_string(),
            job_title: title.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    fn mem_store() -> JobStore {
        JobStore::load(Box::new(MemorySlot::default()))
    }

    struct FailingSlot;

    impl Slot for FailingSlot {
        fn read(&self, _key: &str) -> Result<Option<String>, SlotError> {
            Ok(None)
        }

        fn write(&mut self, key: &str, _value: &str) -> Result<(), SlotError> {
            Err(SlotError::Io {
                path: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    #[test]
    fn add_single_record() {
        let mut store = mem_store();
        let rec = store.add(fields("Acme", "Engineer", "未投递")).unwrap();
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0], rec);
        assert_eq!(rec.company_name, "Acme");
        assert_eq!(rec.status, "未投递");
    }

    #[test]
    fn newest_record_comes_first() {
        let mut store = mem_store();
        let a = store.add(fields("A", "a", "未投递")).unwrap();
        let b = store.add(fields("B", "b", "未投递")).unwrap();
        assert_eq!(store.all(), &[b, a][..]);
    }

    #[test]
    fn ids_stay_unique_within_same_millisecond() {
        let mut store = mem_store();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        for i in 0..5 {
            store.add_at(fields(&format!("C{}", i), "t", "未投递"), now).unwrap();
        }
        let ids: HashSet<_> = store.all().iter().map(|j| j.id.clone()).collect();
        assert_eq!(ids.len(), 5);
        assert!(ids.contains(&now.timestamp_millis().to_string()));
    }

    #[test]
    fn created_at_is_rfc3339_millis() {
        let mut store = mem_store();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let rec = store.add_at(fields("A", "a", "未投递"), now).unwrap();
        assert_eq!(rec.created_at, "2024-05-01T12:30:00.000Z");
    }

    #[test]
    fn update_merges_fields() {
        let mut store = mem_store();
        let rec = store.add(fields("Acme", "Engineer", "未投递")).unwrap();
        let updated = store
            .update(
                &rec.id,
                JobPatch {
                    status: Some("已投递".to_string()),
                    notes: Some("内推".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, "已投递");
        assert_eq!(updated.notes, "内推");
        assert_eq!(updated.company_name, "Acme");
        assert_eq!(updated.created_at, rec.created_at);
        assert_eq!(store.all()[0], updated);
    }

    #[test]
    fn update_missing_id_signals_not_found() {
        let mut store = mem_store();
        store.add(fields("Acme", "Engineer", "未投递")).unwrap();
        let before = store.all().to_vec();
        let err = store.update("nope", JobPatch::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "nope"));
        assert_eq!(store.all(), &before[..]);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut store = mem_store();
        store.add(fields("Acme", "Engineer", "未投递")).unwrap();
        let before = store.all().to_vec();
        assert!(store.remove("nope").unwrap().is_none());
        assert_eq!(store.all(), &before[..]);
    }

    #[test]
    fn remove_drops_matching_record() {
        let mut store = mem_store();
        let a = store.add(fields("A", "a", "未投递")).unwrap();
        let b = store.add(fields("B", "b", "未投递")).unwrap();
        let removed = store.remove(&a.id).unwrap();
        assert_eq!(removed, Some(a));
        assert_eq!(store.all(), &[b][..]);
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let mut store = JobStore::load(Box::new(FileSlot::new(dir.path())));
        assert_eq!(store.load_state(), LoadState::Absent);
        let a = store.add(fields("Acme", "Engineer", "未投递")).unwrap();
        let b = store.add(fields("腾讯", "后端开发工程师", "面试中")).unwrap();
        store
            .update(
                &a.id,
                JobPatch {
                    requirements: Some("1. 本科\n2. Rust".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        let c = store.add(fields("Tmp", "x", "已拒绝")).unwrap();
        store.remove(&c.id).unwrap();
        let snapshot = store.all().to_vec();
        assert_eq!(snapshot[0].id, b.id);

        let reloaded = JobStore::load(Box::new(FileSlot::new(dir.path())));
        assert_eq!(reloaded.load_state(), LoadState::Loaded);
        assert_eq!(reloaded.all(), &snapshot[..]);
    }

    #[test]
    fn malformed_blob_loads_empty() {
        let mut slot = MemorySlot::default();
        slot.write(STORAGE_KEY, "{not json").unwrap();
        let store = JobStore::load(Box::new(slot));
        assert!(store.all().is_empty());
        assert_eq!(store.load_state(), LoadState::Unreadable);
    }

    #[test]
    fn persist_failure_keeps_memory_state() {
        let mut store = JobStore::load(Box::new(FailingSlot));
        let err = store.add(fields("Acme", "Engineer", "未投递")).unwrap_err();
        assert!(matches!(err, StoreError::Persist(_)));
        assert_eq!(store.all().len(), 1);
    }
}
