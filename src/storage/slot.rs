use crate::storage::error::SlotError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 持久化槽：一个 key 对应一整块文本，写入总是整体覆盖
pub trait Slot: Send {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError>;
}

/// 每个 key 存为 `<dir>/<key>.json`
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn io_err(path: &Path, source: std::io::Error) -> SlotError {
    SlotError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(&path, e)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;
        let path = self.path_for(key);
        // 先写临时文件再 rename，避免留下写了一半的文件
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value).map_err(|e| io_err(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemorySlot {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
