use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub seed_samples: bool,
    pub notice_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("logs"),
            seed_samples: true,
            notice_ttl: Duration::from_millis(2000),
        }
    }
}

impl AppConfig {
    /// 从环境变量读取配置，返回配置和启动提示信息
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let mut info = Vec::new();

        if let Some(dir) = lookup("JOBTRACK_DATA_DIR").filter(|s| !s.trim().is_empty()) {
            cfg.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(dir) = lookup("JOBTRACK_LOG_DIR").filter(|s| !s.trim().is_empty()) {
            cfg.log_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = lookup("JOBTRACK_SEED_SAMPLES") {
            match parse_bool(&raw) {
                Some(v) => cfg.seed_samples = v,
                None => info.push(format!(
                    "⚠ JOBTRACK_SEED_SAMPLES 取值无效: {}，使用默认值",
                    raw
                )),
            }
        }
        if let Some(raw) = lookup("JOBTRACK_NOTICE_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => cfg.notice_ttl = Duration::from_millis(ms),
                Err(_) => info.push(format!(
                    "⚠ JOBTRACK_NOTICE_MS 取值无效: {}，使用默认值",
                    raw
                )),
            }
        }

        info.push(format!("数据目录: {}", cfg.data_dir.display()));
        (cfg, info)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let (cfg, info) = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert!(cfg.seed_samples);
        assert_eq!(cfg.notice_ttl, Duration::from_millis(2000));
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn reads_overrides() {
        let (cfg, _) = AppConfig::from_lookup(lookup_from(&[
            ("JOBTRACK_DATA_DIR", "/tmp/jobs"),
            ("JOBTRACK_SEED_SAMPLES", "off"),
            ("JOBTRACK_NOTICE_MS", "500"),
        ]));
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/jobs"));
        assert!(!cfg.seed_samples);
        assert_eq!(cfg.notice_ttl, Duration::from_millis(500));
    }

    #[test]
    fn invalid_values_fall_back_with_warning() {
        let (cfg, info) = AppConfig::from_lookup(lookup_from(&[
            ("JOBTRACK_SEED_SAMPLES", "maybe"),
            ("JOBTRACK_NOTICE_MS", "soon"),
        ]));
        assert!(cfg.seed_samples);
        assert_eq!(cfg.notice_ttl, Duration::from_millis(2000));
        assert_eq!(info.iter().filter(|m| m.starts_with('⚠')).count(), 2);
    }
}
