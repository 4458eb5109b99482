use crate::storage::entity::{JobRecord, JobStatus};
use std::fmt;
use std::str::FromStr;

/// 状态筛选条件，`All` 对应哨兵值 "all"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }

    /// All → 未投递 → … → 已通过 → All
    pub fn cycle(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(JobStatus::ALL[0].label().to_string()),
            StatusFilter::Only(s) => match s.parse::<JobStatus>() {
                Ok(JobStatus::Passed) | Err(_) => StatusFilter::All,
                Ok(st) => StatusFilter::Only(st.next().label().to_string()),
            },
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("全部"),
            StatusFilter::Only(s) => f.write_str(s),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("all") || t == "全部" {
            return Ok(StatusFilter::All);
        }
        t.parse::<JobStatus>()
            .map(|st| StatusFilter::Only(st.label().to_string()))
            .map_err(|_| format!("未知状态: {}", t))
    }
}

/// 按搜索词（公司名/岗位名，不区分大小写的子串匹配）和状态筛选，保持原顺序
pub fn filter(records: &[JobRecord], search: &str, status: &StatusFilter) -> Vec<JobRecord> {
    let term = search.trim().to_lowercase();
    records
        .iter()
        .filter(|job| {
            let matches_search = term.is_empty()
                || job.company_name.to_lowercase().contains(&term)
                || job.job_title.to_lowercase().contains(&term);
            matches_search && status.matches(&job.status)
        })
        .cloned()
        .collect()
}
