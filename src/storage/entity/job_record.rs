use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 一条求职记录。序列化字段名保持 camelCase，与存储中的 JSON 一致。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
}

/// 新建记录时由表单提供的字段（不含 id / createdAt）
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct JobFields {
    pub company_name: String,
    pub job_title: String,
    pub salary: String,
    pub location: String,
    pub requirements: String,
    pub notes: String,
    pub status: String,
}

/// 更新时的合并补丁：None 表示保持原值
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct JobPatch {
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl From<JobFields> for JobPatch {
    fn from(fields: JobFields) -> Self {
        Self {
            company_name: Some(fields.company_name),
            job_title: Some(fields.job_title),
            salary: Some(fields.salary),
            location: Some(fields.location),
            requirements: Some(fields.requirements),
            notes: Some(fields.notes),
            status: Some(fields.status),
        }
    }
}

impl JobRecord {
    pub fn new(id: String, created_at: String, fields: JobFields) -> Self {
        Self {
            id,
            company_name: fields.company_name,
            job_title: fields.job_title,
            salary: fields.salary,
            location: fields.location,
            requirements: fields.requirements,
            notes: fields.notes,
            status: fields.status,
            created_at,
        }
    }

    /// 合并补丁，id 与 createdAt 不变
    pub fn apply(&mut self, patch: JobPatch) {
        let JobPatch {
            company_name,
            job_title,
            salary,
            location,
            requirements,
            notes,
            status,
        } = patch;
        if let Some(v) = company_name {
            self.company_name = v;
        }
        if let Some(v) = job_title {
            self.job_title = v;
        }
        if let Some(v) = salary {
            self.salary = v;
        }
        if let Some(v) = location {
            self.location = v;
        }
        if let Some(v) = requirements {
            self.requirements = v;
        }
        if let Some(v) = notes {
            self.notes = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
    }
}

/// 表单中可选的投递状态。记录本身只保存字符串，不做强制校验。
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    NotSubmitted,
    Submitted,
    Interviewing,
    Rejected,
    Passed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::NotSubmitted,
        JobStatus::Submitted,
        JobStatus::Interviewing,
        JobStatus::Rejected,
        JobStatus::Passed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::NotSubmitted => "未投递",
            JobStatus::Submitted => "已投递",
            JobStatus::Interviewing => "面试中",
            JobStatus::Rejected => "已拒绝",
            JobStatus::Passed => "已通过",
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            JobStatus::NotSubmitted => "not-submitted",
            JobStatus::Submitted => "submitted",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Rejected => "rejected",
            JobStatus::Passed => "passed",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|st| st.label() == t || st.alias().eq_ignore_ascii_case(t))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JobRecord {
        JobRecord::new(
            "42".to_string(),
            "2024-01-01T00:00:00.000Z".to_string(),
            JobFields {
                company_name: "Acme".to_string(),
                job_title: "Engineer".to_string(),
                status: "未投递".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["companyName"], "Acme");
        assert_eq!(json["jobTitle"], "Engineer");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let rec: JobRecord = serde_json::from_str(r#"{"id":"7","companyName":"X"}"#).unwrap();
        assert_eq!(rec.company_name, "X");
        assert_eq!(rec.job_title, "");
        assert_eq!(rec.status, "");
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut rec = sample();
        rec.apply(JobPatch {
            status: Some("面试中".to_string()),
            ..Default::default()
        });
        assert_eq!(rec.status, "面试中");
        assert_eq!(rec.company_name, "Acme");
        assert_eq!(rec.id, "42");
        assert_eq!(rec.created_at, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn status_parses_labels_and_aliases() {
        assert_eq!("已投递".parse::<JobStatus>(), Ok(JobStatus::Submitted));
        assert_eq!("Interviewing".parse::<JobStatus>(), Ok(JobStatus::Interviewing));
        assert!("unknown".parse::<JobStatus>().is_err());
        assert_eq!(JobStatus::Passed.next(), JobStatus::NotSubmitted);
        assert_eq!(JobStatus::NotSubmitted.prev(), JobStatus::Passed);
    }
}
