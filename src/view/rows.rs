use crate::storage::entity::JobRecord;
use chrono::{DateTime, Local, TimeZone};

/// 列表中一行要显示的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub company_name: String,
    pub job_title: String,
    pub salary: String,
    pub location: String,
    pub status: String,
    pub created_at: String,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

pub fn rows(records: &[JobRecord]) -> Vec<JobRow> {
    records
        .iter()
        .map(|job| JobRow {
            company_name: or_placeholder(&job.company_name, "-"),
            job_title: or_placeholder(&job.job_title, "-"),
            salary: or_placeholder(&job.salary, "-"),
            location: or_placeholder(&job.location, "-"),
            status: or_placeholder(&job.status, "未设置"),
            created_at: format_date(&job.created_at),
        })
        .collect()
}

/// 本地时间 `YYYY-MM-DD HH:MM`；无法解析时返回 "-"
pub fn format_date(created_at: &str) -> String {
    format_date_in(created_at, &Local)
}

pub fn format_date_in<Tz>(created_at: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(dt) => dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => "-".to_string(),
    }
}

/// 详情视图的 (标签, 值) 列表
pub fn detail_lines(job: &JobRecord) -> Vec<(&'static str, String)> {
    vec![
        ("公司名称", or_placeholder(&job.company_name, "未填写")),
        ("岗位名称", or_placeholder(&job.job_title, "未填写")),
        ("薪资", or_placeholder(&job.salary, "未填写")),
        ("地点", or_placeholder(&job.location, "未填写")),
        ("状态", or_placeholder(&job.status, "未设置")),
        ("岗位要求", or_placeholder(&job.requirements, "无具体要求")),
        ("备注", or_placeholder(&job.notes, "无备注信息")),
        ("投递时间", format_date(&job.created_at)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::entity::JobFields;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn empty_fields_render_placeholders() {
        let job = JobRecord::new("1".to_string(), "bad".to_string(), JobFields::default());
        let row = &rows(&[job])[0];
        assert_eq!(row.company_name, "-");
        assert_eq!(row.salary, "-");
        assert_eq!(row.status, "未设置");
        assert_eq!(row.created_at, "-");
    }

    #[test]
    fn formats_in_requested_timezone() {
        let ts = "2024-03-05T23:07:00.000Z";
        assert_eq!(format_date_in(ts, &Utc), "2024-03-05 23:07");
        let east8 = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(format_date_in(ts, &east8), "2024-03-06 07:07");
    }

    #[test]
    fn detail_uses_descriptive_placeholders() {
        let job = JobRecord::new(
            "1".to_string(),
            String::new(),
            JobFields {
                company_name: "腾讯".to_string(),
                ..Default::default()
            },
        );
        let lines = detail_lines(&job);
        assert_eq!(lines[0], ("公司名称", "腾讯".to_string()));
        assert_eq!(lines[1].1, "未填写");
        assert_eq!(lines[5].1, "无具体要求");
        assert_eq!(lines[6].1, "无备注信息");
    }
}
