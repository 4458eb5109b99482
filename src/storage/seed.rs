use crate::storage::entity::JobRecord;
use crate::storage::error::StoreError;
use crate::storage::repository::{JobStore, LoadState};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::info;

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    company: &str,
    title: &str,
    salary: &str,
    location: &str,
    requirements: &str,
    notes: &str,
    status: &str,
    created_at: DateTime<Utc>,
) -> JobRecord {
    JobRecord {
        id: id.to_string(),
        company_name: company.to_string(),
        job_title: title.to_string(),
        salary: salary.to_string(),
        location: location.to_string(),
        requirements: requirements.to_string(),
        notes: notes.to_string(),
        status: status.to_string(),
        created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// 与其他记录一样按创建时间倒序排列
pub fn sample_jobs(now: DateTime<Utc>) -> Vec<JobRecord> {
    vec![
        sample(
            "3",
            "字节跳动",
            "全栈开发工程师",
            "35k-50k",
            "北京",
            "1. 计算机相关专业背景\n2. 4年以上全栈开发经验\n3. 熟悉前后端技术栈\n4. 有大型项目经验",
            "准备面试中",
            "未投递",
            now - Duration::days(1),
        ),
        sample(
            "2",
            "腾讯",
            "后端开发工程师",
            "30k-45k",
            "深圳",
            "1. 本科及以上学历\n2. 5年以上后端开发经验\n3. 精通Java/Python\n4. 熟悉微服务架构",
            "技术面已通过",
            "面试中",
            now - Duration::days(3),
        ),
        sample(
            "1",
            "阿里巴巴",
            "前端开发工程师",
            "25k-35k",
            "杭州",
            "1. 本科及以上学历，计算机相关专业\n2. 3年以上前端开发经验\n3. 精通React/Vue等主流框架\n4. 熟悉Node.js和后端技术",
            "内推投递，等待面试",
            "已投递",
            now - Duration::days(7),
        ),
    ]
}

/// 集合为空时写入示例数据。无法解析的旧数据不会被覆盖。
pub fn seed_if_empty(store: &mut JobStore, now: DateTime<Utc>) -> Result<bool, StoreError> {
    if !store.all().is_empty() || store.load_state() == LoadState::Unreadable {
        return Ok(false);
    }
    store.replace_all(sample_jobs(now))?;
    info!("Seeded {} sample job records", store.all().len());
    Ok(true)
}
