pub mod job_record;

pub use job_record::{JobFields, JobPatch, JobRecord, JobStatus};
