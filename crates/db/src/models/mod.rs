pub mod feed_post;
pub mod ids;
pub mod notification;
pub mod presence;
pub mod project;
pub mod project_member;
pub mod sector;
pub mod task;
pub mod task_audit_log;
pub mod task_comment;
pub mod task_due_date_change;
pub mod task_time_entry;
pub mod task_type;
pub mod user;
pub mod workspace;
pub mod workspace_member;
