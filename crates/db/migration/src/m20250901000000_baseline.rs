use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Users::Table)
                    .col(pk_id_col(manager, Users::Id))
                    .col(uuid_col(Users::Uuid))
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(Users::GlobalRole)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("viewer")),
                    )
                    .col(
                        ColumnDef::new(Users::PasswordSet)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(timestamp_col(Users::CreatedAt))
                    .col(timestamp_col(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_users_uuid")
                    .table(Users::Table)
                    .col(Users::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(SuperUsers::Table)
                    .col(pk_id_col(manager, SuperUsers::Id))
                    .col(uuid_col(SuperUsers::Uuid))
                    .col(fk_id_col(manager, SuperUsers::UserId))
                    .col(timestamp_col(SuperUsers::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_super_users_user_id")
                            .from(SuperUsers::Table, SuperUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_super_users_user_id")
                    .table(SuperUsers::Table)
                    .col(SuperUsers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Workspaces::Table)
                    .col(pk_id_col(manager, Workspaces::Id))
                    .col(uuid_col(Workspaces::Uuid))
                    .col(ColumnDef::new(Workspaces::Name).string().not_null())
                    .col(ColumnDef::new(Workspaces::Description).text())
                    .col(fk_id_col(manager, Workspaces::CreatedBy))
                    .col(timestamp_col(Workspaces::CreatedAt))
                    .col(timestamp_col(Workspaces::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspaces_created_by")
                            .from(Workspaces::Table, Workspaces::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_workspaces_uuid")
                    .table(Workspaces::Table)
                    .col(Workspaces::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(WorkspaceMembers::Table)
                    .col(pk_id_col(manager, WorkspaceMembers::Id))
                    .col(uuid_col(WorkspaceMembers::Uuid))
                    .col(fk_id_col(manager, WorkspaceMembers::WorkspaceId))
                    .col(fk_id_col(manager, WorkspaceMembers::UserId))
                    .col(
                        ColumnDef::new(WorkspaceMembers::Role)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("viewer")),
                    )
                    .col(timestamp_col(WorkspaceMembers::CreatedAt))
                    .col(timestamp_col(WorkspaceMembers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspace_members_workspace_id")
                            .from(WorkspaceMembers::Table, WorkspaceMembers::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspace_members_user_id")
                            .from(WorkspaceMembers::Table, WorkspaceMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_workspace_members_uuid")
                    .table(WorkspaceMembers::Table)
                    .col(WorkspaceMembers::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_workspace_members_unique")
                    .table(WorkspaceMembers::Table)
                    .col(WorkspaceMembers::WorkspaceId)
                    .col(WorkspaceMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Projects::Table)
                    .col(pk_id_col(manager, Projects::Id))
                    .col(uuid_col(Projects::Uuid))
                    .col(fk_id_col(manager, Projects::WorkspaceId))
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Summary).text())
                    .col(
                        ColumnDef::new(Projects::Status)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("ativo")),
                    )
                    .col(fk_id_col(manager, Projects::CreatedBy))
                    .col(timestamp_col(Projects::CreatedAt))
                    .col(timestamp_col(Projects::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_workspace_id")
                            .from(Projects::Table, Projects::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_created_by")
                            .from(Projects::Table, Projects::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_projects_uuid")
                    .table(Projects::Table)
                    .col(Projects::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_projects_workspace_id")
                    .table(Projects::Table)
                    .col(Projects::WorkspaceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(ProjectMembers::Table)
                    .col(pk_id_col(manager, ProjectMembers::Id))
                    .col(uuid_col(ProjectMembers::Uuid))
                    .col(fk_id_col(manager, ProjectMembers::ProjectId))
                    .col(fk_id_col(manager, ProjectMembers::UserId))
                    .col(
                        ColumnDef::new(ProjectMembers::Role)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("viewer")),
                    )
                    .col(timestamp_col(ProjectMembers::CreatedAt))
                    .col(timestamp_col(ProjectMembers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_members_project_id")
                            .from(ProjectMembers::Table, ProjectMembers::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_members_user_id")
                            .from(ProjectMembers::Table, ProjectMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_project_members_uuid")
                    .table(ProjectMembers::Table)
                    .col(ProjectMembers::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_project_members_unique")
                    .table(ProjectMembers::Table)
                    .col(ProjectMembers::ProjectId)
                    .col(ProjectMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Sectors::Table)
                    .col(pk_id_col(manager, Sectors::Id))
                    .col(uuid_col(Sectors::Uuid))
                    .col(fk_id_col(manager, Sectors::WorkspaceId))
                    .col(ColumnDef::new(Sectors::Name).string().not_null())
                    .col(ColumnDef::new(Sectors::Color).string().not_null())
                    .col(timestamp_col(Sectors::CreatedAt))
                    .col(timestamp_col(Sectors::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sectors_workspace_id")
                            .from(Sectors::Table, Sectors::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_sectors_uuid")
                    .table(Sectors::Table)
                    .col(Sectors::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_sectors_workspace_name")
                    .table(Sectors::Table)
                    .col(Sectors::WorkspaceId)
                    .col(Sectors::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(TaskTypes::Table)
                    .col(pk_id_col(manager, TaskTypes::Id))
                    .col(uuid_col(TaskTypes::Uuid))
                    .col(fk_id_col(manager, TaskTypes::WorkspaceId))
                    .col(ColumnDef::new(TaskTypes::Name).string().not_null())
                    .col(ColumnDef::new(TaskTypes::Color).string().not_null())
                    .col(timestamp_col(TaskTypes::CreatedAt))
                    .col(timestamp_col(TaskTypes::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_types_workspace_id")
                            .from(TaskTypes::Table, TaskTypes::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_types_uuid")
                    .table(TaskTypes::Table)
                    .col(TaskTypes::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_types_workspace_name")
                    .table(TaskTypes::Table)
                    .col(TaskTypes::WorkspaceId)
                    .col(TaskTypes::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Tasks::Table)
                    .col(pk_id_col(manager, Tasks::Id))
                    .col(uuid_col(Tasks::Uuid))
                    .col(fk_id_col(manager, Tasks::ProjectId))
                    .col(ColumnDef::new(Tasks::Name).string().not_null())
                    .col(ColumnDef::new(Tasks::Description).text())
                    .col(fk_id_nullable_col(manager, Tasks::SectorId))
                    .col(fk_id_nullable_col(manager, Tasks::TaskTypeId))
                    .col(
                        ColumnDef::new(Tasks::ExecutorIds)
                            .json()
                            .not_null()
                            .default(Expr::val("[]")),
                    )
                    .col(
                        ColumnDef::new(Tasks::ValidatorIds)
                            .json()
                            .not_null()
                            .default(Expr::val("[]")),
                    )
                    .col(
                        ColumnDef::new(Tasks::InformedIds)
                            .json()
                            .not_null()
                            .default(Expr::val("[]")),
                    )
                    .col(ColumnDef::new(Tasks::StartDate).date())
                    .col(ColumnDef::new(Tasks::DueDateOriginal).date())
                    .col(ColumnDef::new(Tasks::DueDateCurrent).date())
                    .col(ColumnDef::new(Tasks::EstimatedMinutes).big_integer())
                    .col(
                        ColumnDef::new(Tasks::ActualMinutes)
                            .big_integer()
                            .not_null()
                            .default(Expr::val(0)),
                    )
                    .col(
                        ColumnDef::new(Tasks::Priority)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("media")),
                    )
                    .col(
                        ColumnDef::new(Tasks::Status)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("backlog")),
                    )
                    .col(
                        ColumnDef::new(Tasks::DisplayOrder)
                            .big_integer()
                            .not_null()
                            .default(Expr::val(0)),
                    )
                    .col(fk_id_col(manager, Tasks::CreatedBy))
                    .col(timestamp_col(Tasks::CreatedAt))
                    .col(timestamp_col(Tasks::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_project_id")
                            .from(Tasks::Table, Tasks::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_sector_id")
                            .from(Tasks::Table, Tasks::SectorId)
                            .to(Sectors::Table, Sectors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_task_type_id")
                            .from(Tasks::Table, Tasks::TaskTypeId)
                            .to(TaskTypes::Table, TaskTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_created_by")
                            .from(Tasks::Table, Tasks::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tasks_uuid")
                    .table(Tasks::Table)
                    .col(Tasks::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tasks_project_id")
                    .table(Tasks::Table)
                    .col(Tasks::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tasks_status")
                    .table(Tasks::Table)
                    .col(Tasks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(TaskTimeEntries::Table)
                    .col(pk_id_col(manager, TaskTimeEntries::Id))
                    .col(uuid_col(TaskTimeEntries::Uuid))
                    .col(fk_id_col(manager, TaskTimeEntries::TaskId))
                    .col(ColumnDef::new(TaskTimeEntries::StartedAt).timestamp())
                    .col(ColumnDef::new(TaskTimeEntries::EndedAt).timestamp())
                    .col(
                        ColumnDef::new(TaskTimeEntries::DurationMinutes)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaskTimeEntries::Source)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaskTimeEntries::Note).text())
                    .col(fk_id_col(manager, TaskTimeEntries::CreatedBy))
                    .col(timestamp_col(TaskTimeEntries::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_time_entries_task_id")
                            .from(TaskTimeEntries::Table, TaskTimeEntries::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_time_entries_uuid")
                    .table(TaskTimeEntries::Table)
                    .col(TaskTimeEntries::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_time_entries_task_id")
                    .table(TaskTimeEntries::Table)
                    .col(TaskTimeEntries::TaskId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(TaskDueDateChanges::Table)
                    .col(pk_id_col(manager, TaskDueDateChanges::Id))
                    .col(uuid_col(TaskDueDateChanges::Uuid))
                    .col(fk_id_col(manager, TaskDueDateChanges::TaskId))
                    .col(ColumnDef::new(TaskDueDateChanges::PreviousDate).date())
                    .col(ColumnDef::new(TaskDueDateChanges::NewDate).date().not_null())
                    .col(ColumnDef::new(TaskDueDateChanges::Reason).text().not_null())
                    .col(fk_id_col(manager, TaskDueDateChanges::CreatedBy))
                    .col(timestamp_col(TaskDueDateChanges::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_due_date_changes_task_id")
                            .from(TaskDueDateChanges::Table, TaskDueDateChanges::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_due_date_changes_uuid")
                    .table(TaskDueDateChanges::Table)
                    .col(TaskDueDateChanges::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_due_date_changes_task_id")
                    .table(TaskDueDateChanges::Table)
                    .col(TaskDueDateChanges::TaskId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(TaskAuditLogs::Table)
                    .col(pk_id_col(manager, TaskAuditLogs::Id))
                    .col(uuid_col(TaskAuditLogs::Uuid))
                    .col(fk_id_col(manager, TaskAuditLogs::TaskId))
                    .col(ColumnDef::new(TaskAuditLogs::FieldName).string().not_null())
                    .col(ColumnDef::new(TaskAuditLogs::OldValue).text())
                    .col(ColumnDef::new(TaskAuditLogs::NewValue).text())
                    .col(fk_id_col(manager, TaskAuditLogs::CreatedBy))
                    .col(timestamp_col(TaskAuditLogs::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_audit_logs_task_id")
                            .from(TaskAuditLogs::Table, TaskAuditLogs::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_audit_logs_uuid")
                    .table(TaskAuditLogs::Table)
                    .col(TaskAuditLogs::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_audit_logs_task_id")
                    .table(TaskAuditLogs::Table)
                    .col(TaskAuditLogs::TaskId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(TaskComments::Table)
                    .col(pk_id_col(manager, TaskComments::Id))
                    .col(uuid_col(TaskComments::Uuid))
                    .col(fk_id_col(manager, TaskComments::TaskId))
                    .col(ColumnDef::new(TaskComments::Content).text().not_null())
                    .col(fk_id_col(manager, TaskComments::CreatedBy))
                    .col(timestamp_col(TaskComments::CreatedAt))
                    .col(timestamp_col(TaskComments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_comments_task_id")
                            .from(TaskComments::Table, TaskComments::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_comments_uuid")
                    .table(TaskComments::Table)
                    .col(TaskComments::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_task_comments_task_id")
                    .table(TaskComments::Table)
                    .col(TaskComments::TaskId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(FeedPosts::Table)
                    .col(pk_id_col(manager, FeedPosts::Id))
                    .col(uuid_col(FeedPosts::Uuid))
                    .col(fk_id_col(manager, FeedPosts::WorkspaceId))
                    .col(ColumnDef::new(FeedPosts::Content).text().not_null())
                    .col(
                        ColumnDef::new(FeedPosts::TaskIds)
                            .json()
                            .not_null()
                            .default(Expr::val("[]")),
                    )
                    .col(
                        ColumnDef::new(FeedPosts::MentionedUserIds)
                            .json()
                            .not_null()
                            .default(Expr::val("[]")),
                    )
                    .col(fk_id_col(manager, FeedPosts::CreatedBy))
                    .col(timestamp_col(FeedPosts::CreatedAt))
                    .col(timestamp_col(FeedPosts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feed_posts_workspace_id")
                            .from(FeedPosts::Table, FeedPosts::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_feed_posts_uuid")
                    .table(FeedPosts::Table)
                    .col(FeedPosts::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_feed_posts_workspace_id")
                    .table(FeedPosts::Table)
                    .col(FeedPosts::WorkspaceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Notifications::Table)
                    .col(pk_id_col(manager, Notifications::Id))
                    .col(uuid_col(Notifications::Uuid))
                    .col(fk_id_col(manager, Notifications::FeedPostId))
                    .col(fk_id_col(manager, Notifications::RecipientId))
                    .col(
                        ColumnDef::new(Notifications::Read)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(timestamp_col(Notifications::CreatedAt))
                    .col(timestamp_col(Notifications::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_feed_post_id")
                            .from(Notifications::Table, Notifications::FeedPostId)
                            .to(FeedPosts::Table, FeedPosts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_recipient_id")
                            .from(Notifications::Table, Notifications::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_notifications_uuid")
                    .table(Notifications::Table)
                    .col(Notifications::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_notifications_unique")
                    .table(Notifications::Table)
                    .col(Notifications::FeedPostId)
                    .col(Notifications::RecipientId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_notifications_recipient_id")
                    .table(Notifications::Table)
                    .col(Notifications::RecipientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Presence::Table)
                    .col(pk_id_col(manager, Presence::Id))
                    .col(uuid_col(Presence::Uuid))
                    .col(fk_id_col(manager, Presence::WorkspaceId))
                    .col(fk_id_col(manager, Presence::UserId))
                    .col(timestamp_col(Presence::LastSeenAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_presence_workspace_id")
                            .from(Presence::Table, Presence::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_presence_user_id")
                            .from(Presence::Table, Presence::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_presence_uuid")
                    .table(Presence::Table)
                    .col(Presence::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_presence_unique")
                    .table(Presence::Table)
                    .col(Presence::WorkspaceId)
                    .col(Presence::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Presence::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeedPosts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskAuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskDueDateChanges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskTimeEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sectors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkspaceMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workspaces::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SuperUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn pk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

fn fk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().to_owned()
}

fn fk_id_nullable_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.to_owned()
}

fn uuid_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().to_owned()
}

fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Uuid,
    Email,
    DisplayName,
    GlobalRole,
    PasswordSet,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SuperUsers {
    Table,
    Id,
    Uuid,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Workspaces {
    Table,
    Id,
    Uuid,
    Name,
    Description,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WorkspaceMembers {
    Table,
    Id,
    Uuid,
    WorkspaceId,
    UserId,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    Uuid,
    WorkspaceId,
    Name,
    Summary,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProjectMembers {
    Table,
    Id,
    Uuid,
    ProjectId,
    UserId,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Sectors {
    Table,
    Id,
    Uuid,
    WorkspaceId,
    Name,
    Color,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TaskTypes {
    Table,
    Id,
    Uuid,
    WorkspaceId,
    Name,
    Color,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    Uuid,
    ProjectId,
    Name,
    Description,
    SectorId,
    TaskTypeId,
    ExecutorIds,
    ValidatorIds,
    InformedIds,
    StartDate,
    DueDateOriginal,
    DueDateCurrent,
    EstimatedMinutes,
    ActualMinutes,
    Priority,
    Status,
    DisplayOrder,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TaskTimeEntries {
    Table,
    Id,
    Uuid,
    TaskId,
    StartedAt,
    EndedAt,
    DurationMinutes,
    Source,
    Note,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum TaskDueDateChanges {
    Table,
    Id,
    Uuid,
    TaskId,
    PreviousDate,
    NewDate,
    Reason,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum TaskAuditLogs {
    Table,
    Id,
    Uuid,
    TaskId,
    FieldName,
    OldValue,
    NewValue,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum TaskComments {
    Table,
    Id,
    Uuid,
    TaskId,
    Content,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FeedPosts {
    Table,
    Id,
    Uuid,
    WorkspaceId,
    Content,
    TaskIds,
    MentionedUserIds,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    Uuid,
    FeedPostId,
    RecipientId,
    Read,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Presence {
    Table,
    Id,
    Uuid,
    WorkspaceId,
    UserId,
    LastSeenAt,
}
