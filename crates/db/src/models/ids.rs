use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entities::{feed_post, project, sector, task, task_type, user, workspace};

pub async fn user_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    user::Entity::find()
        .select_only()
        .column(user::Column::Id)
        .filter(user::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn user_uuid_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Uuid>, DbErr> {
    user::Entity::find()
        .select_only()
        .column(user::Column::Uuid)
        .filter(user::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn workspace_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    workspace::Entity::find()
        .select_only()
        .column(workspace::Column::Id)
        .filter(workspace::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn workspace_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    workspace::Entity::find()
        .select_only()
        .column(workspace::Column::Uuid)
        .filter(workspace::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn project_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    project::Entity::find()
        .select_only()
        .column(project::Column::Id)
        .filter(project::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn project_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    project::Entity::find()
        .select_only()
        .column(project::Column::Uuid)
        .filter(project::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn task_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    task::Entity::find()
        .select_only()
        .column(task::Column::Id)
        .filter(task::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn task_uuid_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Uuid>, DbErr> {
    task::Entity::find()
        .select_only()
        .column(task::Column::Uuid)
        .filter(task::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn sector_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    sector::Entity::find()
        .select_only()
        .column(sector::Column::Id)
        .filter(sector::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn sector_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    sector::Entity::find()
        .select_only()
        .column(sector::Column::Uuid)
        .filter(sector::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn task_type_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    task_type::Entity::find()
        .select_only()
        .column(task_type::Column::Id)
        .filter(task_type::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn task_type_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    task_type::Entity::find()
        .select_only()
        .column(task_type::Column::Uuid)
        .filter(task_type::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

/// Row ids of every task under a workspace, via its projects. Used by the
/// activity-window queries.
pub async fn task_row_ids_for_workspace<C: ConnectionTrait>(
    db: &C,
    workspace_uuid: Uuid,
) -> Result<Vec<i64>, DbErr> {
    let Some(workspace_row_id) = workspace_id_by_uuid(db, workspace_uuid).await? else {
        return Ok(Vec::new());
    };
    let project_row_ids: Vec<i64> = project::Entity::find()
        .select_only()
        .column(project::Column::Id)
        .filter(project::Column::WorkspaceId.eq(workspace_row_id))
        .into_tuple()
        .all(db)
        .await?;
    if project_row_ids.is_empty() {
        return Ok(Vec::new());
    }
    task::Entity::find()
        .select_only()
        .column(task::Column::Id)
        .filter(task::Column::ProjectId.is_in(project_row_ids))
        .into_tuple()
        .all(db)
        .await
}

pub async fn feed_post_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    feed_post::Entity::find()
        .select_only()
        .column(feed_post::Column::Id)
        .filter(feed_post::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn feed_post_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    feed_post::Entity::find()
        .select_only()
        .column(feed_post::Column::Uuid)
        .filter(feed_post::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::models::{
        project::{CreateProject, Project},
        task::{CreateTask, Task},
        user::{CreateUser, User},
        workspace::{CreateWorkspace, Workspace},
    };

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn ids_roundtrip_and_uuid_resolution() {
        let db = setup_db().await;

        let user = User::create(
            &db,
            &CreateUser {
                email: "owner@example.com".to_string(),
                display_name: "Owner".to_string(),
                global_role: None,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let workspace_id = Uuid::new_v4();
        let workspace = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Test workspace".to_string(),
                description: None,
            },
            workspace_id,
            user.id,
        )
        .await
        .unwrap();
        assert_eq!(workspace.id, workspace_id);

        let workspace_row_id = workspace_id_by_uuid(&db, workspace_id)
            .await
            .unwrap()
            .expect("workspace row id");
        assert_eq!(
            workspace_uuid_by_id(&db, workspace_row_id).await.unwrap(),
            Some(workspace_id)
        );

        let project_id = Uuid::new_v4();
        let project = Project::create(
            &db,
            workspace_id,
            &CreateProject {
                name: "Test project".to_string(),
                summary: None,
                status: None,
            },
            project_id,
            user.id,
        )
        .await
        .unwrap();
        assert_eq!(project.id, project_id);
        assert_eq!(project.workspace_id, workspace_id);

        let task_id = Uuid::new_v4();
        let task = Task::create(
            &db,
            project_id,
            &CreateTask::from_name("Test task"),
            task_id,
            user.id,
        )
        .await
        .unwrap();
        assert_eq!(task.id, task_id);
        assert_eq!(task.project_id, project_id);

        let task_row_id = task_id_by_uuid(&db, task_id)
            .await
            .unwrap()
            .expect("task row id");
        assert_eq!(task_uuid_by_id(&db, task_row_id).await.unwrap(), Some(task_id));

        let all_task_rows = task_row_ids_for_workspace(&db, workspace_id).await.unwrap();
        assert_eq!(all_task_rows, vec![task_row_id]);
    }
}

