//! `PostgreSQL` record store implementation.
//!
//! One repository instance is scoped to one environment's database; the
//! environment tag it carries is stamped onto every feedback item it reads.

use super::{
    models::{FeedbackRow, NewTaskRow, TaskRow},
    schema::{feedback, tasks},
};
use crate::sync::domain::{
    Environment, FeedbackId, FeedbackItem, FeedbackKind, FeedbackStatus, PersistedFeedbackData,
    PersistedTaskData, SourceRef, Task, TaskId, TaskPriority, TaskSource, TaskStatus, TaskType,
};
use crate::sync::ports::{InsertOutcome, PendingBatch, RecordStore, StoreError, StoreResult};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by sync adapters.
pub type SyncPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed record store for one environment.
#[derive(Debug, Clone)]
pub struct PostgresRecordStore {
    pool: SyncPgPool,
    environment: Environment,
}

impl PostgresRecordStore {
    /// Creates a store from a connection pool scoped to the given
    /// environment's database.
    #[must_use]
    pub const fn new(pool: SyncPgPool, environment: Environment) -> Self {
        Self { pool, environment }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(|err| StoreError::Unavailable(err.to_string()))?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::backend)?
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn list_pending_feedback(&self, limit: i64) -> StoreResult<PendingBatch> {
        let environment = self.environment;
        self.run_blocking(move |connection| {
            let rows = feedback::table
                .filter(feedback::status.eq(FeedbackStatus::Pending.as_str()))
                .order(feedback::created_at.desc())
                .limit(limit)
                .select(FeedbackRow::as_select())
                .load::<FeedbackRow>(connection)
                .map_err(|err| classify_diesel(err, "feedback"))?;

            let mut batch = PendingBatch::default();
            for row in rows {
                let row_id = row.id.clone();
                match row_to_feedback(environment, row) {
                    Ok(item) => batch.items.push(item),
                    Err(reason) => {
                        // Malformed capture rows cannot be converted; park
                        // them as skipped so they stop re-scanning and
                        // surface for operator triage.
                        tracing::warn!(
                            feedback_id = %row_id,
                            environment = environment.as_str(),
                            %reason,
                            "skipping malformed feedback row"
                        );
                        mark_feedback(connection, &row_id, FeedbackStatus::Skipped, Some(&reason))?;
                        batch.malformed += 1;
                    }
                }
            }
            Ok(batch)
        })
        .await
    }

    async fn find_task_by_source(&self, source_ref: &SourceRef) -> StoreResult<Option<Task>> {
        let source = source_ref.source().as_str();
        let source_id = source_ref.source_id().as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::source.eq(source))
                .filter(tasks::source_id.eq(source_id))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(|err| classify_diesel(err, "tasks"))?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn insert_task_if_absent(&self, task: &Task) -> StoreResult<InsertOutcome> {
        let new_row = to_new_row(task);
        self.run_blocking(move |connection| {
            // The unique index on (source, source_id) decides at write time;
            // zero affected rows means another pass already created the task.
            let inserted = diesel::insert_into(tasks::table)
                .values(&new_row)
                .on_conflict((tasks::source, tasks::source_id))
                .do_nothing()
                .execute(connection)
                .map_err(|err| classify_diesel(err, "tasks"))?;
            Ok(if inserted == 0 {
                InsertOutcome::AlreadyExists
            } else {
                InsertOutcome::Created
            })
        })
        .await
    }

    async fn mark_feedback_converted(&self, id: &FeedbackId) -> StoreResult<()> {
        let raw_id = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            mark_feedback(connection, &raw_id, FeedbackStatus::Converted, None)
        })
        .await
    }

    async fn mark_feedback_skipped(&self, id: &FeedbackId, reason: &str) -> StoreResult<()> {
        let raw_id = id.as_str().to_owned();
        let reason_text = reason.to_owned();
        self.run_blocking(move |connection| {
            mark_feedback(
                connection,
                &raw_id,
                FeedbackStatus::Skipped,
                Some(&reason_text),
            )
        })
        .await
    }
}

/// Conditional status update guarded on the row still being `pending`.
fn mark_feedback(
    connection: &mut PgConnection,
    raw_id: &str,
    status: FeedbackStatus,
    reason: Option<&str>,
) -> StoreResult<()> {
    diesel::update(
        feedback::table
            .filter(feedback::id.eq(raw_id))
            .filter(feedback::status.eq(FeedbackStatus::Pending.as_str())),
    )
    .set((
        feedback::status.eq(status.as_str()),
        feedback::skip_reason.eq(reason.map(ToOwned::to_owned)),
    ))
    .execute(connection)
    .map_err(|err| classify_diesel(err, "feedback"))?;
    Ok(())
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        task_type: task.task_type().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        source: task.source().as_str().to_owned(),
        source_id: task.source_id().as_str().to_owned(),
        created_at: task.created_at(),
    }
}

fn row_to_feedback(environment: Environment, row: FeedbackRow) -> Result<FeedbackItem, String> {
    let FeedbackRow {
        id,
        kind,
        description,
        submitter_email,
        page_url,
        user_agent,
        has_screenshot,
        status,
        skip_reason: _,
        created_at,
    } = row;

    let data = PersistedFeedbackData {
        id: FeedbackId::new(id).map_err(|err| err.to_string())?,
        environment,
        kind: FeedbackKind::try_from(kind.as_str()).map_err(|err| err.to_string())?,
        description,
        submitter_email,
        page_url,
        user_agent,
        has_screenshot,
        status: FeedbackStatus::try_from(status.as_str()).map_err(|err| err.to_string())?,
        created_at,
    };
    FeedbackItem::from_persisted(data).map_err(|err| err.to_string())
}

fn row_to_task(row: TaskRow) -> StoreResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        task_type,
        priority,
        status,
        source,
        source_id,
        created_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        task_type: TaskType::try_from(task_type.as_str()).map_err(StoreError::backend)?,
        priority: TaskPriority::try_from(priority.as_str()).map_err(StoreError::backend)?,
        status: TaskStatus::try_from(status.as_str()).map_err(StoreError::backend)?,
        source: TaskSource::try_from(source.as_str()).map_err(StoreError::backend)?,
        source_id: FeedbackId::new(source_id).map_err(StoreError::backend)?,
        created_at,
    };
    Ok(Task::from_persisted(data))
}

fn classify_diesel(err: DieselError, collection: &'static str) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            StoreError::Unavailable(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, ref info)
            if is_missing_relation(info.as_ref()) =>
        {
            StoreError::CollectionMissing(collection)
        }
        _ => StoreError::backend(err),
    }
}

fn is_missing_relation(info: &dyn DatabaseErrorInformation) -> bool {
    info.message().contains("does not exist")
}
