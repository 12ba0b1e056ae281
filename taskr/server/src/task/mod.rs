use crate::entities::*;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sea_orm::*;
use std::sync::Arc;

pub mod api;
pub mod recurrence;

pub use crate::entities::sea_orm_active_enums::Frequency;
pub use recurrence::{Recurrence, RecurrenceError};

/// Number of tasks returned by a listing when no limit is given.
pub const DEFAULT_LIMIT: u32 = 100;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: i32,
    name: String,
    description: Option<String>,
    owner_id: i32,
    recurrence: Recurrence,
    last_done: Option<NaiveDate>,
    next_to_do: Option<NaiveDate>,
    created_at: DateTime<FixedOffset>,
    updated_at: DateTime<FixedOffset>,
}

impl Task {
    /// Returns the ID of the task.
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the ID of the user owning the task.
    pub fn owner_id(&self) -> i32 {
        self.owner_id
    }

    pub fn frequency(&self) -> Frequency {
        self.recurrence.frequency()
    }

    /// Returns the custom interval, only ever present for [`Frequency::Other`].
    pub fn frequency_value(&self) -> Option<i32> {
        self.recurrence.value()
    }

    pub fn last_done(&self) -> Option<NaiveDate> {
        self.last_done
    }

    pub fn next_to_do(&self) -> Option<NaiveDate> {
        self.next_to_do
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<FixedOffset> {
        self.updated_at
    }
}

impl TryFrom<task::Model> for Task {
    type Error = TaskServiceError;

    fn try_from(model: task::Model) -> Result<Self, Self::Error> {
        let recurrence = Recurrence::new(model.frequency, model.frequency_value).map_err(
            |source| TaskServiceError::CorruptRecurrence {
                id: model.id,
                source,
            },
        )?;
        Ok(Self {
            id: model.id,
            name: model.name,
            description: model.description,
            owner_id: model.owner_id,
            recurrence,
            last_done: model.last_done,
            next_to_do: model.next_to_do,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Fields of a task about to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub frequency_value: Option<i32>,
    pub last_done: Option<NaiveDate>,
    pub next_to_do: Option<NaiveDate>,
}

/// A partial update of a task. `None` leaves a field untouched; for nullable
/// fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    pub frequency_value: Option<Option<i32>>,
    pub last_done: Option<Option<NaiveDate>>,
    pub next_to_do: Option<Option<NaiveDate>>,
}

/// Offset/limit window and optional owner filter for listing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    pub skip: u32,
    pub limit: u32,
    pub owner_id: Option<i32>,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
            owner_id: None,
        }
    }
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents a task not found error.
    #[error("Task with ID {0} not found")]
    TaskNotFound(i32),
    /// The user a new task should belong to does not exist.
    #[error("Owner with ID {0} not found")]
    OwnerNotFound(i32),
    /// Represents a frequency / frequency_value mismatch.
    #[error(transparent)]
    InvalidRecurrence(#[from] RecurrenceError),
    /// A stored row breaks the recurrence rule.
    #[error("Task with ID {id} has a corrupt recurrence: {source}")]
    CorruptRecurrence { id: i32, source: RecurrenceError },
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Shared state of the task handlers.
#[derive(Clone)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
    /// Owner assigned to every created task.
    pub default_owner_id: i32,
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Retrieves tasks ordered by ID.
    ///
    /// # Arguments
    ///
    /// * `query` - The offset/limit window and optional owner filter.
    ///
    /// # Returns
    ///
    /// A `Result` containing the tasks in the window, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_tasks(&self, query: TaskQuery) -> Result<Vec<Task>, TaskServiceError> {
        let mut select = task::Entity::find();
        if let Some(owner_id) = query.owner_id {
            select = select.filter(task::Column::OwnerId.eq(owner_id));
        }
        select
            .order_by_asc(task::Column::Id)
            .offset(u64::from(query.skip))
            .limit(u64::from(query.limit))
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    /// Retrieves a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: i32) -> Result<Task, TaskServiceError> {
        let task_model = self.find_model(id).await?;
        Task::try_from(task_model)
    }

    /// Creates a new task owned by `owner_id`.
    ///
    /// # Arguments
    ///
    /// * `new_task` - The fields of the task.
    /// * `owner_id` - The ID of the user the task belongs to.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `Task`, or an error if the recurrence is
    /// invalid, the owner does not exist or the insert fails.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(
        &self,
        new_task: NewTask,
        owner_id: i32,
    ) -> Result<Task, TaskServiceError> {
        let recurrence = Recurrence::new(new_task.frequency, new_task.frequency_value)?;

        if user::Entity::find_by_id(owner_id)
            .one(self.db)
            .await?
            .is_none()
        {
            return Err(TaskServiceError::OwnerNotFound(owner_id));
        }

        let active_model = task::ActiveModel {
            name: ActiveValue::Set(new_task.name),
            description: ActiveValue::Set(new_task.description),
            owner_id: ActiveValue::Set(owner_id),
            frequency: ActiveValue::Set(recurrence.frequency()),
            frequency_value: ActiveValue::Set(recurrence.value()),
            last_done: ActiveValue::Set(new_task.last_done),
            next_to_do: ActiveValue::Set(new_task.next_to_do),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!("Created task {} for owner {}", created_model.id, owner_id);
        Task::try_from(created_model)
    }

    /// Applies a partial update to a task.
    ///
    /// The resulting frequency and frequency value are checked together, so
    /// moving a task away from `other` drops its stored value.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to update.
    /// * `changes` - The fields to change.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_task_by_id(
        &self,
        id: i32,
        changes: TaskChanges,
    ) -> Result<Task, TaskServiceError> {
        let task_to_update = self.find_model(id).await?;
        let recurrence = Task::try_from(task_to_update.clone())?
            .recurrence
            .apply(changes.frequency, changes.frequency_value)?;

        let mut active_model: task::ActiveModel = task_to_update.into();
        if let Some(name) = changes.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(description) = changes.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(last_done) = changes.last_done {
            active_model.last_done = ActiveValue::Set(last_done);
        }
        if let Some(next_to_do) = changes.next_to_do {
            active_model.next_to_do = ActiveValue::Set(next_to_do);
        }
        active_model.frequency = ActiveValue::Set(recurrence.frequency());
        active_model.frequency_value = ActiveValue::Set(recurrence.value());
        active_model.updated_at = ActiveValue::Set(Utc::now().into());

        let updated_model = active_model.update(self.db).await?;
        Task::try_from(updated_model)
    }

    /// Deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: i32) -> Result<Task, TaskServiceError> {
        let task_to_delete = self.find_model(id).await?;
        let task_copy = Task::try_from(task_to_delete)?;
        task::Entity::delete_by_id(id).exec(self.db).await?;
        tracing::info!("Deleted task {}", id);
        Ok(task_copy)
    }

    async fn find_model(&self, id: i32) -> Result<task::Model, TaskServiceError> {
        task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(frequency: Frequency, frequency_value: Option<i32>) -> task::Model {
        let timestamp = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
        task::Model {
            id: 7,
            name: "Descale kettle".to_string(),
            description: None,
            owner_id: 1,
            frequency,
            frequency_value,
            last_done: None,
            next_to_do: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    #[test]
    fn can_convert_consistent_row() {
        let task = Task::try_from(model(Frequency::Other, Some(3))).unwrap();
        assert_eq!(task.frequency(), Frequency::Other);
        assert_eq!(task.frequency_value(), Some(3));
    }

    #[test]
    fn refuses_row_with_custom_frequency_but_no_value() {
        let result = Task::try_from(model(Frequency::Other, None));
        assert!(matches!(
            result,
            Err(TaskServiceError::CorruptRecurrence {
                id: 7,
                source: RecurrenceError::MissingValue
            })
        ));
    }

    #[test]
    fn refuses_row_with_value_on_fixed_frequency() {
        let result = Task::try_from(model(Frequency::Weekly, Some(2)));
        assert!(matches!(
            result,
            Err(TaskServiceError::CorruptRecurrence {
                source: RecurrenceError::UnexpectedValue(Frequency::Weekly),
                ..
            })
        ));
    }
}
