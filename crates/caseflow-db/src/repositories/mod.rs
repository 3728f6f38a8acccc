//! Repository implementations for database operations.
//!
//! Each repository wraps the shared pool and exposes async CRUD with
//! explicit column lists. Multi-statement lifecycle operations (case
//! intake, step advancement) live in `caseflow-core`, which runs its own
//! transactions against the same pool.

pub mod cases;
pub mod process_data;
pub mod process_data_types;
pub mod process_definitions;
pub mod process_types;
pub mod processes;
pub mod statuses;
pub mod steps;
pub mod task_rules;
pub mod tasks;
pub mod users;

pub use cases::*;
pub use process_data::*;
pub use process_data_types::*;
pub use process_definitions::*;
pub use process_types::*;
pub use processes::*;
pub use statuses::*;
pub use steps::*;
pub use task_rules::*;
pub use tasks::*;
pub use users::*;

use sqlx::PgPool;

use crate::error::DbError;

/// Database context containing all repositories.
#[derive(Clone)]
pub struct DbContext {
    pub pool: PgPool,
    pub cases: CaseRepository,
    pub processes: ProcessRepository,
    pub steps: StepRepository,
    pub process_data: ProcessDataRepository,
    pub statuses: StatusRepository,
    pub process_types: ProcessTypeRepository,
    pub process_definitions: ProcessDefinitionRepository,
    pub tasks: TaskRepository,
    pub task_rules: TaskRuleRepository,
    pub process_data_types: ProcessDataTypeRepository,
    pub users: UserRepository,
}

impl DbContext {
    /// Create a new database context from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            cases: CaseRepository::new(pool.clone()),
            processes: ProcessRepository::new(pool.clone()),
            steps: StepRepository::new(pool.clone()),
            process_data: ProcessDataRepository::new(pool.clone()),
            statuses: StatusRepository::new(pool.clone()),
            process_types: ProcessTypeRepository::new(pool.clone()),
            process_definitions: ProcessDefinitionRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool.clone()),
            task_rules: TaskRuleRepository::new(pool.clone()),
            process_data_types: ProcessDataTypeRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Run embedded migrations.
    pub async fn migrate(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
