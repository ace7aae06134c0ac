//! Employee directory: persistence and query logic behind the employee
//! handlers.
//!
//! Handlers only see the [`EmployeeDirectory`] trait. Production runs against
//! [`mysql::MySqlDirectory`]; a database-less deployment and the test suite use
//! the seeded [`memory::InMemoryDirectory`].

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use derive_more::Display;

use crate::model::{
    department::Department, designation::Designation, employee::Employee,
    employee::NewEmployee, employee_type::EmployeeType,
};
use crate::utils::pagination::{PageRequest, Paged};

/// List filters, passed through from the query string untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    /// Matches full name or email, case-insensitive substring.
    pub search_term: Option<String>,
    pub department_id: Option<u64>,
    pub employee_type_id: Option<u64>,
}

#[derive(Debug, Display)]
pub enum DirectoryError {
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
    #[display(fmt = "employee {} has a corrupt record: {}", id, reason)]
    CorruptRecord { id: u64, reason: String },
    #[display(fmt = "employee {} does not exist", _0)]
    Missing(u64),
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DirectoryError {
    fn from(e: sqlx::Error) -> Self {
        DirectoryError::Database(e)
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// One page of matching employees plus the total match count.
    async fn get_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> DirectoryResult<Paged<Employee>>;

    async fn get_departments(&self) -> DirectoryResult<Vec<Department>>;

    async fn get_employee_types(&self) -> DirectoryResult<Vec<EmployeeType>>;

    async fn get_designations_by_department(
        &self,
        department_id: u64,
    ) -> DirectoryResult<Vec<Designation>>;

    async fn get_employee_by_id(&self, id: u64) -> DirectoryResult<Option<Employee>>;

    /// Persists a new employee and returns the id the store assigned.
    async fn create_employee(&self, employee: &NewEmployee) -> DirectoryResult<u64>;

    async fn update_employee(&self, employee: &Employee) -> DirectoryResult<()>;

    async fn delete_employee(&self, id: u64) -> DirectoryResult<()>;
}
