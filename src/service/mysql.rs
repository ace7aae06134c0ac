use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, info};

use super::{DirectoryError, DirectoryResult, EmployeeDirectory, EmployeeFilter};
use crate::model::{
    department::Department,
    designation::Designation,
    employee::{Employee, Gender, NewEmployee},
    employee_type::EmployeeType,
};
use crate::utils::db_utils::WhereClause;
use crate::utils::pagination::{PageRequest, Paged};

const EMPLOYEE_COLUMNS: &str = "id, full_name, email, department_id, designation_id, \
     employee_type_id, hire_date, date_of_birth, gender, salary";

/// Columns the free-text search is matched against.
const SEARCH_COLUMNS: [&str; 2] = ["full_name", "email"];

#[derive(FromRow)]
struct EmployeeRow {
    id: u64,
    full_name: String,
    email: String,
    department_id: u64,
    designation_id: u64,
    employee_type_id: u64,
    hire_date: NaiveDate,
    date_of_birth: NaiveDate,
    gender: String,
    salary: f64,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = DirectoryError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let gender = Gender::from_str(&row.gender).map_err(|_| DirectoryError::CorruptRecord {
            id: row.id,
            reason: format!("unknown gender {:?}", row.gender),
        })?;

        Ok(Employee {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            department_id: row.department_id,
            designation_id: row.designation_id,
            employee_type_id: row.employee_type_id,
            hire_date: row.hire_date,
            date_of_birth: row.date_of_birth,
            gender,
            salary: row.salary,
        })
    }
}

/// Builds the list filter shared by the count and the page query.
fn employee_where_clause(filter: &EmployeeFilter) -> WhereClause {
    let mut clause = WhereClause::new();

    if let Some(term) = filter.search_term.as_deref().map(str::trim)
        && !term.is_empty()
    {
        clause.contains_any(&SEARCH_COLUMNS, term);
    }

    if let Some(department_id) = filter.department_id {
        clause.eq("department_id", department_id);
    }

    if let Some(employee_type_id) = filter.employee_type_id {
        clause.eq("employee_type_id", employee_type_id);
    }

    clause
}

/// sqlx connects with `CLIENT_FOUND_ROWS`, so an update that leaves the row
/// unchanged still reports it; zero rows means the id is gone.
fn ensure_found(rows_affected: u64, id: u64) -> DirectoryResult<()> {
    if rows_affected == 0 {
        return Err(DirectoryError::Missing(id));
    }
    Ok(())
}

pub struct MySqlDirectory {
    pool: MySqlPool,
}

impl MySqlDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeDirectory for MySqlDirectory {
    async fn get_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> DirectoryResult<Paged<Employee>> {
        let clause = employee_where_clause(filter);
        let where_sql = clause.to_sql();

        // ---------- total count ----------
        let count_sql = format!("SELECT COUNT(*) AS total FROM employees {}", where_sql);
        debug!(sql = %count_sql, bindings = ?clause.values(), "Counting employees");

        let total = clause
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql))
            .fetch_one(&self.pool)
            .await?;

        // ---------- data query ----------
        let data_sql = format!(
            "SELECT {} FROM employees {} ORDER BY id DESC LIMIT ? OFFSET ?",
            EMPLOYEE_COLUMNS, where_sql
        );
        debug!(
            sql = %data_sql,
            bindings = ?clause.values(),
            page = page.number(),
            per_page = page.size(),
            offset = page.offset(),
            "Fetching employees"
        );

        let rows = clause
            .bind_as(sqlx::query_as::<_, EmployeeRow>(&data_sql))
            .bind(u64::from(page.size()))
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(Employee::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paged {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn get_departments(&self) -> DirectoryResult<Vec<Department>> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(departments)
    }

    async fn get_employee_types(&self) -> DirectoryResult<Vec<EmployeeType>> {
        let types =
            sqlx::query_as::<_, EmployeeType>("SELECT id, name FROM employee_types ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(types)
    }

    async fn get_designations_by_department(
        &self,
        department_id: u64,
    ) -> DirectoryResult<Vec<Designation>> {
        let designations = sqlx::query_as::<_, Designation>(
            r#"
            SELECT id, name, department_id
            FROM designations
            WHERE department_id = ?
            ORDER BY name
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(designations)
    }

    async fn get_employee_by_id(&self, id: u64) -> DirectoryResult<Option<Employee>> {
        let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Employee::try_from).transpose()
    }

    async fn create_employee(&self, employee: &NewEmployee) -> DirectoryResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (full_name, email, department_id, designation_id, employee_type_id,
             hire_date, date_of_birth, gender, salary)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(employee.department_id)
        .bind(employee.designation_id)
        .bind(employee.employee_type_id)
        .bind(employee.hire_date)
        .bind(employee.date_of_birth)
        .bind(employee.gender.as_ref())
        .bind(employee.salary)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        info!(employee_id = id, "Employee created");
        Ok(id)
    }

    async fn update_employee(&self, employee: &Employee) -> DirectoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET full_name = ?, email = ?, department_id = ?, designation_id = ?,
                employee_type_id = ?, hire_date = ?, date_of_birth = ?, gender = ?,
                salary = ?
            WHERE id = ?
            "#,
        )
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(employee.department_id)
        .bind(employee.designation_id)
        .bind(employee.employee_type_id)
        .bind(employee.hire_date)
        .bind(employee.date_of_birth)
        .bind(employee.gender.as_ref())
        .bind(employee.salary)
        .bind(employee.id)
        .execute(&self.pool)
        .await?;

        ensure_found(result.rows_affected(), employee.id)?;

        info!(employee_id = employee.id, "Employee updated");
        Ok(())
    }

    async fn delete_employee(&self, id: u64) -> DirectoryResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        ensure_found(result.rows_affected(), id)?;

        info!(employee_id = id, "Employee deleted");
        Ok(())
    }
}
