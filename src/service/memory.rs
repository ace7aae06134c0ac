use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use super::{DirectoryError, DirectoryResult, EmployeeDirectory, EmployeeFilter};
use crate::model::{
    department::Department,
    designation::Designation,
    employee::{Employee, Gender, NewEmployee},
    employee_type::EmployeeType,
};
use crate::utils::pagination::{PageRequest, Paged};

#[derive(Default)]
struct Store {
    employees: BTreeMap<u64, Employee>,
    next_id: u64,
    departments: Vec<Department>,
    employee_types: Vec<EmployeeType>,
    designations: Vec<Designation>,
}

/// Process-local directory. Lookup tables are fixed at construction; employee
/// ids are assigned sequentially starting at 1.
pub struct InMemoryDirectory {
    store: RwLock<Store>,
}

impl InMemoryDirectory {
    /// Reference data only, no employees.
    pub fn with_lookups(
        departments: Vec<Department>,
        employee_types: Vec<EmployeeType>,
        designations: Vec<Designation>,
    ) -> Self {
        Self {
            store: RwLock::new(Store {
                employees: BTreeMap::new(),
                next_id: 1,
                departments,
                employee_types,
                designations,
            }),
        }
    }

    /// The standard departments, employee types and designations.
    pub fn with_standard_lookups() -> Self {
        let departments = [
            (1, "Engineering"),
            (2, "Human Resources"),
            (3, "Finance"),
            (4, "Sales"),
        ]
        .into_iter()
        .map(|(id, name)| Department { id, name: name.to_string() })
        .collect();

        let employee_types = [(1, "Permanent"), (2, "Contract"), (3, "Intern")]
            .into_iter()
            .map(|(id, name)| EmployeeType { id, name: name.to_string() })
            .collect();

        let designations = [
            (1, "Software Engineer", 1),
            (2, "QA Engineer", 1),
            (3, "Engineering Manager", 1),
            (4, "HR Executive", 2),
            (5, "Recruiter", 2),
            (6, "Accountant", 3),
            (7, "Financial Analyst", 3),
            (8, "Sales Executive", 4),
        ]
        .into_iter()
        .map(|(id, name, department_id)| Designation {
            id,
            name: name.to_string(),
            department_id,
        })
        .collect();

        Self::with_lookups(departments, employee_types, designations)
    }

    /// Standard lookups plus a handful of sample employees, for running
    /// without a database.
    pub fn seeded() -> Self {
        let directory = Self::with_standard_lookups();
        let samples = [
            ("Ada Lovelace", "ada@company.com", (1, 3, 1), (2019, 3, 1), (1985, 12, 10), Gender::Female, 98_000.0),
            ("Grace Hopper", "grace@company.com", (1, 1, 1), (2020, 6, 15), (1988, 12, 9), Gender::Female, 91_500.0),
            ("Alan Turing", "alan@company.com", (3, 7, 2), (2021, 1, 4), (1990, 6, 23), Gender::Male, 72_000.0),
            ("Sam Rivera", "sam@company.com", (2, 5, 3), (2024, 9, 2), (2001, 2, 14), Gender::Other, 28_000.0),
        ];

        {
            let mut store = directory.write();
            for (full_name, email, (department_id, designation_id, employee_type_id), hire, dob, gender, salary) in
                samples
            {
                let (Some(hire_date), Some(date_of_birth)) = (
                    NaiveDate::from_ymd_opt(hire.0, hire.1, hire.2),
                    NaiveDate::from_ymd_opt(dob.0, dob.1, dob.2),
                ) else {
                    continue;
                };
                let draft = NewEmployee {
                    full_name: full_name.to_string(),
                    email: email.to_string(),
                    department_id,
                    designation_id,
                    employee_type_id,
                    hire_date,
                    date_of_birth,
                    gender,
                    salary,
                };
                store.insert(draft);
            }
        }

        directory
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store {
    fn insert(&mut self, draft: NewEmployee) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.employees.insert(id, draft.with_id(id));
        id
    }
}

fn matches_filter(employee: &Employee, filter: &EmployeeFilter, needle: Option<&str>) -> bool {
    if let Some(needle) = needle {
        let hit = employee.full_name.to_lowercase().contains(needle)
            || employee.email.to_lowercase().contains(needle);
        if !hit {
            return false;
        }
    }
    if filter.department_id.is_some_and(|id| employee.department_id != id) {
        return false;
    }
    if filter.employee_type_id.is_some_and(|id| employee.employee_type_id != id) {
        return false;
    }
    true
}

#[async_trait]
impl EmployeeDirectory for InMemoryDirectory {
    async fn get_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> DirectoryResult<Paged<Employee>> {
        let needle = filter
            .search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        let store = self.read();
        let matching: Vec<&Employee> = store
            .employees
            .values()
            .rev()
            .filter(|e| matches_filter(e, filter, needle.as_deref()))
            .collect();

        let total = matching.len() as u64;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(page.size() as usize)
            .cloned()
            .collect();

        Ok(Paged { items, total })
    }

    async fn get_departments(&self) -> DirectoryResult<Vec<Department>> {
        let mut departments = self.read().departments.clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn get_employee_types(&self) -> DirectoryResult<Vec<EmployeeType>> {
        let mut types = self.read().employee_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn get_designations_by_department(
        &self,
        department_id: u64,
    ) -> DirectoryResult<Vec<Designation>> {
        let mut designations: Vec<Designation> = self
            .read()
            .designations
            .iter()
            .filter(|d| d.department_id == department_id)
            .cloned()
            .collect();
        designations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(designations)
    }

    async fn get_employee_by_id(&self, id: u64) -> DirectoryResult<Option<Employee>> {
        Ok(self.read().employees.get(&id).cloned())
    }

    async fn create_employee(&self, employee: &NewEmployee) -> DirectoryResult<u64> {
        let id = self.write().insert(employee.clone());
        info!(employee_id = id, "Employee created");
        Ok(id)
    }

    async fn update_employee(&self, employee: &Employee) -> DirectoryResult<()> {
        let mut store = self.write();
        match store.employees.get_mut(&employee.id) {
            Some(stored) => {
                *stored = employee.clone();
                info!(employee_id = employee.id, "Employee updated");
                Ok(())
            }
            None => Err(DirectoryError::Missing(employee.id)),
        }
    }

    async fn delete_employee(&self, id: u64) -> DirectoryResult<()> {
        match self.write().employees.remove(&id) {
            Some(_) => {
                info!(employee_id = id, "Employee deleted");
                Ok(())
            }
            None => Err(DirectoryError::Missing(id)),
        }
    }
}
