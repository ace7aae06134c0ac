//! The employee create/update form and its validation pass.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::employee::{Employee, Gender, NewEmployee};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 100;

/// Submitted form values, kept as raw text so a malformed field becomes a
/// field error on the re-rendered form instead of a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeForm {
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
    #[schema(example = "3")]
    pub department_id: String,
    #[schema(example = "7")]
    pub designation_id: String,
    #[schema(example = "1")]
    pub employee_type_id: String,
    #[schema(example = "2024-01-01")]
    pub hire_date: String,
    #[schema(example = "1990-05-17")]
    pub date_of_birth: String,
    #[schema(example = "Female")]
    pub gender: String,
    #[schema(example = "55000")]
    pub salary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl From<&Employee> for EmployeeForm {
    fn from(employee: &Employee) -> Self {
        Self {
            full_name: employee.full_name.clone(),
            email: employee.email.clone(),
            department_id: employee.department_id.to_string(),
            designation_id: employee.designation_id.to_string(),
            employee_type_id: employee.employee_type_id.to_string(),
            hire_date: employee.hire_date.format(DATE_FORMAT).to_string(),
            date_of_birth: employee.date_of_birth.format(DATE_FORMAT).to_string(),
            gender: employee.gender.to_string(),
            salary: employee.salary.to_string(),
        }
    }
}

impl EmployeeForm {
    /// The submitted department, if one was chosen. `0` is the "no department"
    /// sentinel of the dropdown.
    pub fn selected_department(&self) -> Option<u64> {
        self.department_id
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
    }

    /// Checks every field and collects all failures, not just the first.
    pub fn validate(&self) -> Result<NewEmployee, Vec<FieldError>> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.push(FieldError::new("fullName", "Full name is required"));
        } else if full_name.chars().count() > MAX_NAME_LEN {
            errors.push(FieldError::new(
                "fullName",
                format!("Full name must be at most {} characters", MAX_NAME_LEN),
            ));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if email.chars().count() > MAX_EMAIL_LEN {
            errors.push(FieldError::new(
                "email",
                format!("Email must be at most {} characters", MAX_EMAIL_LEN),
            ));
        } else if !looks_like_email(email) {
            errors.push(FieldError::new("email", "Email is not a valid address"));
        }

        let department_id =
            required_id(&self.department_id, "departmentId", "Department", &mut errors);
        let designation_id =
            required_id(&self.designation_id, "designationId", "Designation", &mut errors);
        let employee_type_id =
            required_id(&self.employee_type_id, "employeeTypeId", "Employee type", &mut errors);

        let hire_date = required_date(&self.hire_date, "hireDate", "Hire date", &mut errors);
        let date_of_birth =
            required_date(&self.date_of_birth, "dateOfBirth", "Date of birth", &mut errors);
        if let (Some(hired), Some(born)) = (hire_date, date_of_birth)
            && born >= hired
        {
            errors.push(FieldError::new(
                "dateOfBirth",
                "Date of birth must be before the hire date",
            ));
        }

        let gender = match self.gender.trim() {
            "" => {
                errors.push(FieldError::new("gender", "Gender is required"));
                None
            }
            raw => match Gender::from_str(raw) {
                Ok(gender) => Some(gender),
                Err(_) => {
                    errors.push(FieldError::new("gender", "Gender must be Male, Female or Other"));
                    None
                }
            },
        };

        let salary = match self.salary.trim() {
            "" => {
                errors.push(FieldError::new("salary", "Salary is required"));
                None
            }
            raw => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
                Ok(_) => {
                    errors.push(FieldError::new("salary", "Salary must be zero or more"));
                    None
                }
                Err(_) => {
                    errors.push(FieldError::new("salary", "Salary must be a number"));
                    None
                }
            },
        };

        match (
            department_id,
            designation_id,
            employee_type_id,
            hire_date,
            date_of_birth,
            gender,
            salary,
        ) {
            (
                Some(department_id),
                Some(designation_id),
                Some(employee_type_id),
                Some(hire_date),
                Some(date_of_birth),
                Some(gender),
                Some(salary),
            ) if errors.is_empty() => Ok(NewEmployee {
                full_name: full_name.to_string(),
                email: email.to_string(),
                department_id,
                designation_id,
                employee_type_id,
                hire_date,
                date_of_birth,
                gender,
                salary,
            }),
            _ => Err(errors),
        }
    }
}

fn required_id(
    raw: &str,
    field: &'static str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.push(FieldError::new(field, format!("{} is required", label)));
            None
        }
    }
}

fn required_date(
    raw: &str,
    field: &'static str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", label)));
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("{} must be a date in YYYY-MM-DD format", label),
            ));
            None
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
