use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
    ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "fullName": "Jane Doe",
        "email": "jane.doe@company.com",
        "departmentId": 3,
        "designationId": 7,
        "employeeTypeId": 1,
        "hireDate": "2024-01-01",
        "dateOfBirth": "1990-05-17",
        "gender": "Female",
        "salary": 55000.0
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Jane Doe")]
    pub full_name: String,

    #[schema(example = "jane.doe@company.com")]
    pub email: String,

    #[schema(example = 3)]
    pub department_id: u64,

    #[schema(example = 7)]
    pub designation_id: u64,

    #[schema(example = 1)]
    pub employee_type_id: u64,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = "1990-05-17", value_type = String, format = "date")]
    pub date_of_birth: NaiveDate,

    pub gender: Gender,

    #[schema(example = 55000.0)]
    pub salary: f64,
}

/// Employee fields before the store has assigned an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub full_name: String,
    pub email: String,
    pub department_id: u64,
    pub designation_id: u64,
    pub employee_type_id: u64,
    pub hire_date: NaiveDate,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub salary: f64,
}

impl NewEmployee {
    pub fn with_id(self, id: u64) -> Employee {
        Employee {
            id,
            full_name: self.full_name,
            email: self.email,
            department_id: self.department_id,
            designation_id: self.designation_id,
            employee_type_id: self.employee_type_id,
            hire_date: self.hire_date,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            salary: self.salary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("Male", Gender::Male)]
    #[case("female", Gender::Female)]
    #[case("OTHER", Gender::Other)]
    fn gender_parses_case_insensitively(#[case] raw: &str, #[case] expected: Gender) {
        assert_eq!(Gender::from_str(raw), Ok(expected));
    }

    #[test]
    fn gender_rejects_unknown_values() {
        assert!(Gender::from_str("unknown").is_err());
        assert_eq!(Gender::Female.to_string(), "Female");
    }

    #[test]
    fn with_id_keeps_every_field() {
        let draft = NewEmployee {
            full_name: "Jane Doe".into(),
            email: "jane@company.com".into(),
            department_id: 3,
            designation_id: 7,
            employee_type_id: 1,
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            gender: Gender::Female,
            salary: 55_000.0,
        };

        let employee = draft.clone().with_id(42);

        assert_eq!(employee.id, 42);
        assert_eq!(employee.full_name, draft.full_name);
        assert_eq!(employee.email, draft.email);
        assert_eq!(employee.department_id, 3);
        assert_eq!(employee.designation_id, 7);
        assert_eq!(employee.employee_type_id, 1);
        assert_eq!(employee.hire_date, draft.hire_date);
        assert_eq!(employee.date_of_birth, draft.date_of_birth);
        assert_eq!(employee.gender, Gender::Female);
        assert_eq!(employee.salary, 55_000.0);
    }
}
