use crate::api::employee::{EmployeeListPage, form::EmployeeForm};
use crate::model::{
    department::Department,
    designation::DesignationOption,
    employee::{Employee, Gender},
    employee_type::EmployeeType,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Portal",
        version = "0.1.0",
        description = r#"
## Employee Portal

Server-rendered employee directory: list, create, update, delete and view
employee records.

### Views
Page endpoints answer with a view envelope
`{"view": "<template>", "message": <flash or null>, "model": {...}}`
that the template layer renders. Successful form posts answer `303 See Other`.

### Forms
Create and update take `application/x-www-form-urlencoded` bodies. Invalid
forms are re-rendered with `422` and a list of field errors.

### Designations
`GET /employee/designations?departmentId=` returns plain JSON for the
department dropdown.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_form,
        crate::api::employee::create_employee,
        crate::api::employee::update_form,
        crate::api::employee::update_employee,
        crate::api::employee::delete_confirm,
        crate::api::employee::delete_employee,
        crate::api::employee::get_designations,
        crate::api::employee::success,
        crate::api::employee::details
    ),
    components(
        schemas(
            Employee,
            Gender,
            Department,
            EmployeeType,
            DesignationOption,
            EmployeeForm,
            EmployeeListPage
        )
    ),
    tags(
        (name = "Employee", description = "Employee management pages"),
    )
)]
pub struct ApiDoc;
