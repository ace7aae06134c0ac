pub mod form;

#[cfg(test)]
mod tests;

use actix_web::{Either, http::StatusCode, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use self::form::{EmployeeForm, FieldError};
use crate::{
    config::Config,
    error::{AppError, AppResult},
    model::{
        department::Department,
        designation::{Designation, DesignationOption},
        employee::Employee,
        employee_type::EmployeeType,
    },
    service::{EmployeeDirectory, EmployeeFilter},
    utils::{pagination::PageRequest, serde_helpers::empty_as_none},
    view::{Redirect, View},
};

pub const LIST_PATH: &str = "/employee/list";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeListQuery {
    /// Matched against full name and email
    pub search_term: Option<String>,
    /// Filter by department; empty means all
    #[serde(alias = "departmentId", default, deserialize_with = "empty_as_none")]
    pub selected_department_id: Option<u64>,
    /// Filter by employee type; empty means all
    #[serde(alias = "employeeTypeId", default, deserialize_with = "empty_as_none")]
    pub selected_employee_type_id: Option<u64>,
    /// 1-based page number, default 1
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page_number: Option<u32>,
    /// Rows per page, default 5
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DesignationQuery {
    /// Missing or `0` yields an empty list
    #[serde(default)]
    pub department_id: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListPage {
    pub employees: Vec<Employee>,
    pub page_number: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
    pub search_term: Option<String>,
    pub selected_department_id: Option<u64>,
    pub selected_employee_type_id: Option<u64>,
    pub departments: Vec<Department>,
    pub employee_types: Vec<EmployeeType>,
}

/// Create/update form with its lookup lists and any validation errors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFormPage {
    pub id: Option<u64>,
    #[serde(flatten)]
    pub form: EmployeeForm,
    pub departments: Vec<Department>,
    pub employee_types: Vec<EmployeeType>,
    pub designations: Vec<Designation>,
    pub errors: Vec<FieldError>,
}

/// Repopulates the lookups around a form. Designations are only looked up
/// once a department has been chosen.
async fn form_page(
    directory: &dyn EmployeeDirectory,
    id: Option<u64>,
    form: EmployeeForm,
    errors: Vec<FieldError>,
) -> AppResult<EmployeeFormPage> {
    let departments = directory.get_departments().await?;
    let employee_types = directory.get_employee_types().await?;
    let designations = match form.selected_department() {
        Some(department_id) => directory.get_designations_by_department(department_id).await?,
        None => Vec::new(),
    };

    Ok(EmployeeFormPage {
        id,
        form,
        departments,
        employee_types,
        designations,
        errors,
    })
}

async fn find_employee(directory: &dyn EmployeeDirectory, id: u64) -> AppResult<Employee> {
    match directory.get_employee_by_id(id).await? {
        Some(employee) => Ok(employee),
        None => {
            debug!(employee_id = id, "Employee not found");
            Err(AppError::NotFound)
        }
    }
}

// -------------------- List --------------------

#[utoipa::path(
    get,
    path = "/employee/list",
    params(EmployeeListQuery),
    responses(
        (status = 200, description = "Paginated employee list view", body = EmployeeListPage),
        (status = 400, description = "Invalid paging parameters", body = Object, example = json!({
            "message": "pageSize must be at least 1"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    directory: web::Data<dyn EmployeeDirectory>,
    config: web::Data<Config>,
    query: web::Query<EmployeeListQuery>,
) -> AppResult<View<EmployeeListPage>> {
    let query = query.into_inner();

    let page = PageRequest::new(
        query.page_number.unwrap_or(1),
        query.page_size.unwrap_or(config.default_page_size),
        config.max_page_size,
    )?;

    let filter = EmployeeFilter {
        search_term: query.search_term.clone(),
        department_id: query.selected_department_id,
        employee_type_id: query.selected_employee_type_id,
    };

    let result = directory.get_employees(&filter, page).await?;
    debug!(
        filter = ?filter,
        page = page.number(),
        per_page = page.size(),
        total = result.total,
        "Listed employees"
    );

    let model = EmployeeListPage {
        page_number: page.number(),
        page_size: page.size(),
        total: result.total,
        total_pages: page.total_pages(result.total),
        employees: result.items,
        search_term: query.search_term,
        selected_department_id: query.selected_department_id,
        selected_employee_type_id: query.selected_employee_type_id,
        departments: directory.get_departments().await?,
        employee_types: directory.get_employee_types().await?,
    };

    Ok(View::new("List", model))
}

// -------------------- Create --------------------

#[utoipa::path(
    get,
    path = "/employee/create",
    responses(
        (status = 200, description = "Empty employee form"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_form(
    directory: web::Data<dyn EmployeeDirectory>,
) -> AppResult<View<EmployeeFormPage>> {
    let page = form_page(directory.get_ref(), None, EmployeeForm::default(), Vec::new()).await?;
    Ok(View::new("Create", page))
}

#[utoipa::path(
    post,
    path = "/employee/create",
    request_body(
        content = EmployeeForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Created, redirects to the success view"),
        (status = 422, description = "Form re-rendered with field errors"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    directory: web::Data<dyn EmployeeDirectory>,
    form: web::Form<EmployeeForm>,
) -> AppResult<Either<View<EmployeeFormPage>, Redirect>> {
    let form = form.into_inner();

    match form.validate() {
        Ok(employee) => {
            let id = directory.create_employee(&employee).await?;
            info!(employee_id = id, full_name = %employee.full_name, "Employee created");
            Ok(Either::Right(Redirect::to(format!("/employee/success/{}", id))))
        }
        Err(errors) => {
            debug!(errors = ?errors, "Create form rejected");
            let page = form_page(directory.get_ref(), None, form, errors).await?;
            Ok(Either::Left(
                View::new("Create", page).with_status(StatusCode::UNPROCESSABLE_ENTITY),
            ))
        }
    }
}

// -------------------- Update --------------------

#[utoipa::path(
    get,
    path = "/employee/update/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Form prefilled from the stored employee"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_form(
    directory: web::Data<dyn EmployeeDirectory>,
    path: web::Path<u64>,
) -> AppResult<View<EmployeeFormPage>> {
    let employee = find_employee(directory.get_ref(), path.into_inner()).await?;

    let form = EmployeeForm::from(&employee);
    let page = form_page(directory.get_ref(), Some(employee.id), form, Vec::new()).await?;
    Ok(View::new("Update", page))
}

#[utoipa::path(
    post,
    path = "/employee/update/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    request_body(
        content = EmployeeForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Updated, redirects to the list with a message"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Form re-rendered with field errors"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    directory: web::Data<dyn EmployeeDirectory>,
    path: web::Path<u64>,
    form: web::Form<EmployeeForm>,
) -> AppResult<Either<View<EmployeeFormPage>, Redirect>> {
    let id = path.into_inner();
    let form = form.into_inner();

    // an unknown id must never reach a mutating call
    find_employee(directory.get_ref(), id).await?;

    match form.validate() {
        Ok(draft) => {
            let employee = draft.with_id(id);
            directory.update_employee(&employee).await?;
            info!(employee_id = id, full_name = %employee.full_name, "Employee updated");

            let message = format!(
                "Employee with ID {} and Name {} has been updated.",
                employee.id, employee.full_name
            );
            Ok(Either::Right(Redirect::to(LIST_PATH).with_message(message)))
        }
        Err(errors) => {
            debug!(employee_id = id, errors = ?errors, "Update form rejected");
            let page = form_page(directory.get_ref(), Some(id), form, errors).await?;
            Ok(Either::Left(
                View::new("Update", page).with_status(StatusCode::UNPROCESSABLE_ENTITY),
            ))
        }
    }
}

// -------------------- Delete --------------------

#[utoipa::path(
    get,
    path = "/employee/delete/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Delete confirmation view", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_confirm(
    directory: web::Data<dyn EmployeeDirectory>,
    path: web::Path<u64>,
) -> AppResult<View<Employee>> {
    let employee = find_employee(directory.get_ref(), path.into_inner()).await?;
    Ok(View::new("Delete", employee))
}

#[utoipa::path(
    post,
    path = "/employee/delete/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 303, description = "Deleted, redirects to the list with a message"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    directory: web::Data<dyn EmployeeDirectory>,
    path: web::Path<u64>,
) -> AppResult<Redirect> {
    let id = path.into_inner();
    let employee = find_employee(directory.get_ref(), id).await?;

    directory.delete_employee(id).await?;
    info!(employee_id = id, full_name = %employee.full_name, "Employee deleted");

    let message = format!(
        "Employee with ID {} and Name {} has been deleted.",
        id, employee.full_name
    );
    Ok(Redirect::to(LIST_PATH).with_message(message))
}

// -------------------- Designations --------------------

/// Designations of one department, for repopulating the form dropdown
#[utoipa::path(
    get,
    path = "/employee/designations",
    params(DesignationQuery),
    responses(
        (status = 200, description = "Designations of the department", body = [DesignationOption]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_designations(
    directory: web::Data<dyn EmployeeDirectory>,
    query: web::Query<DesignationQuery>,
) -> AppResult<web::Json<Vec<DesignationOption>>> {
    let designations = directory
        .get_designations_by_department(query.department_id)
        .await?;

    Ok(web::Json(
        designations.into_iter().map(DesignationOption::from).collect(),
    ))
}

// -------------------- Success / Details --------------------

// Both views show the same read-only employee; only the template differs.
async fn employee_view(
    directory: &dyn EmployeeDirectory,
    id: u64,
    view: &'static str,
) -> AppResult<View<Employee>> {
    let employee = find_employee(directory, id).await?;
    Ok(View::new(view, employee))
}

#[utoipa::path(
    get,
    path = "/employee/success/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Creation confirmation view", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn success(
    directory: web::Data<dyn EmployeeDirectory>,
    path: web::Path<u64>,
) -> AppResult<View<Employee>> {
    employee_view(directory.get_ref(), path.into_inner(), "Success").await
}

#[utoipa::path(
    get,
    path = "/employee/details/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee details view", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn details(
    directory: web::Data<dyn EmployeeDirectory>,
    path: web::Path<u64>,
) -> AppResult<View<Employee>> {
    employee_view(directory.get_ref(), path.into_inner(), "Details").await
}
