//! Request-level tests for the employee pages.

use std::sync::{Arc, Mutex, PoisonError};

use actix_web::{
    App,
    cookie::{Cookie, Key},
    dev::{ServiceRequest, ServiceResponse},
    http::{StatusCode, header},
    test as actix_test,
    web::Data,
};
use async_trait::async_trait;
use serde_json::{Value, json};

use super::form::{EmployeeForm, tests::valid_form};
use crate::{
    config::Config,
    model::{
        department::Department,
        designation::Designation,
        employee::{Employee, NewEmployee},
        employee_type::EmployeeType,
    },
    routes,
    service::{DirectoryResult, EmployeeDirectory, EmployeeFilter, memory::InMemoryDirectory},
    utils::pagination::{PageRequest, Paged},
    view::{SESSION_COOKIE, flash_session},
};

/// In-memory directory that records the name of every call it serves.
struct RecordingDirectory {
    inner: InMemoryDirectory,
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingDirectory {
    fn record(&self, call: &'static str) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn mutations(&self) -> Vec<&'static str> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(*call, "create_employee" | "update_employee" | "delete_employee")
            })
            .collect()
    }
}

#[async_trait]
impl EmployeeDirectory for RecordingDirectory {
    async fn get_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> DirectoryResult<Paged<Employee>> {
        self.record("get_employees");
        self.inner.get_employees(filter, page).await
    }

    async fn get_departments(&self) -> DirectoryResult<Vec<Department>> {
        self.record("get_departments");
        self.inner.get_departments().await
    }

    async fn get_employee_types(&self) -> DirectoryResult<Vec<EmployeeType>> {
        self.record("get_employee_types");
        self.inner.get_employee_types().await
    }

    async fn get_designations_by_department(
        &self,
        department_id: u64,
    ) -> DirectoryResult<Vec<Designation>> {
        self.record("get_designations_by_department");
        self.inner.get_designations_by_department(department_id).await
    }

    async fn get_employee_by_id(&self, id: u64) -> DirectoryResult<Option<Employee>> {
        self.record("get_employee_by_id");
        self.inner.get_employee_by_id(id).await
    }

    async fn create_employee(&self, employee: &NewEmployee) -> DirectoryResult<u64> {
        self.record("create_employee");
        self.inner.create_employee(employee).await
    }

    async fn update_employee(&self, employee: &Employee) -> DirectoryResult<()> {
        self.record("update_employee");
        self.inner.update_employee(employee).await
    }

    async fn delete_employee(&self, id: u64) -> DirectoryResult<()> {
        self.record("delete_employee");
        self.inner.delete_employee(id).await
    }
}

/// Standard lookups plus `count` employees, ids 1..=count, all in
/// department 3. Seeding is not recorded.
async fn directory_with(count: usize) -> Arc<RecordingDirectory> {
    let inner = InMemoryDirectory::with_standard_lookups();
    for i in 1..=count {
        let draft = EmployeeForm {
            full_name: format!("Employee {}", i),
            email: format!("employee{}@company.com", i),
            ..valid_form()
        }
        .validate()
        .unwrap();
        inner.create_employee(&draft).await.unwrap();
    }

    Arc::new(RecordingDirectory {
        inner,
        calls: Mutex::new(Vec::new()),
    })
}

fn test_app(
    directory: Arc<RecordingDirectory>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let directory: Arc<dyn EmployeeDirectory> = directory;
    App::new()
        .wrap(flash_session(Key::generate(), false))
        .app_data(Data::from(directory))
        .app_data(Data::new(Config::default()))
        .configure(routes::configure)
}

fn session_cookie(response: &ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
}

fn location(response: &ServiceResponse) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn error_fields(body: &Value) -> Vec<&str> {
    body["model"]["errors"]
        .as_array()
        .map(|errors| errors.iter().filter_map(|e| e["field"].as_str()).collect())
        .unwrap_or_default()
}

// -------------------- List --------------------

#[actix_web::test]
async fn list_second_page_of_twelve() {
    let directory = directory_with(12).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/list?pageNumber=2&pageSize=5")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["view"], "List");
    let model = &body["model"];
    assert_eq!(model["employees"].as_array().map(Vec::len), Some(5));
    assert_eq!(model["total"], 12);
    assert_eq!(model["totalPages"], 3);
    assert_eq!(model["pageNumber"], 2);
    assert_eq!(model["pageSize"], 5);
    assert_eq!(model["departments"].as_array().map(Vec::len), Some(4));
    assert_eq!(model["employeeTypes"].as_array().map(Vec::len), Some(3));
    assert!(directory.mutations().is_empty());
}

#[actix_web::test]
async fn list_uses_configured_defaults() {
    let directory = directory_with(7).await;
    let app = actix_test::init_service(test_app(directory)).await;

    let request = actix_test::TestRequest::get().uri("/employee/list").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["model"]["pageNumber"], 1);
    assert_eq!(body["model"]["pageSize"], 5);
    assert_eq!(body["model"]["employees"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["model"]["totalPages"], 2);
    assert_eq!(body["message"], Value::Null);
}

#[actix_web::test]
async fn list_echoes_filters() {
    let directory = directory_with(3).await;
    let app = actix_test::init_service(test_app(directory)).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/list?searchTerm=employee%202&departmentId=3&selectedEmployeeTypeId=1")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    let model = &body["model"];
    assert_eq!(model["searchTerm"], "employee 2");
    assert_eq!(model["selectedDepartmentId"], 3);
    assert_eq!(model["selectedEmployeeTypeId"], 1);
    assert_eq!(model["total"], 1);
    assert_eq!(model["employees"][0]["fullName"], "Employee 2");
}

#[actix_web::test]
async fn list_rejects_zero_page_size_before_querying() {
    let directory = directory_with(3).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/list?pageSize=0")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "pageSize must be at least 1");
    assert!(directory.calls().is_empty());
}

#[actix_web::test]
async fn list_treats_empty_filter_values_as_all() {
    let directory = directory_with(6).await;
    let app = actix_test::init_service(test_app(directory)).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/list?searchTerm=&selectedDepartmentId=&selectedEmployeeTypeId=&pageNumber=&pageSize=")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let model = &body["model"];
    assert_eq!(model["total"], 6);
    assert_eq!(model["pageNumber"], 1);
    assert_eq!(model["pageSize"], 5);
    assert_eq!(model["selectedDepartmentId"], Value::Null);
    assert_eq!(model["selectedEmployeeTypeId"], Value::Null);
}

#[actix_web::test]
async fn malformed_paging_values_are_json_bad_requests() {
    let directory = directory_with(3).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    for uri in [
        "/employee/list?pageSize=-1",
        "/employee/list?pageNumber=-1",
        "/employee/list?pageSize=abc",
        "/employee/list?selectedDepartmentId=x",
    ] {
        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: Value = actix_test::read_body_json(response).await;
        let message = body["message"].as_str().unwrap_or_default();
        assert!(message.contains("invalid number"), "{}: {}", uri, message);
    }
    assert!(directory.calls().is_empty());
}

#[actix_web::test]
async fn unparseable_ids_are_json_not_found() {
    let directory = directory_with(1).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    for request in [
        actix_test::TestRequest::get().uri("/employee/update/abc"),
        actix_test::TestRequest::post().uri("/employee/delete/abc"),
        actix_test::TestRequest::get().uri("/employee/details/-3"),
    ] {
        let response = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "Employee not found");
    }
    assert!(directory.calls().is_empty());
}

#[actix_web::test]
async fn home_redirects_to_list() {
    let app = actix_test::init_service(test_app(directory_with(0).await)).await;

    let request = actix_test::TestRequest::get().uri("/").to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employee/list");
}

// -------------------- Create --------------------

#[actix_web::test]
async fn create_form_starts_without_designations() {
    let directory = directory_with(0).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    let request = actix_test::TestRequest::get().uri("/employee/create").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["view"], "Create");
    assert_eq!(body["model"]["id"], Value::Null);
    assert_eq!(body["model"]["fullName"], "");
    assert_eq!(body["model"]["departments"].as_array().map(Vec::len), Some(4));
    assert_eq!(body["model"]["employeeTypes"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["model"]["designations"], json!([]));
    assert!(!directory.calls().contains(&"get_designations_by_department"));
}

#[actix_web::test]
async fn valid_create_redirects_to_success_of_new_id() {
    let directory = directory_with(2).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;
    let form = valid_form();

    let request = actix_test::TestRequest::post()
        .uri("/employee/create")
        .set_form(&form)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employee/success/3");

    let stored = directory.inner.get_employee_by_id(3).await.unwrap().unwrap();
    assert_eq!(stored, form.validate().unwrap().with_id(3));

    let request = actix_test::TestRequest::get()
        .uri("/employee/success/3")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["view"], "Success");
    assert_eq!(body["model"]["fullName"], "Jane Doe");
}

#[actix_web::test]
async fn invalid_create_repopulates_designations_of_submitted_department() {
    let directory = directory_with(0).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;
    let form = EmployeeForm {
        full_name: "  ".into(),
        salary: "-5".into(),
        ..valid_form()
    };

    let request = actix_test::TestRequest::post()
        .uri("/employee/create")
        .set_form(&form)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["view"], "Create");
    assert_eq!(error_fields(&body), vec!["fullName", "salary"]);
    assert_eq!(body["model"]["email"], "jane.doe@company.com");
    assert_eq!(body["model"]["departments"].as_array().map(Vec::len), Some(4));
    assert_eq!(body["model"]["employeeTypes"].as_array().map(Vec::len), Some(3));

    let designations = body["model"]["designations"].as_array().cloned().unwrap_or_default();
    assert_eq!(designations.len(), 2);
    assert!(designations.iter().all(|d| d["departmentId"] == 3));
    assert!(directory.mutations().is_empty());
}

#[actix_web::test]
async fn invalid_create_without_department_skips_designation_lookup() {
    let directory = directory_with(0).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;
    let form = EmployeeForm {
        department_id: "0".into(),
        ..valid_form()
    };

    let request = actix_test::TestRequest::post()
        .uri("/employee/create")
        .set_form(&form)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(error_fields(&body), vec!["departmentId"]);
    assert_eq!(body["model"]["designations"], json!([]));
    assert!(!directory.calls().contains(&"get_designations_by_department"));
    assert!(directory.mutations().is_empty());
}

// -------------------- Update --------------------

#[actix_web::test]
async fn update_form_is_prefilled_from_stored_employee() {
    let directory = directory_with(2).await;
    let app = actix_test::init_service(test_app(directory)).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/update/2")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    let model = &body["model"];
    assert_eq!(body["view"], "Update");
    assert_eq!(model["id"], 2);
    assert_eq!(model["fullName"], "Employee 2");
    assert_eq!(model["departmentId"], "3");
    assert_eq!(model["hireDate"], "2024-01-01");
    assert_eq!(model["gender"], "Female");
    assert_eq!(model["designations"].as_array().map(Vec::len), Some(2));
    assert_eq!(model["errors"], json!([]));
}

#[actix_web::test]
async fn update_of_unknown_id_is_not_found_and_never_mutates() {
    let directory = directory_with(1).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/update/99")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = actix_test::TestRequest::post()
        .uri("/employee/update/99")
        .set_form(&valid_form())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Employee not found");

    assert!(directory.mutations().is_empty());
}

#[actix_web::test]
async fn invalid_update_re_renders_without_persisting() {
    let directory = directory_with(1).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;
    let form = EmployeeForm {
        email: "not-an-email".into(),
        ..valid_form()
    };

    let request = actix_test::TestRequest::post()
        .uri("/employee/update/1")
        .set_form(&form)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["view"], "Update");
    assert_eq!(body["model"]["id"], 1);
    assert_eq!(error_fields(&body), vec!["email"]);
    assert!(directory.mutations().is_empty());

    let stored = directory.inner.get_employee_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.email, "employee1@company.com");
}

#[actix_web::test]
async fn valid_update_redirects_to_list_with_one_time_message() {
    let directory = directory_with(1).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;
    let form = EmployeeForm {
        full_name: "Renamed Person".into(),
        salary: "60000".into(),
        ..valid_form()
    };

    let request = actix_test::TestRequest::post()
        .uri("/employee/update/1")
        .set_form(&form)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employee/list");
    assert_eq!(directory.mutations(), vec!["update_employee"]);
    let stored = directory.inner.get_employee_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.full_name, "Renamed Person");
    assert_eq!(stored.salary, 60_000.0);

    // first render shows the message
    let cookie = session_cookie(&response).expect("flash stored in session");
    let request = actix_test::TestRequest::get()
        .uri("/employee/list")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let next_cookie = session_cookie(&response);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body["message"],
        "Employee with ID 1 and Name Renamed Person has been updated."
    );

    // and the one after it does not
    let mut request = actix_test::TestRequest::get().uri("/employee/list");
    if let Some(cookie) = next_cookie {
        request = request.cookie(cookie);
    }
    let body: Value = actix_test::call_and_read_body_json(&app, request.to_request()).await;
    assert_eq!(body["message"], Value::Null);
}

// -------------------- Delete --------------------

#[actix_web::test]
async fn delete_reads_once_to_confirm_then_once_more_before_deleting() {
    let directory = directory_with(2).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/delete/2")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["view"], "Delete");
    assert_eq!(body["model"]["id"], 2);
    assert_eq!(directory.calls(), vec!["get_employee_by_id"]);

    directory.clear_calls();
    let request = actix_test::TestRequest::post()
        .uri("/employee/delete/2")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employee/list");
    assert_eq!(directory.calls(), vec!["get_employee_by_id", "delete_employee"]);
    assert!(directory.inner.get_employee_by_id(2).await.unwrap().is_none());

    let cookie = session_cookie(&response).expect("flash stored in session");
    let request = actix_test::TestRequest::get()
        .uri("/employee/list")
        .cookie(cookie)
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(
        body["message"],
        "Employee with ID 2 and Name Employee 2 has been deleted."
    );
    assert_eq!(body["model"]["total"], 1);
}

#[actix_web::test]
async fn delete_of_unknown_id_is_not_found() {
    let directory = directory_with(1).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    for request in [
        actix_test::TestRequest::get().uri("/employee/delete/42"),
        actix_test::TestRequest::post().uri("/employee/delete/42"),
    ] {
        let response = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
    assert!(directory.mutations().is_empty());
}

// -------------------- Designations --------------------

#[actix_web::test]
async fn designations_are_id_name_pairs_of_one_department() {
    let app = actix_test::init_service(test_app(directory_with(0).await)).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/designations?departmentId=3")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(
        body,
        json!([
            { "id": 6, "name": "Accountant" },
            { "id": 7, "name": "Financial Analyst" }
        ])
    );
}

#[actix_web::test]
async fn designations_of_unknown_department_are_empty() {
    let app = actix_test::init_service(test_app(directory_with(0).await)).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/designations?departmentId=0")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn designations_without_department_parameter_are_empty() {
    let directory = directory_with(0).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/designations")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!([]));
}

// -------------------- Success / Details --------------------

#[actix_web::test]
async fn details_renders_the_employee() {
    let app = actix_test::init_service(test_app(directory_with(1).await)).await;

    let request = actix_test::TestRequest::get()
        .uri("/employee/details/1")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["view"], "Details");
    assert_eq!(body["model"]["email"], "employee1@company.com");
    assert_eq!(body["model"]["salary"], 55_000.0);
}

#[actix_web::test]
async fn success_and_details_of_unknown_id_are_not_found() {
    let directory = directory_with(1).await;
    let app = actix_test::init_service(test_app(directory.clone())).await;

    for uri in ["/employee/success/5", "/employee/details/5"] {
        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
    assert!(directory.mutations().is_empty());
}
