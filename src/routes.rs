use crate::api::employee;
use crate::error::AppError;
use actix_web::{HttpResponse, http::header, web};
use tracing::debug;

async fn home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, employee::LIST_PATH))
        .finish()
}

/// Malformed query values answer with the JSON 400 body.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        debug!(path = %req.path(), error = %err, "Rejected query string");
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Every path parameter is an employee id; one that cannot be parsed names no
/// employee.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        debug!(path = %req.path(), error = %err, "Unparseable employee id");
        AppError::NotFound.into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home));

    cfg.service(
        web::scope("/employee")
            .app_data(query_config())
            .app_data(path_config())
            // /employee/list
            .service(web::resource(["", "/list"]).route(web::get().to(employee::list_employees)))
            // /employee/create
            .service(
                web::resource("/create")
                    .route(web::get().to(employee::create_form))
                    .route(web::post().to(employee::create_employee)),
            )
            // /employee/update/{id}
            .service(
                web::resource("/update/{id}")
                    .route(web::get().to(employee::update_form))
                    .route(web::post().to(employee::update_employee)),
            )
            // /employee/delete/{id}
            .service(
                web::resource("/delete/{id}")
                    .route(web::get().to(employee::delete_confirm))
                    .route(web::post().to(employee::delete_employee)),
            )
            // /employee/designations?departmentId=
            .service(
                web::resource("/designations").route(web::get().to(employee::get_designations)),
            )
            .service(web::resource("/success/{id}").route(web::get().to(employee::success)))
            .service(web::resource("/details/{id}").route(web::get().to(employee::details))),
    );
}
