use actix_web::error::JsonPayloadError;
use actix_web::web;

use crate::errors::AppError;

pub mod employee;

/// Routes plus the extractor settings that make body and path errors render
/// like every other `AppError`.
pub fn api(max_payload_bytes: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(json_config(max_payload_bytes))
            .app_data(path_config());
        routes(cfg);
    }
}

fn json_config(max_payload_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_payload_bytes)
        .error_handler(|err, _req| {
            let app_error = match err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    AppError::PayloadTooLarge(err.to_string())
                }
                _ => AppError::BadRequest(err.to_string()),
            };
            app_error.into()
        })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/create_new_faceEntry")
            .route(web::post().to(employee::create_face_entry)),
    )
    .service(web::resource("/Data/").route(web::get().to(employee::get_employees)))
    .service(
        web::resource("/read/{employee_code}")
            .route(web::get().to(employee::read_employee)),
    )
    .service(
        web::resource("/update/{employee_code}")
            .route(web::put().to(employee::update_employee)),
    )
    .service(
        web::resource("/delete/{employee_code}")
            .route(web::delete().to(employee::delete_employee)),
    );
}
