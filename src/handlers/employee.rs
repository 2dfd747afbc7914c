use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::models::employee::{EmployeeUpdate, NewEmployee};
use crate::services::EmployeeService;
use crate::utils::validation::validate_payload;

pub async fn create_face_entry(
    service: web::Data<EmployeeService>,
    new_employee: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_employee)?;
    service.create(new_employee.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Face entry created successfully",
    })))
}

pub async fn get_employees(
    service: web::Data<EmployeeService>,
) -> Result<HttpResponse, AppError> {
    let employees = service.list().await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn read_employee(
    service: web::Data<EmployeeService>,
    employee_code: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let details = service.read(employee_code.into_inner()).await?;
    Ok(HttpResponse::Ok().json(details))
}

pub async fn update_employee(
    service: web::Data<EmployeeService>,
    employee_code: web::Path<i64>,
    update: web::Json<EmployeeUpdate>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*update)?;
    service
        .update(employee_code.into_inner(), update.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json("Updated Successfully"))
}

pub async fn delete_employee(
    service: web::Data<EmployeeService>,
    employee_code: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete(employee_code.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "Message": "Successfully Deleted",
    })))
}
