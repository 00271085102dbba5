pub mod auth;
pub mod categories;
pub mod health;
pub mod tasks;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::profile),
    )
    .service(
        web::scope("/categories")
            .service(categories::get_categories)
            .service(categories::create_category)
            .service(categories::get_category)
            .service(categories::update_category)
            .service(categories::delete_category),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
