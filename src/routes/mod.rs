pub mod health;
pub mod lists;
pub mod todos;
pub mod users;

use actix_web::web;

/// Registers the `/user`, `/list` and `/todo` scopes.
///
/// Within `/user`, the literal routes must be registered before the `/{id}`
/// catch-all so that e.g. `/user/login` never resolves as a user id.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .service(users::register)
            .service(users::login)
            .service(users::recover_password)
            .service(users::send_recover_password_token)
            .service(users::activate_account)
            .service(users::get_user_by_username)
            .service(users::get_user_by_email)
            .service(users::get_all_users)
            .service(users::get_user_by_id),
    )
    .service(
        web::scope("/list")
            .service(lists::create_list)
            .service(lists::get_lists)
            .service(lists::get_list_by_id)
            .service(lists::update_list)
            .service(lists::delete_list),
    )
    .service(
        web::scope("/todo")
            .service(todos::get_todos)
            .service(todos::get_todos_by_list_id)
            .service(todos::get_todo_by_id)
            .service(todos::create_todo)
            .service(todos::update_todo)
            .service(todos::delete_todo),
    );
}
