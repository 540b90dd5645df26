//! Route table for the `/api/v1` scope.

use actix_web::web;

use super::applications::{list_applications, list_my_applications, submit_application};
use super::favorites::{add_favorite, list_favorites, remove_favorite};
use super::identity::{login, me, register};

/// Register every API handler on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use jobboard::inbound::http::routes::configure;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(me)
        .service(list_my_applications)
        .service(list_applications)
        .service(submit_application)
        .service(list_favorites)
        .service(add_favorite)
        .service(remove_favorite);
}
