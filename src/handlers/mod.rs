pub mod auth_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod school_handler;

use actix_web::web;

use crate::{auth::AuthMiddleware, graphql::graphql_handler};

pub use auth_handler::{consume_invitation, login, signup_director};
pub use health_handler::{health_check, health_check_ready};
pub use quiz_handler::{
    create_quiz, generate_quiz, get_quiz, list_classroom_quizzes, list_submissions,
    set_publication, submit_quiz,
};
pub use school_handler::{
    create_classroom, create_school, create_teacher_invitation, issue_parent_invitation,
};

/// Public routes at the root, everything else under `/api` behind the bearer check.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(signup_director)
        .service(login)
        .service(consume_invitation)
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(create_school)
                .service(create_classroom)
                .service(create_teacher_invitation)
                .service(issue_parent_invitation)
                .service(generate_quiz)
                .service(create_quiz)
                .service(get_quiz)
                .service(list_classroom_quizzes)
                .service(set_publication)
                .service(submit_quiz)
                .service(list_submissions)
                .service(graphql_handler),
        );
}
