pub mod application {
    pub mod auth_service;
    pub mod todo_service;
}

pub mod data {
    pub mod memory;
    pub mod todo_repository;
    pub mod user_repository;
}

pub mod domain {
    pub mod error;
    pub mod repository;
    pub mod todo;
    pub mod user;
    pub mod validation;
}

pub mod infrastructure {
    pub mod config;
    pub mod logging;
    pub mod security;
}

pub mod presentation {
    pub mod auth;
    pub mod handlers;
    pub mod middleware;
    pub mod response;
    pub mod routes;
}
