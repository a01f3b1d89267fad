//! REST API server: routes, JWT authentication, DTOs, and OpenAPI documentation.

pub mod auth;
pub mod cli;
pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
