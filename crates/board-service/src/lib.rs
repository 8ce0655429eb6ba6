//! # board-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;
pub mod tasks;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use services::{
    AuthService, BoardService, PostService, ScrapService, SearchService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
pub use tasks::{BoxTask, TaskSpawner, TokioSpawner};
