//! Data transfer objects for service inputs and outputs
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for results that are more than a single entity

pub mod requests;
pub mod responses;

pub use requests::{
    BoardFilter, CreateBoardRequest, CreatePostRequest, CreateUserRequest, LoginRequest,
    PostFilter, RefreshTokenRequest, UpdateBoardRequest, UpdatePostRequest, UpdateUserRequest,
};
pub use responses::AuthResponse;
