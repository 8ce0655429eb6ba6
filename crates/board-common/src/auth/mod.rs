//! Authentication utilities

mod jwt;
mod password;

pub use jwt::{Claims, JwtService, TokenPair, TokenSubject, TokenType};
pub use password::{
    hash_password, validate_password_strength, verify_password, PasswordService,
    PASSWORD_SPECIAL_CHARS,
};
