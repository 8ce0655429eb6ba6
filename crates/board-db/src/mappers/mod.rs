//! Model to entity mappers
//!
//! `From`/`TryFrom<Model> for Entity` conversions from database rows to
//! domain objects. Role columns are parsed, so user and board rows convert
//! fallibly.

mod board;
mod post;
mod user;
