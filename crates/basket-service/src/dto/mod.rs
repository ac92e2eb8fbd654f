//! Data Transfer Objects (DTOs).

mod cart_dto;

pub use cart_dto::*;
