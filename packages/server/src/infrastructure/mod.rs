//! Infrastructure layer: registry storage and transport-facing DTOs.

pub mod dto;
pub mod repository;
