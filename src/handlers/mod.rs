// src/handlers/mod.rs

pub mod backup;
pub mod identity;
pub mod legacy;
pub mod mobile;
pub mod restore;
