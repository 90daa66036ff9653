// src/utils/mod.rs

pub mod dump;
