// brandsync
// Brand preset and organization synchronization engine

pub mod commands;
pub mod models;
pub mod services;
