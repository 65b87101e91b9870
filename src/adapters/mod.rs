pub mod csv_adapter;
pub mod file_config_adapter;
pub mod keyword_router;
pub mod static_router;
pub mod synthetic_adapter;
