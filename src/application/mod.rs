// Application layer - Use cases and the ports they depend on
pub mod model_store;
pub mod prediction_service;
pub mod site_history_repository;
pub mod site_service;
