pub mod budget_service;
pub mod campaign_service;
pub mod performance_service;
pub mod scheduler_service;
