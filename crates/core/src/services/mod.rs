pub mod aggregator_service;
pub mod ledger_service;
pub mod user_service;
