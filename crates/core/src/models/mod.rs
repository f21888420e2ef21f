pub mod analytics;
pub mod form;
pub mod session;
pub mod settings;
pub mod trade;
pub mod user;
