pub mod agent;
pub mod capabilities;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod prompt;
pub mod registry;
pub mod session;
