pub mod business;
pub mod business_config;
pub mod preference;
pub mod voice_agent;
