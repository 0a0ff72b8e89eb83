//! Helpers for building reports on top of the API client.

pub mod date_parser;
pub mod membership;
pub mod workdays;

pub use date_parser::parse_reference_date;
pub use membership::TeamMembership;
pub use workdays::previous_workday;
