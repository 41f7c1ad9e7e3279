pub mod affiliation;
pub mod health;
pub mod organization;
