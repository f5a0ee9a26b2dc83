pub mod challenge;
pub mod submission;
pub mod user_profile;
