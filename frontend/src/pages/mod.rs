pub mod bid_confirmation;
pub mod dashboard;
pub mod google_callback;
pub mod home;
pub mod login;
pub mod not_found;
pub mod signup;
