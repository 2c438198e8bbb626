pub mod admin;
pub mod health_check;
pub mod home;
pub mod login;
pub mod logout;
pub mod newsletter;
pub mod not_found;
