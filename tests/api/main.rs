mod bulk_delete;
mod export;
mod helpers;
mod login;
mod newsletter_api;
