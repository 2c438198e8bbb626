mod new_subscriber;
mod subscriber;
mod subscriber_country;
mod subscriber_email;

pub use new_subscriber::NewSubscriber;
pub use subscriber::Subscriber;
pub use subscriber_country::SubscriberCountry;
pub use subscriber_email::SubscriberEmail;
