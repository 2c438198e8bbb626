use super::{SubscriberCountry, SubscriberEmail};

#[derive(Clone, Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub country: Option<SubscriberCountry>,
}

impl NewSubscriber {
    pub fn parse(email: String, country: Option<String>) -> Result<Self, String> {
        Ok(Self {
            email: SubscriberEmail::parse(email)?,
            country: SubscriberCountry::parse_optional(country)?,
        })
    }
}
