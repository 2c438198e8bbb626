use once_cell::sync::Lazy;
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

/// Free-form country label attached to a subscriber.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "String")]
pub struct SubscriberCountry(String);

const MAX_GRAPHEMES: usize = 64;

static FORBIDDEN_CHARS: [char; 10] = ['<', '>', '\'', '"', '\\', '(', ')', '{', '}', '/'];
static FORBIDDEN_CHARS_STRING: Lazy<String> = Lazy::new(|| String::from_iter(FORBIDDEN_CHARS));

impl SubscriberCountry {
    pub fn parse(s: String) -> Result<SubscriberCountry, String> {
        let s = s.trim().to_string();

        match s {
            _ if s.is_empty() => Err("Country is empty or contains whitespace only".into()),
            _ if s.graphemes(true).count() > MAX_GRAPHEMES => {
                Err(format!("`{s}` is longer than {MAX_GRAPHEMES} graphemes"))
            }
            _ if s.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) => Err(format!(
                "`{s}` contains at least one of forbidden characters: {}",
                *FORBIDDEN_CHARS_STRING
            )),
            _ => Ok(Self(s)),
        }
    }

    /// Blank input means "no country" rather than an error.
    pub fn parse_optional(s: Option<String>) -> Result<Option<SubscriberCountry>, String> {
        match s {
            Some(s) if !s.trim().is_empty() => Self::parse(s).map(Some),
            _ => Ok(None),
        }
    }
}

impl AsRef<str> for SubscriberCountry {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubscriberCountry {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}
