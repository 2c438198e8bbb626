#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Txt,
    Csv,
    Json,
}

impl ExportFormat {
    /// Unknown or missing formats fall back to plain text.
    pub fn parse_or_default(s: Option<&str>) -> Self {
        match s.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("csv") => Self::Csv,
            Some("json") => Self::Json,
            Some("txt") => Self::Txt,
            Some(other) => {
                tracing::info!("Unknown export format `{other}`, using txt");
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Txt => "text/plain; charset=utf-8",
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json",
        }
    }
}
