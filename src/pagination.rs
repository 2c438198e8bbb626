use serde::Serialize;

pub const PAGE_SIZE: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLink {
    pub number: u64,
    pub href: String,
    pub is_current: bool,
}

/// Page window for a listing.
///
/// Pages past the end are not clamped: the offset points beyond the last row
/// and the store hands back an empty page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub page_links: Vec<PageLink>,
}

impl Pagination {
    pub fn new(
        total_count: u64,
        page_size: u64,
        requested_page: u64,
        base_path: &str,
        link_parameters: &[(&str, &str)],
    ) -> Result<Self, serde_urlencoded::ser::Error> {
        let page_size = page_size.max(1);
        let current_page = requested_page.max(1);
        let total_pages = total_count.div_ceil(page_size);

        let page_links = (1..=total_pages)
            .map(|number| {
                Ok(PageLink {
                    number,
                    href: page_href(base_path, number, link_parameters)?,
                    is_current: number == current_page,
                })
            })
            .collect::<Result<_, serde_urlencoded::ser::Error>>()?;

        Ok(Self {
            offset: (current_page - 1).saturating_mul(page_size),
            limit: page_size,
            current_page,
            total_pages,
            page_links,
        })
    }

    /// Missing, non-numeric and zero pages all mean the first page.
    pub fn parse_page(raw: Option<&str>) -> u64 {
        raw.and_then(|page| page.trim().parse::<u64>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

fn page_href(
    base_path: &str,
    number: u64,
    link_parameters: &[(&str, &str)],
) -> Result<String, serde_urlencoded::ser::Error> {
    let number = number.to_string();
    let mut query = Vec::with_capacity(link_parameters.len() + 1);
    query.push(("page", number.as_str()));
    query.extend_from_slice(link_parameters);

    Ok(format!("{base_path}?{}", serde_urlencoded::to_string(query)?))
}
