// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Resolves document requests against the page a map is opened from.
//!
//! The editor asks for its base document at the absolute path `/table.json`. When the map is hosted
//! under a sub-path (`https://host/maps/index.html`) that request has to land next to the page
//! instead (`https://host/maps/table.json`), so absolute requests for the base document are
//! rewritten relative to the page's directory.

use url::Url;

use super::source::DataSource;

pub const BASE_DOCUMENT_PATH: &str = "/table.json";
const BASE_DOCUMENT_NAME: &str = "table.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocator {
    page: Url,
}

impl DocumentLocator {
    pub fn new(page: Url) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Url {
        &self.page
    }

    /// The page's directory: scheme, host and path up to and including the last `/`.
    pub fn base_url(&self) -> Url {
        let mut base = self.page.clone();
        base.set_query(None);
        base.set_fragment(None);
        let path = base.path();
        let dir_end = path.rfind('/').map_or(0, |idx| idx + 1);
        let dir = path[..dir_end].to_owned();
        base.set_path(if dir.is_empty() { "/" } else { &dir });
        base
    }

    /// Resolves `request` the way the page would, except that the absolute base-document path is
    /// redirected into the page's directory.
    pub fn resolve(&self, request: &str) -> Result<Url, url::ParseError> {
        if request == BASE_DOCUMENT_PATH {
            let resolved = self.base_url().join(BASE_DOCUMENT_NAME)?;
            tracing::debug!(from = request, to = %resolved, "redirecting base document request");
            return Ok(resolved);
        }
        self.page.join(request)
    }

    pub fn base_document(&self) -> Result<DataSource, url::ParseError> {
        self.resolve(BASE_DOCUMENT_PATH).map(DataSource::from_url)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use url::Url;

    use super::DocumentLocator;
    use crate::bootstrap::source::DataSource;

    fn locator(page: &str) -> DocumentLocator {
        DocumentLocator::new(Url::parse(page).expect("page url"))
    }

    #[rstest]
    #[case("https://example.com/maps/index.html?ca=1", "https://example.com/maps/table.json")]
    #[case("https://example.com/maps/", "https://example.com/maps/table.json")]
    #[case("https://example.com/index.html", "https://example.com/table.json")]
    #[case("http://localhost:5173/a/b/c.html#top", "http://localhost:5173/a/b/table.json")]
    fn base_document_lands_next_to_the_page(#[case] page: &str, #[case] expected: &str) {
        let resolved = locator(page).resolve("/table.json").expect("resolve");
        assert_eq!(resolved.as_str(), expected);
    }

    #[test]
    fn other_requests_resolve_normally() {
        let locator = locator("https://example.com/maps/index.html");
        assert_eq!(
            locator.resolve("/other.json").expect("resolve").as_str(),
            "https://example.com/other.json"
        );
        assert_eq!(
            locator.resolve("data/extra.json").expect("resolve").as_str(),
            "https://example.com/maps/data/extra.json"
        );
    }

    #[test]
    fn base_url_drops_query_and_file_name() {
        let base = locator("https://example.com/maps/index.html?ca=1#x").base_url();
        assert_eq!(base.as_str(), "https://example.com/maps/");
    }

    #[test]
    fn base_document_is_a_network_source_for_http_pages() {
        let source = locator("https://example.com/maps/index.html").base_document().expect("source");
        assert!(matches!(source, DataSource::Network(url) if url.path() == "/maps/table.json"));
    }
}
