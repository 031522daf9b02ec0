use url::Url;

/// Reduces a domain entry to the target of a `site:` query.
///
/// Entries with an http(s) scheme are cut down to host, port and path, keeping
/// the characters as written (no punycode, no percent-encoding); anything else
/// is used verbatim.
pub fn query_target(raw: &str) -> String {
    let rest = match raw
        .strip_prefix("http://")
        .or_else(|| raw.strip_prefix("https://"))
    {
        Some(rest) => rest,
        None => return raw.to_string(),
    };
    if Url::parse(raw).is_err() {
        return raw.to_string();
    }

    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    let authority_and_path = &rest[..end];
    match authority_and_path.split_once('/') {
        Some((authority, "")) => authority.to_string(),
        _ => authority_and_path.to_string(),
    }
}

pub fn search_url(endpoint: &Url, target: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("q", &format!("site:{target}"));
    url
}

/// File name for the raw page dump of a query target.
pub fn debug_file_name(target: &str) -> String {
    format!("debug_{}.html", target.replace('/', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domains_pass_through() {
        assert_eq!(query_target("example.com"), "example.com");
        assert_eq!(query_target("example.com/blog"), "example.com/blog");
    }

    #[test]
    fn scheme_is_stripped_and_path_kept() {
        assert_eq!(query_target("https://example.com"), "example.com");
        assert_eq!(query_target("https://example.com/"), "example.com");
        assert_eq!(query_target("http://example.com:8080/docs/"), "example.com:8080/docs/");
        assert_eq!(query_target("https://example.com/a?b=c"), "example.com/a");
        assert_eq!(query_target("https://example.com/#top"), "example.com");
    }

    #[test]
    fn non_ascii_and_spaces_are_kept_as_written() {
        assert_eq!(query_target("https://a.com/博客"), "a.com/博客");
        assert_eq!(query_target("https://a.com/my page"), "a.com/my page");
        assert_eq!(query_target("https://例子.com/"), "例子.com");
    }

    #[test]
    fn non_ascii_target_is_encoded_once() {
        let endpoint = Url::parse("https://www.bing.com/search").unwrap();
        let url = search_url(&endpoint, &query_target("https://a.com/博客"));
        let (_, q) = url.query_pairs().next().unwrap();
        assert_eq!(q, "site:a.com/博客");
        assert_eq!(
            url.query(),
            Some("q=site%3Aa.com%2F%E5%8D%9A%E5%AE%A2")
        );
    }

    #[test]
    fn builds_encoded_site_query() {
        let endpoint = Url::parse("https://www.bing.com/search").unwrap();
        let url = search_url(&endpoint, "example.com/blog");
        assert_eq!(
            url.as_str(),
            "https://www.bing.com/search?q=site%3Aexample.com%2Fblog"
        );
    }

    #[test]
    fn debug_file_name_flattens_path() {
        assert_eq!(debug_file_name("example.com/a/b"), "debug_example.com_a_b.html");
        assert_eq!(debug_file_name("a.com/博客"), "debug_a.com_博客.html");
    }
}
