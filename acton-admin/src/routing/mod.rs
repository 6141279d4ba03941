//! URL generation for resource routes
//!
//! The admin panel exposes nested CRUD routes under a configurable prefix:
//!
//! | Route                                              | Method           |
//! |----------------------------------------------------|------------------|
//! | `{prefix}/resource/{uri}/crud`                     | `POST` (store)   |
//! | `{prefix}/resource/{uri}/crud/{key}`               | `PUT`, `DELETE`  |
//! | `{prefix}/resource/{uri}/{key}/relation/{name}`    | `POST`, `PUT`    |
//! | `{prefix}/resource/{uri}/{page}/{key}`             | `GET`            |
//!
//! Dynamic segments (resource uri, record keys, relation and page names)
//! are percent-encoded, so a key containing `/` or `?` stays one segment.
//!
//! HTML forms only submit `GET` and `POST`, so [`Route::form_method`] and
//! [`Route::spoofed_method`] split a route into the form method and the
//! `_method` override.

use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, CONTROLS, NON_ALPHANUMERIC};
use std::fmt;

/// Characters escaped inside one path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped inside a query-string name or value
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn segment(value: &str) -> PercentEncode<'_> {
    utf8_percent_encode(value, PATH_SEGMENT)
}

/// Relative link setting one query parameter (`?name=value`)
#[must_use]
pub fn query_link(name: &str, value: &str) -> String {
    format!(
        "?{}={}",
        utf8_percent_encode(name, QUERY_COMPONENT),
        utf8_percent_encode(value, QUERY_COMPONENT)
    )
}

/// A URL plus the HTTP method that handles it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Intended HTTP method
    pub method: Method,
    /// Absolute path
    pub url: String,
}

impl Route {
    /// Method of the `<form>` element carrying this route
    #[must_use]
    pub fn form_method(&self) -> &'static str {
        if self.method == Method::GET {
            "GET"
        } else {
            "POST"
        }
    }

    /// Value for a `_method` override field, when one is needed
    #[must_use]
    pub fn spoofed_method(&self) -> Option<&str> {
        if self.method == Method::GET || self.method == Method::POST {
            None
        } else {
            Some(self.method.as_str())
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Builds admin URLs under a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    prefix: String,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new("/admin")
    }
}

impl UrlBuilder {
    /// Builder for `prefix`; a trailing slash is ignored
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = prefix.trim_end_matches('/').to_string();
        Self { prefix }
    }

    /// Configured prefix
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn resource(&self, uri: &str) -> String {
        format!("{}/resource/{}", self.prefix, segment(uri))
    }

    /// Create a record of a resource
    #[must_use]
    pub fn crud_store(&self, uri: &str) -> Route {
        Route {
            method: Method::POST,
            url: format!("{}/crud", self.resource(uri)),
        }
    }

    /// Update a record of a resource
    #[must_use]
    pub fn crud_update(&self, uri: &str, key: &str) -> Route {
        Route {
            method: Method::PUT,
            url: format!("{}/crud/{}", self.resource(uri), segment(key)),
        }
    }

    /// Delete a record of a resource
    #[must_use]
    pub fn crud_destroy(&self, uri: &str, key: &str) -> Route {
        Route {
            method: Method::DELETE,
            url: format!("{}/crud/{}", self.resource(uri), segment(key)),
        }
    }

    /// Create the related record of `relation` on a parent record
    #[must_use]
    pub fn relation_store(&self, uri: &str, parent_key: &str, relation: &str) -> Route {
        Route {
            method: Method::POST,
            url: self.relation_url(uri, parent_key, relation),
        }
    }

    /// Update the related record of `relation` on a parent record
    #[must_use]
    pub fn relation_update(&self, uri: &str, parent_key: &str, relation: &str) -> Route {
        Route {
            method: Method::PUT,
            url: self.relation_url(uri, parent_key, relation),
        }
    }

    fn relation_url(&self, uri: &str, parent_key: &str, relation: &str) -> String {
        format!(
            "{}/{}/relation/{}",
            self.resource(uri),
            segment(parent_key),
            segment(relation)
        )
    }

    /// A page of a resource (`index-page`, `form-page`, `detail-page`),
    /// optionally for one record
    #[must_use]
    pub fn page(&self, uri: &str, page: &str, key: Option<&str>) -> String {
        match key.filter(|k| !k.is_empty()) {
            Some(key) => format!("{}/{}/{}", self.resource(uri), segment(page), segment(key)),
            None => format!("{}/{}", self.resource(uri), segment(page)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crud_routes() {
        let urls = UrlBuilder::new("/admin/");
        assert_eq!(urls.prefix(), "/admin");

        let store = urls.crud_store("posts");
        assert_eq!(store.url, "/admin/resource/posts/crud");
        assert_eq!(store.method, Method::POST);
        assert_eq!(store.spoofed_method(), None);

        let update = urls.crud_update("posts", "5");
        assert_eq!(update.url, "/admin/resource/posts/crud/5");
        assert_eq!(update.form_method(), "POST");
        assert_eq!(update.spoofed_method(), Some("PUT"));

        let destroy = urls.crud_destroy("posts", "5");
        assert_eq!(destroy.spoofed_method(), Some("DELETE"));
    }

    #[test]
    fn test_relation_routes() {
        let urls = UrlBuilder::default();
        let store = urls.relation_store("users", "3", "profile");
        assert_eq!(store.url, "/admin/resource/users/3/relation/profile");
        assert_eq!(store.method, Method::POST);

        let update = urls.relation_update("users", "3", "profile");
        assert_eq!(update.url, store.url);
        assert_eq!(update.method, Method::PUT);
        assert_eq!(update.to_string(), "PUT /admin/resource/users/3/relation/profile");
    }

    #[test]
    fn test_page_urls() {
        let urls = UrlBuilder::new("/backoffice");
        assert_eq!(
            urls.page("users", "form-page", Some("3")),
            "/backoffice/resource/users/form-page/3"
        );
        assert_eq!(urls.page("users", "index-page", None), "/backoffice/resource/users/index-page");
        assert_eq!(urls.page("users", "form-page", Some("")), "/backoffice/resource/users/form-page");
    }

    #[test]
    fn test_query_link_encodes_name_and_value() {
        assert_eq!(query_link("query-tag", "active-users"), "?query-tag=active-users");
        assert_eq!(query_link("query-tag", "a&b=c d"), "?query-tag=a%26b%3Dc%20d");
        assert_eq!(query_link("tag filter", "x"), "?tag%20filter=x");
    }

    #[test]
    fn test_dynamic_segments_are_encoded() {
        let urls = UrlBuilder::default();
        assert_eq!(
            urls.crud_update("posts", "a/b?c").url,
            "/admin/resource/posts/crud/a%2Fb%3Fc"
        );
        assert_eq!(
            urls.relation_store("users", "3 4", "profile#x").url,
            "/admin/resource/users/3%204/relation/profile%23x"
        );
        assert_eq!(urls.page("users", "form-page", Some("50%")), "/admin/resource/users/form-page/50%25");
        assert_eq!(urls.crud_store("user-profiles").url, "/admin/resource/user-profiles/crud");
    }
}
