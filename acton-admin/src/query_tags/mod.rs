//! Query tags: named, request-selectable filters of a listing
//!
//! A listing page declares a [`QueryTagSet`]; the request parameter
//! (`query-tag` by default) names the selected tag by its URI. With no tag
//! named, the first default tag applies.
//!
//! # Example
//!
//! ```rust
//! use acton_admin::context::RequestParams;
//! use acton_admin::query::{EntityDescriptor, MemoryStore, Query};
//! use acton_admin::query_tags::{QueryTag, QueryTagSet};
//! use std::sync::Arc;
//!
//! let tags = QueryTagSet::new("query-tag")
//!     .tag(QueryTag::new("Published", |q: Query| q.where_eq("status", "published")).default())
//!     .tag(QueryTag::new("Drafts", |q: Query| q.where_eq("status", "draft")));
//!
//! let params = RequestParams::new().with("query-tag", "drafts");
//! assert_eq!(tags.active(&params).map(|t| t.uri()), Some("drafts".to_string()));
//!
//! let query = Query::new(Arc::new(MemoryStore::new()), &EntityDescriptor::new("posts"));
//! assert_eq!(tags.apply(query, &params).predicates().len(), 1);
//! ```

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::config::QueryTagSettings;
use crate::context::RequestParams;
use crate::query::Query;
use crate::routing::query_link;
use crate::support::slug;

/// Filter closure of a tag
pub type TagFilter = Arc<dyn Fn(Query) -> Query + Send + Sync>;

/// Visibility predicate of a tag
pub type TagVisibility = Arc<dyn Fn(&RequestParams) -> bool + Send + Sync>;

/// A named filter
#[derive(Clone)]
pub struct QueryTag {
    label: String,
    filter: TagFilter,
    alias: Option<String>,
    default: bool,
    icon: Option<String>,
    can_see: Option<TagVisibility>,
}

impl fmt::Debug for QueryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryTag")
            .field("label", &self.label)
            .field("alias", &self.alias)
            .field("default", &self.default)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

impl QueryTag {
    /// Tag labelled `label` narrowing queries with `filter`
    #[must_use]
    pub fn new<F>(label: impl Into<String>, filter: F) -> Self
    where
        F: Fn(Query) -> Query + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            filter: Arc::new(filter),
            alias: None,
            default: false,
            icon: None,
            can_see: None,
        }
    }

    /// Use `alias` as URI instead of the label's slug
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Mark as default
    #[must_use]
    pub const fn default(self) -> Self {
        self.default_when(true)
    }

    /// Mark as default when `condition` holds
    #[must_use]
    pub const fn default_when(mut self, condition: bool) -> Self {
        self.default = condition;
        self
    }

    /// Icon name shown in the tag bar
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Show the tag only when `predicate` holds for the request
    #[must_use]
    pub fn can_see<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RequestParams) -> bool + Send + Sync + 'static,
    {
        self.can_see = Some(Arc::new(predicate));
        self
    }

    /// Label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// URI: the alias, or the slug of the label
    #[must_use]
    pub fn uri(&self) -> String {
        self.alias.clone().unwrap_or_else(|| slug(&self.label))
    }

    /// Whether marked default
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.default
    }

    /// Icon name
    #[must_use]
    pub fn icon_name(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Whether the tag is visible for this request
    #[must_use]
    pub fn is_visible(&self, params: &RequestParams) -> bool {
        self.can_see.as_ref().is_none_or(|can_see| can_see(params))
    }

    /// Whether `param` names this tag, or names nothing and this tag is a
    /// default
    #[must_use]
    pub fn is_active(&self, params: &RequestParams, param: &str) -> bool {
        if !self.is_visible(params) {
            return false;
        }
        if self.default && !params.filled(param) {
            return true;
        }
        params.scalar(param) == Some(self.uri().as_str())
    }

    /// Run the filter
    #[must_use]
    pub fn apply(&self, query: Query) -> Query {
        (self.filter)(query)
    }
}

/// One entry of a listing's tag bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryTagLink {
    /// Tag label
    pub label: String,
    /// Tag URI
    pub uri: String,
    /// Link target (`?query-tag=uri`, percent-encoded)
    pub href: String,
    /// Icon name
    pub icon: Option<String>,
    /// Whether this is the applied tag
    pub active: bool,
}

/// The tags of one listing
#[derive(Debug, Clone)]
pub struct QueryTagSet {
    param: String,
    tags: Vec<QueryTag>,
}

impl Default for QueryTagSet {
    fn default() -> Self {
        Self::from_settings(&QueryTagSettings::default())
    }
}

impl QueryTagSet {
    /// Empty set reading the selected tag from `param`
    #[must_use]
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            tags: Vec::new(),
        }
    }

    /// Empty set using the configured parameter name
    #[must_use]
    pub fn from_settings(settings: &QueryTagSettings) -> Self {
        Self::new(settings.param.clone())
    }

    /// Append a tag
    #[must_use]
    pub fn tag(mut self, tag: QueryTag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Request parameter name
    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Tags in declaration order
    #[must_use]
    pub fn tags(&self) -> &[QueryTag] {
        &self.tags
    }

    /// The applied tag: the visible tag named by the request, otherwise
    /// the first visible default when the request names none
    #[must_use]
    pub fn active(&self, params: &RequestParams) -> Option<&QueryTag> {
        let visible = || self.tags.iter().filter(|tag| tag.is_visible(params));

        if params.filled(&self.param) {
            let selected = params.scalar(&self.param)?;
            return visible().find(|tag| tag.uri() == selected);
        }

        visible().find(|tag| tag.is_default())
    }

    /// Whether the tag with `uri` is the applied one
    #[must_use]
    pub fn is_active(&self, uri: &str, params: &RequestParams) -> bool {
        self.active(params).is_some_and(|tag| tag.uri() == uri)
    }

    /// Narrow `query` with the applied tag, if any
    #[must_use]
    pub fn apply(&self, query: Query, params: &RequestParams) -> Query {
        match self.active(params) {
            Some(tag) => {
                trace!(tag = %tag.uri(), entity = %query.entity().name, "Applying query tag");
                tag.apply(query)
            }
            None => query,
        }
    }

    /// Tag bar entries of the visible tags
    #[must_use]
    pub fn links(&self, params: &RequestParams) -> Vec<QueryTagLink> {
        let active = self.active(params).map(QueryTag::uri);
        self.tags
            .iter()
            .filter(|tag| tag.is_visible(params))
            .map(|tag| {
                let uri = tag.uri();
                QueryTagLink {
                    label: tag.label.clone(),
                    href: query_link(&self.param, &uri),
                    icon: tag.icon.clone(),
                    active: active.as_deref() == Some(uri.as_str()),
                    uri,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{EntityDescriptor, MemoryStore, Operator};

    fn tags() -> QueryTagSet {
        QueryTagSet::new("query-tag")
            .tag(QueryTag::new("Active Users", |q: Query| q.where_eq("active", true)).default())
            .tag(QueryTag::new("Banned", |q: Query| q.where_eq("banned", true)))
            .tag(QueryTag::new("Recent", |q: Query| q.order_by_desc("created_at")).alias("new"))
    }

    fn query() -> Query {
        Query::new(Arc::new(MemoryStore::new()), &EntityDescriptor::new("users"))
    }

    #[test]
    fn test_uri_is_alias_or_slug() {
        let set = tags();
        let uris = set.tags().iter().map(QueryTag::uri).collect::<Vec<_>>();
        assert_eq!(uris, ["active-users", "banned", "new"]);
    }

    #[test]
    fn test_default_active_when_nothing_selected() {
        let set = tags();
        let params = RequestParams::new();

        let active = set
            .tags()
            .iter()
            .map(|tag| tag.is_active(&params, set.param()))
            .collect::<Vec<_>>();
        assert_eq!(active, [true, false, false]);
        assert!(set.is_active("active-users", &params));
    }

    #[test]
    fn test_selected_tag_only() {
        let set = tags();
        let params = RequestParams::new().with("query-tag", "banned");

        let active = set
            .tags()
            .iter()
            .map(|tag| tag.is_active(&params, set.param()))
            .collect::<Vec<_>>();
        assert_eq!(active, [false, true, false]);
        assert!(!set.is_active("active-users", &params));
    }

    #[test]
    fn test_blank_parameter_counts_as_unselected() {
        let params = RequestParams::new().with("query-tag", "  ");
        assert_eq!(tags().active(&params).map(QueryTag::uri).as_deref(), Some("active-users"));
    }

    #[test]
    fn test_unknown_tag_applies_nothing() {
        let params = RequestParams::new().with("query-tag", "missing");
        let set = tags();
        assert!(set.active(&params).is_none());
        assert!(set.apply(query(), &params).predicates().is_empty());
    }

    #[test]
    fn test_apply_runs_filter() {
        let params = RequestParams::new().with("query-tag", "banned");
        let query = tags().apply(query(), &params);
        assert_eq!(query.predicates().len(), 1);
        assert_eq!(query.predicates()[0].column, "banned");
        assert_eq!(query.predicates()[0].operator, Operator::Eq);

        let query = tags().apply(self::query(), &RequestParams::new().with("query-tag", "new"));
        assert_eq!(query.ordering().len(), 1);
    }

    #[test]
    fn test_multiple_defaults_resolve_to_first() {
        let set = QueryTagSet::new("query-tag")
            .tag(QueryTag::new("One", |q: Query| q).default())
            .tag(QueryTag::new("Two", |q: Query| q).default());
        let params = RequestParams::new();

        assert_eq!(set.active(&params).map(QueryTag::uri).as_deref(), Some("one"));
        assert!(!set.is_active("two", &params));
        assert!(set.tags()[1].is_active(&params, set.param()));
    }

    #[test]
    fn test_hidden_tags_are_never_active() {
        let set = QueryTagSet::new("query-tag")
            .tag(
                QueryTag::new("Staff", |q: Query| q.where_eq("staff", true))
                    .default()
                    .can_see(|params| params.scalar("role") == Some("admin")),
            )
            .tag(QueryTag::new("All", |q: Query| q).default());

        let guest = RequestParams::new();
        assert_eq!(set.active(&guest).map(QueryTag::uri).as_deref(), Some("all"));

        let admin = RequestParams::new().with("role", "admin");
        assert_eq!(set.active(&admin).map(QueryTag::uri).as_deref(), Some("staff"));

        let forced = RequestParams::new().with("query-tag", "staff");
        assert!(set.active(&forced).is_none());
    }

    #[test]
    fn test_links() {
        let set = tags();
        let links = set.links(&RequestParams::new().with("query-tag", "new"));

        assert_eq!(links.len(), 3);
        assert_eq!(links[2].href, "?query-tag=new");
        assert!(links[2].active);
        assert!(!links[0].active);
    }

    #[test]
    fn test_link_href_encodes_alias() {
        let set = QueryTagSet::new("query-tag")
            .tag(QueryTag::new("Odd", |q: Query| q).alias("a&b=c d"));

        let links = set.links(&RequestParams::new().with("query-tag", "a&b=c d"));
        assert_eq!(links[0].href, "?query-tag=a%26b%3Dc%20d");
        assert_eq!(links[0].uri, "a&b=c d");
        assert!(links[0].active);
    }

    #[test]
    fn test_custom_param() {
        let settings = QueryTagSettings {
            param: "tab".to_string(),
        };
        let set = QueryTagSet::from_settings(&settings)
            .tag(QueryTag::new("Banned", |q: Query| q.where_eq("banned", true)));
        assert!(set.is_active("banned", &RequestParams::new().with("tab", "banned")));
        assert!(!set.is_active("banned", &RequestParams::new().with("query-tag", "banned")));
    }
}
