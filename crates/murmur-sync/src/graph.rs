use crate::source::RawComment;
use crate::{Result, SyncError};
use serde::{Deserialize, Serialize};

pub const GRAPH_BASE_URL: &str = "https://graph.facebook.com";
const COMMENT_FIELDS: &str = "from{id,name,link},message,created_time,like_count";
pub const POST_FIELDS: &str = "id,message,created_time,permalink_url";

/// Page credentials and API version used for every Graph request.
#[derive(Debug, Clone)]
pub struct GraphAuth {
    pub page_id: String,
    pub access_token: String,
    pub api_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPost {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub permalink_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<GraphApiError>,
}

#[derive(Debug, Deserialize)]
struct GraphApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PostCommentsBody {
    #[serde(default)]
    comments: Option<Page<GraphComment>>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct GraphComment {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    from: Option<GraphFrom>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    created_time: Option<String>,
    #[serde(default)]
    like_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GraphFrom {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Object id of a post as the Graph API expects it (`<page>_<post>`).
/// Ids that already carry the page prefix are passed through.
pub fn post_object_id(page_id: &str, post_id: &str) -> String {
    let post_id = post_id.trim();
    if post_id.contains('_') {
        post_id.to_string()
    } else {
        format!("{}_{}", page_id.trim(), post_id)
    }
}

pub fn comment_fields(limit: u32) -> String {
    format!("comments.limit({limit}){{{COMMENT_FIELDS}}}")
}

/// Parses a post-with-comments response body. A missing `comments` edge
/// yields an empty list.
pub fn parse_graph_comments(body: &str, post_id: &str) -> Result<Vec<RawComment>> {
    check_api_error(body)?;
    let parsed: PostCommentsBody = serde_json::from_str(body)?;
    let comments = parsed.comments.map(|page| page.data).unwrap_or_default();
    Ok(comments
        .into_iter()
        .map(|comment| {
            let (author_id, author_name) = match comment.from {
                Some(from) => (from.id, from.name),
                None => (None, None),
            };
            RawComment {
                external_id: comment.id,
                post_id: Some(post_id.to_string()),
                author_id,
                author_name,
                message: comment.message.unwrap_or_default(),
                created_time: comment.created_time,
                like_count: comment.like_count,
            }
        })
        .collect())
}

pub fn parse_graph_posts(body: &str) -> Result<Vec<GraphPost>> {
    check_api_error(body)?;
    let parsed: Page<GraphPost> = serde_json::from_str(body)?;
    Ok(parsed.data)
}

fn check_api_error(body: &str) -> Result<()> {
    let envelope: ErrorEnvelope = serde_json::from_str(body)?;
    match envelope.error {
        Some(error) => {
            let message = error
                .message
                .unwrap_or_else(|| "unknown Graph API error".to_string());
            Err(SyncError::Api(match error.code {
                Some(code) => format!("{message} (code {code})"),
                None => message,
            }))
        }
        None => Ok(()),
    }
}

#[cfg(feature = "graph-sync")]
mod imp {
    use super::{
        check_api_error, comment_fields, parse_graph_comments, parse_graph_posts,
        post_object_id, GraphAuth, GraphPost, GRAPH_BASE_URL, POST_FIELDS,
    };
    use crate::source::{CommentSource, RawComment};
    use crate::{Result, SyncError};
    use reqwest::blocking::Client;
    use std::time::Duration;
    use url::Url;

    pub(super) fn fetch_comments(
        auth: &GraphAuth,
        post_id: &str,
        limit: u32,
    ) -> Result<Vec<RawComment>> {
        let object_id = post_object_id(&auth.page_id, post_id);
        let fields = comment_fields(limit);
        let url = graph_url(
            auth,
            &object_id,
            &[("fields", fields.as_str()), ("access_token", auth.access_token.as_str())],
        )?;
        tracing::debug!(post = %object_id, limit, "fetching post comments");
        let body = get(&url)?;
        let comments = parse_graph_comments(&body, &object_id)?;
        tracing::debug!(count = comments.len(), "fetched comments");
        Ok(comments)
    }

    pub fn list_posts(auth: &GraphAuth, limit: u32) -> Result<Vec<GraphPost>> {
        let limit = limit.to_string();
        let path = format!("{}/posts", auth.page_id.trim());
        let url = graph_url(
            auth,
            &path,
            &[
                ("fields", POST_FIELDS),
                ("limit", limit.as_str()),
                ("access_token", auth.access_token.as_str()),
            ],
        )?;
        tracing::debug!(page = %auth.page_id, "listing page posts");
        parse_graph_posts(&get(&url)?)
    }

    fn graph_url(auth: &GraphAuth, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let base = format!("{GRAPH_BASE_URL}/{}/{}", auth.api_version.trim(), path);
        Ok(Url::parse_with_params(&base, query)?)
    }

    fn get(url: &Url) -> Result<String> {
        let client = Client::builder()
            .user_agent(concat!("murmur/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let response = client.get(url.clone()).send()?;
        let status = response.status();
        let body = response.text()?;
        // Graph reports failures as a JSON `error` object with a 4xx status.
        if let Err(err @ SyncError::Api(_)) = check_api_error(&body) {
            return Err(err);
        }
        if !status.is_success() {
            return Err(SyncError::Api(format!("unexpected status {status}")));
        }
        Ok(body)
    }

    impl CommentSource for super::GraphSource {
        fn source_name(&self) -> &'static str {
            "graph"
        }

        fn fetch_comments(&self) -> Result<Vec<RawComment>> {
            fetch_comments(&self.auth, &self.post_id, self.limit)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::graph_url;
        use crate::graph::GraphAuth;

        #[test]
        fn graph_url_encodes_query() {
            let auth = GraphAuth {
                page_id: "615".to_string(),
                access_token: "a b".to_string(),
                api_version: "v24.0".to_string(),
            };
            let url = graph_url(&auth, "615_900", &[("access_token", "a b")]).expect("url");
            assert_eq!(
                url.as_str(),
                "https://graph.facebook.com/v24.0/615_900?access_token=a+b"
            );
        }
    }
}

#[cfg(not(feature = "graph-sync"))]
mod imp {
    use super::{GraphAuth, GraphPost};
    use crate::source::{CommentSource, RawComment};
    use crate::{Result, SyncError};

    fn unavailable() -> SyncError {
        SyncError::Unavailable("Graph API import requires the graph-sync feature".to_string())
    }

    pub fn list_posts(_auth: &GraphAuth, _limit: u32) -> Result<Vec<GraphPost>> {
        Err(unavailable())
    }

    impl CommentSource for super::GraphSource {
        fn source_name(&self) -> &'static str {
            "graph"
        }

        fn fetch_comments(&self) -> Result<Vec<RawComment>> {
            let _ = (&self.auth, &self.post_id, self.limit);
            Err(unavailable())
        }
    }
}

pub use imp::list_posts;

/// Comments of one page post.
#[derive(Debug, Clone)]
pub struct GraphSource {
    auth: GraphAuth,
    post_id: String,
    limit: u32,
}

impl GraphSource {
    pub fn new(auth: GraphAuth, post_id: impl Into<String>, limit: u32) -> Self {
        Self {
            auth,
            post_id: post_id.into(),
            limit,
        }
    }
}
