// Posts service.
// Typed calls against the JSONPlaceholder posts and comments resources.

use serde_json::Value;
use tracing::debug;

use crate::api::{Comment, HttpClient, NewPost, Post, build_url};
use crate::error::{PanoramaError, Result};

impl NewPost {
    /// Reject drafts with a blank title or body.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PanoramaError::validation("Title is required"));
        }
        if self.body.trim().is_empty() {
            return Err(PanoramaError::validation("Body is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PostsService {
    client: HttpClient,
    base: String,
}

impl PostsService {
    pub fn new(client: HttpClient, base: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let url = build_url(&self.base, "/posts");
        self.client.get(&url).await?.json()
    }

    pub async fn post_comments(&self, id: u64) -> Result<Vec<Comment>> {
        let url = build_url(&self.base, &format!("/posts/{}/comments", id));
        self.client.get(&url).await?.json()
    }

    /// Create a post. The draft is validated before any request is made.
    pub async fn create_post(&self, draft: &NewPost) -> Result<Post> {
        draft.validate()?;
        let url = build_url(&self.base, "/posts");
        let body = serde_json::to_value(draft)?;
        self.client.post(&url, &body).await?.json()
    }

    /// Replace a post.
    pub async fn update_post(&self, id: u64, draft: &NewPost) -> Result<Post> {
        draft.validate()?;
        let url = build_url(&self.base, &format!("/posts/{}", id));
        let mut body = serde_json::to_value(draft)?;
        if let Value::Object(map) = &mut body {
            map.insert("id".to_string(), Value::from(id));
        }
        self.client.put(&url, &body).await?.json()
    }

    pub async fn delete_post(&self, id: u64) -> Result<()> {
        let url = build_url(&self.base, &format!("/posts/{}", id));
        let response = self.client.delete(&url).await?;
        debug!(id, status = response.status, ok = response.ok, "deleted post");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockServer;
    use std::time::Duration;

    fn service(base: &str) -> PostsService {
        PostsService::new(HttpClient::new(Duration::from_secs(2)).unwrap(), base)
    }

    fn draft(title: &str, body: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            body: body.to_string(),
            user_id: 1,
        }
    }

    #[test]
    fn test_validate_requires_fields() {
        assert!(draft("t", "b").validate().is_ok());
        assert_eq!(
            draft(" ", "b").validate().unwrap_err().to_string(),
            "Title is required"
        );
        assert_eq!(
            draft("t", "").validate().unwrap_err().to_string(),
            "Body is required"
        );
    }

    #[tokio::test]
    async fn test_list_posts() {
        let server = MockServer::start(vec![(
            200,
            r#"[{"userId":1,"id":1,"title":"a","body":"x"},{"userId":1,"id":2,"title":"b","body":"y"}]"#
                .to_string(),
        )])
        .await;

        let posts = service(&server.base_url).list_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].title, "b");

        let requests = server.requests().await;
        assert!(requests[0].starts_with("GET /posts "));
    }

    #[tokio::test]
    async fn test_post_comments_path() {
        let server = MockServer::start(vec![(
            200,
            r#"[{"postId":3,"id":11,"name":"n","email":"e@x.io","body":"c"}]"#.to_string(),
        )])
        .await;

        let comments = service(&server.base_url).post_comments(3).await.unwrap();
        assert_eq!(comments[0].post_id, 3);

        let requests = server.requests().await;
        assert!(requests[0].starts_with("GET /posts/3/comments "));
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_error() {
        let server = MockServer::start(vec![(200, r#"{"unexpected": true}"#.to_string())]).await;
        let err = service(&server.base_url).list_posts().await.unwrap_err();
        assert!(matches!(err, PanoramaError::Schema(_)));
    }

    #[tokio::test]
    async fn test_create_post_rejects_invalid_before_request() {
        // Nothing listens on port 1; a request would surface as a transport error
        let err = service("http://127.0.0.1:1")
            .create_post(&draft("", "body"))
            .await
            .unwrap_err();
        assert!(matches!(err, PanoramaError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_and_update_post() {
        let server = MockServer::start(vec![
            (201, r#"{"userId":1,"id":101,"title":"t","body":"b"}"#.to_string()),
            (200, r#"{"userId":1,"id":5,"title":"t2","body":"b2"}"#.to_string()),
        ])
        .await;
        let service = service(&server.base_url);

        let created = service.create_post(&draft("t", "b")).await.unwrap();
        assert_eq!(created.id, 101);

        let updated = service.update_post(5, &draft("t2", "b2")).await.unwrap();
        assert_eq!(updated.title, "t2");

        let requests = server.requests().await;
        assert!(requests[0].starts_with("POST /posts "));
        assert!(requests[1].starts_with("PUT /posts/5 "));
        assert!(requests[1].contains(r#""id":5"#));
    }

    #[tokio::test]
    async fn test_delete_post() {
        let server = MockServer::start(vec![(200, "{}".to_string())]).await;
        service(&server.base_url).delete_post(7).await.unwrap();

        let requests = server.requests().await;
        assert!(requests[0].starts_with("DELETE /posts/7 "));
    }
}
