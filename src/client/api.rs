/**
 * Forum API Client
 *
 * Async HTTP client covering every endpoint of the forum server. Requests
 * carry the bearer token from `AppConfig` when one is set; `login` and
 * `register` do not store the returned token, call `set_token` for that.
 *
 * # Example
 *
 * ```rust,no_run
 * use forum::client::ForumClient;
 * use forum::shared::config::AppConfig;
 * use forum::shared::user::LoginRequest;
 *
 * # async fn example() -> Result<(), forum::client::ClientError> {
 * let mut client = ForumClient::new(AppConfig::builder().build()?)?;
 * let auth = client
 *     .login(&LoginRequest { email: "fan@example.com".into(), password: "Secret123".into() })
 *     .await?;
 * client.set_token(auth.token);
 * let me = client.me().await?;
 * println!("signed in as {}", me.user.username);
 * # Ok(())
 * # }
 * ```
 */
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::client::error::ClientError;
use crate::shared::comment::{
    CommentEnvelope, CommentListResponse, CreateCommentRequest, MyCommentsResponse,
    UpdateCommentRequest,
};
use crate::shared::config::AppConfig;
use crate::shared::pagination::ListQuery;
use crate::shared::post::{
    CreatePostRequest, LikeResponse, LockResponse, PinResponse, PostDetail, PostEnvelope,
    PostListResponse, UpdatePostRequest,
};
use crate::shared::user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MeResponse, MessageResponse,
    ProfileResponse, RegisterRequest, UpdateProfileRequest,
};
use crate::shared::validation::check;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct ForumClient {
    http: Client,
    config: AppConfig,
}

impl ForumClient {
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.config.token = None;
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.config.endpoint(path)?;
        let builder = self.http.request(method, url);
        Ok(match self.config.token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Request failed with {}: {}", status, body);
            return Err(ClientError::from_response(status.as_u16(), &body));
        }
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)?).await
    }

    async fn get_query<T: DeserializeOwned>(&self, path: &str, query: &ListQuery) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    async fn with_body<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(method, path)?.json(body)).await
    }

    async fn empty<T: DeserializeOwned>(&self, method: Method, path: &str) -> ClientResult<T> {
        self.send(self.request(method, path)?).await
    }

    /// `GET /` server information
    pub async fn api_info(&self) -> ClientResult<serde_json::Value> {
        self.get("/").await
    }

    // Accounts

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let request = request.clone().normalized();
        check(&request)?;
        self.with_body(Method::POST, "/api/auth/register", &request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.with_body(Method::POST, "/api/auth/login", request).await
    }

    pub async fn me(&self) -> ClientResult<MeResponse> {
        self.get("/api/auth/me").await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> ClientResult<MessageResponse> {
        self.with_body(Method::POST, "/api/auth/change-password", request).await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientResult<ProfileResponse> {
        self.with_body(Method::PUT, "/api/auth/profile", request).await
    }

    // Posts

    pub async fn list_posts(&self, query: &ListQuery) -> ClientResult<PostListResponse> {
        self.get_query("/api/posts", query).await
    }

    pub async fn my_posts(&self, query: &ListQuery) -> ClientResult<PostListResponse> {
        self.get_query("/api/posts/my-posts", query).await
    }

    /// Fetch a post; the server counts this as a view
    pub async fn get_post(&self, id: Uuid) -> ClientResult<PostDetail> {
        self.get(&format!("/api/posts/{}", id)).await
    }

    pub async fn create_post(&self, request: &CreatePostRequest) -> ClientResult<PostEnvelope> {
        let request = request.clone().normalized();
        check(&request)?;
        self.with_body(Method::POST, "/api/posts", &request).await
    }

    pub async fn update_post(&self, id: Uuid, request: &UpdatePostRequest) -> ClientResult<PostEnvelope> {
        self.with_body(Method::PUT, &format!("/api/posts/{}", id), request).await
    }

    pub async fn delete_post(&self, id: Uuid) -> ClientResult<MessageResponse> {
        self.empty(Method::DELETE, &format!("/api/posts/{}", id)).await
    }

    pub async fn like_post(&self, id: Uuid) -> ClientResult<LikeResponse> {
        self.empty(Method::POST, &format!("/api/posts/{}/like", id)).await
    }

    pub async fn pin_post(&self, id: Uuid) -> ClientResult<PinResponse> {
        self.empty(Method::POST, &format!("/api/posts/{}/pin", id)).await
    }

    pub async fn lock_post(&self, id: Uuid) -> ClientResult<LockResponse> {
        self.empty(Method::POST, &format!("/api/posts/{}/lock", id)).await
    }

    // Comments

    pub async fn list_comments(&self, post_id: Uuid, query: &ListQuery) -> ClientResult<CommentListResponse> {
        self.get_query(&format!("/api/comments/post/{}", post_id), query).await
    }

    pub async fn create_comment(
        &self,
        post_id: Uuid,
        request: &CreateCommentRequest,
    ) -> ClientResult<CommentEnvelope> {
        let request = request.clone().normalized();
        check(&request)?;
        self.with_body(Method::POST, &format!("/api/comments/post/{}", post_id), &request)
            .await
    }

    pub async fn my_comments(&self, query: &ListQuery) -> ClientResult<MyCommentsResponse> {
        self.get_query("/api/comments/my-comments", query).await
    }

    pub async fn update_comment(
        &self,
        id: Uuid,
        request: &UpdateCommentRequest,
    ) -> ClientResult<CommentEnvelope> {
        self.with_body(Method::PUT, &format!("/api/comments/{}", id), request).await
    }

    pub async fn delete_comment(&self, id: Uuid) -> ClientResult<MessageResponse> {
        self.empty(Method::DELETE, &format!("/api/comments/{}", id)).await
    }

    pub async fn like_comment(&self, id: Uuid) -> ClientResult<LikeResponse> {
        self.empty(Method::POST, &format!("/api/comments/{}/like", id)).await
    }
}
