//! End-to-end tests for the HTML flows, driven through the router.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use kakeibo::api::AppState;
use kakeibo::clients::oauth::{OAuthClient, OAuthIdentity};
use kakeibo::config::{Config, OAuthProviderConfig};
use kakeibo::domain::{AccountBookId, UserId};
use sea_orm::{EntityTrait, PaginatorTrait};
use std::sync::Arc;
use tower::ServiceExt;

const PASSWORD: &str = "password123";

fn test_config() -> Config {
    let db_path = std::env::temp_dir().join(format!("kakeibo-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.oauth = vec![OAuthProviderConfig {
        name: "github".to_string(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        authorize_url: "https://github.example/login/oauth/authorize".to_string(),
        token_url: "https://github.example/login/oauth/access_token".to_string(),
        userinfo_url: "https://api.github.example/user".to_string(),
        redirect_uri: "http://localhost:3000/oauth/callback".to_string(),
        scope: "user:email".to_string(),
        ..Default::default()
    }];
    config
}

struct FakeOAuthClient;

#[async_trait::async_trait]
impl OAuthClient for FakeOAuthClient {
    async fn fetch_identity(
        &self,
        _provider: &OAuthProviderConfig,
        code: &str,
    ) -> anyhow::Result<OAuthIdentity> {
        if code == "rejected" {
            anyhow::bail!("provider rejected the code");
        }
        Ok(OAuthIdentity {
            uid: "4242".to_string(),
            email: Some("octocat@example.com".to_string()),
            name: Some("octocat".to_string()),
        })
    }
}

async fn spawn_app() -> (Arc<AppState>, Router) {
    let state = kakeibo::api::create_app_state_with_oauth_client(
        test_config(),
        Arc::new(FakeOAuthClient),
        None,
    )
    .await
    .expect("failed to create app state");

    let router = kakeibo::api::router(state.clone());
    (state, router)
}

/// A browser stand-in that keeps the session cookie between requests.
struct Client {
    router: Router,
    cookie: Option<String>,
}

impl Client {
    fn new(router: &Router) -> Self {
        Self {
            router: router.clone(),
            cookie: None,
        }
    }

    async fn send(&mut self, method: &str, uri: &str, form: Option<&[(&str, &str)]>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = match form {
            Some(pairs) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(
                    url::form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(pairs)
                        .finish(),
                )
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let pair = value.to_str().unwrap().split(';').next().unwrap_or_default();
            if let Some((name, id)) = pair.split_once('=') {
                self.cookie = (!id.is_empty()).then(|| format!("{name}={id}"));
            }
        }

        response
    }

    async fn get(&mut self, uri: &str) -> Response<Body> {
        self.send("GET", uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> Response<Body> {
        self.send("POST", uri, Some(form)).await
    }

    /// GETs the redirect target of `response` and returns its body.
    async fn follow(&mut self, response: Response<Body>) -> String {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = location(&response);
        let next = self.get(&location).await;
        assert_eq!(next.status(), StatusCode::OK, "GET {location}");
        body_text(next).await
    }

    async fn sign_up(&mut self, username: &str, email: &str) -> Response<Body> {
        self.post(
            "/users",
            &[
                ("username", username),
                ("email", email),
                ("password", PASSWORD),
                ("password_confirmation", PASSWORD),
            ],
        )
        .await
    }

    async fn log_in(&mut self, email: &str, password: &str) -> Response<Body> {
        self.post("/login", &[("email", email), ("password", password)])
            .await
    }

    async fn create_book(&mut self, title: &str) -> String {
        let response = self
            .post("/account_books", &[("title", title), ("description", "")])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        location(&response)
    }
}

fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing location header")
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn user_count(state: &AppState) -> u64 {
    kakeibo::entities::users::Entity::find()
        .count(&state.store().conn)
        .await
        .unwrap()
}

async fn user_id(state: &AppState, email: &str) -> UserId {
    state
        .store()
        .get_user_by_email(email)
        .await
        .unwrap()
        .expect("user exists")
        .id
}

fn book_id(path: &str) -> &str {
    path.trim_start_matches("/account_books/")
}

#[tokio::test]
async fn test_top_page_renders() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);

    let response = client.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("家計簿"));
    assert!(body.contains(r#"href="/users/new""#));
}

#[tokio::test]
async fn test_sign_up_logs_in_and_asks_for_profile() {
    let (state, app) = spawn_app().await;
    let mut client = Client::new(&app);

    let response = client.sign_up("hanako", "Hanako@Example.com").await;
    assert_eq!(location(&response), "/user_profiles/new");

    let body = client.follow(response).await;
    assert!(body.contains("ユーザー登録しました"));
    assert!(body.contains("hanako"));

    let stored = state
        .store()
        .get_user_by_email("hanako@example.com")
        .await
        .unwrap()
        .expect("email is stored lowercased");
    assert_eq!(stored.username, "hanako");
}

#[tokio::test]
async fn test_sign_up_with_blank_form_lists_every_error() {
    let (state, app) = spawn_app().await;
    let mut client = Client::new(&app);

    let response = client
        .post(
            "/users",
            &[
                ("username", ""),
                ("email", ""),
                ("password", ""),
                ("password_confirmation", ""),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains("ユーザー登録に失敗しました"));
    assert!(body.contains("ユーザー名を入力してください"));
    assert!(body.contains("ユーザー名は1文字以上で入力してください"));
    assert!(body.contains("メールアドレスを入力してください"));
    assert!(body.contains("パスワードは8文字以上で入力してください"));
    assert!(body.contains("パスワード確認を入力してください"));
    assert_eq!(user_count(&state).await, 0);
}

#[tokio::test]
async fn test_failed_sign_up_keeps_current_user_in_header() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);
    client.sign_up("kazuko", "kazuko@example.com").await;

    let response = client
        .post(
            "/users",
            &[
                ("username", ""),
                ("email", "other@example.com"),
                ("password", PASSWORD),
                ("password_confirmation", PASSWORD),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains("ユーザー登録に失敗しました"));
    assert!(body.contains("kazuko"));
}

#[tokio::test]
async fn test_password_length_boundaries() {
    let (state, app) = spawn_app().await;

    let cases = [
        (7, StatusCode::UNPROCESSABLE_ENTITY, Some("パスワードは8文字以上で入力してください")),
        (8, StatusCode::SEE_OTHER, None),
        (29, StatusCode::SEE_OTHER, None),
        (30, StatusCode::UNPROCESSABLE_ENTITY, Some("パスワードは29文字以内で入力してください")),
    ];

    for (len, expected, message) in cases {
        let mut client = Client::new(&app);
        let password = "a".repeat(len);
        let email = format!("len{len}@example.com");
        let response = client
            .post(
                "/users",
                &[
                    ("username", "taro"),
                    ("email", &email),
                    ("password", &password),
                    ("password_confirmation", &password),
                ],
            )
            .await;
        assert_eq!(response.status(), expected, "password of {len} characters");

        if let Some(message) = message {
            assert!(body_text(response).await.contains(message));
        }
    }

    assert_eq!(user_count(&state).await, 2);
}

#[tokio::test]
async fn test_password_confirmation_must_match() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);

    let response = client
        .post(
            "/users",
            &[
                ("username", "taro"),
                ("email", "taro@example.com"),
                ("password", "password123"),
                ("password_confirmation", "password124"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body_text(response)
            .await
            .contains("パスワード確認とパスワードの入力が一致しません")
    );
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let (state, app) = spawn_app().await;

    let mut first = Client::new(&app);
    assert_eq!(
        first.sign_up("taro", "taro@example.com").await.status(),
        StatusCode::SEE_OTHER
    );

    let mut second = Client::new(&app);
    let response = second.sign_up("jiro", "TARO@example.com").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body_text(response)
            .await
            .contains("メールアドレスはすでに存在します")
    );
    assert_eq!(user_count(&state).await, 1);
}

#[tokio::test]
async fn test_edit_requires_login() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);

    let response = client.get("/users/edit").await;
    assert_eq!(location(&response), "/login");

    let body = client.follow(response).await;
    assert!(body.contains("ログインしてください"));
}

#[tokio::test]
async fn test_login_and_logout() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);
    client.sign_up("taro", "taro@example.com").await;

    let response = client.post("/logout?_method=DELETE", &[]).await;
    assert_eq!(location(&response), "/");
    assert!(client.follow(response).await.contains("ログアウトしました"));

    let response = client.get("/account_books").await;
    assert_eq!(location(&response), "/login");

    let response = client.log_in("taro@example.com", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("ログインに失敗しました"));

    let response = client.log_in("Taro@Example.com", PASSWORD).await;
    assert_eq!(location(&response), "/account_books");
    assert!(client.follow(response).await.contains("ログインしました"));
}

#[tokio::test]
async fn test_partial_user_update_keeps_password() {
    let (state, app) = spawn_app().await;
    let mut client = Client::new(&app);
    client.sign_up("taro", "taro@example.com").await;

    let response = client
        .post(
            "/users?_method=PATCH",
            &[
                ("username", "taro2"),
                ("password", ""),
                ("password_confirmation", ""),
            ],
        )
        .await;
    assert_eq!(location(&response), "/account_books");
    assert!(client.follow(response).await.contains("ユーザー情報を更新しました"));

    let user = state
        .store()
        .get_user_by_email("taro@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.username, "taro2");

    let mut other = Client::new(&app);
    let response = other.log_in("taro@example.com", PASSWORD).await;
    assert_eq!(location(&response), "/account_books");
}

#[tokio::test]
async fn test_user_update_rejects_taken_email() {
    let (state, app) = spawn_app().await;

    let mut hanako = Client::new(&app);
    hanako.sign_up("hanako", "hanako@example.com").await;

    let mut taro = Client::new(&app);
    taro.sign_up("taro", "taro@example.com").await;

    let response = taro
        .post("/users?_method=PATCH", &[("email", "hanako@example.com")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains("ユーザー情報更新に失敗しました"));
    assert!(body.contains("メールアドレスはすでに存在します"));

    let stored = state
        .store()
        .get_user_by_email("taro@example.com")
        .await
        .unwrap()
        .expect("taro keeps the old email");
    assert_eq!(stored.username, "taro");
    let owner = state
        .store()
        .get_user_by_email("hanako@example.com")
        .await
        .unwrap()
        .expect("hanako still owns the email");
    assert_eq!(owner.username, "hanako");
    assert_ne!(owner.id, stored.id);
}

#[tokio::test]
async fn test_blank_user_update_lists_errors_without_password() {
    let (state, app) = spawn_app().await;
    let mut client = Client::new(&app);
    client.sign_up("taro", "taro@example.com").await;

    let response = client
        .post(
            "/users?_method=PATCH",
            &[
                ("username", ""),
                ("email", ""),
                ("password", ""),
                ("password_confirmation", ""),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains("ユーザー情報更新に失敗しました"));
    assert!(body.contains("ユーザー名を入力してください"));
    assert!(body.contains("ユーザー名は1文字以上で入力してください"));
    assert!(body.contains("メールアドレスを入力してください"));
    assert!(!body.contains("パスワードは8文字以上で入力してください"));
    assert!(!body.contains("パスワード確認を入力してください"));

    let stored = state
        .store()
        .get_user_by_email("taro@example.com")
        .await
        .unwrap()
        .expect("user is unchanged");
    assert_eq!(stored.username, "taro");
}

#[tokio::test]
async fn test_destroying_account_logs_out() {
    let (state, app) = spawn_app().await;
    let mut client = Client::new(&app);
    client.sign_up("taro", "taro@example.com").await;
    client.create_book("3月").await;

    let response = client.post("/users?_method=DELETE", &[]).await;
    assert_eq!(location(&response), "/");
    assert!(client.follow(response).await.contains("退会しました"));
    assert_eq!(user_count(&state).await, 0);

    let response = client.get("/account_books").await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_user_profile_lifecycle() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);
    client.sign_up("taro", "taro@example.com").await;

    let response = client.get("/user_profiles/edit").await;
    assert_eq!(location(&response), "/user_profiles/new");

    let response = client
        .post("/user_profiles", &[("nickname", ""), ("bio", "")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("ニックネームを入力してください"));

    let response = client
        .post("/user_profiles", &[("nickname", "たろう"), ("bio", "自炊派")])
        .await;
    assert_eq!(location(&response), "/account_books");
    assert!(client.follow(response).await.contains("プロフィールを登録しました"));

    let response = client
        .post("/user_profiles", &[("nickname", "じろう"), ("bio", "")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client.get("/user_profiles/edit").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("たろう"));

    let response = client
        .post(
            "/user_profiles?_method=PATCH",
            &[("nickname", "タロウ"), ("bio", "")],
        )
        .await;
    assert!(client.follow(response).await.contains("プロフィールを更新しました"));

    let response = client.post("/user_profiles?_method=DELETE", &[]).await;
    assert!(client.follow(response).await.contains("プロフィールを削除しました"));
}

#[tokio::test]
async fn test_account_book_crud_and_ownership() {
    let (_, app) = spawn_app().await;

    let mut owner = Client::new(&app);
    owner.sign_up("taro", "taro@example.com").await;

    let response = owner
        .post("/account_books", &[("title", ""), ("description", "")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("タイトルを入力してください"));

    let path = owner.create_book("3月の家計簿").await;
    let body = owner.get(&path).await;
    assert_eq!(body.status(), StatusCode::OK);
    let body = body_text(body).await;
    assert!(body.contains("家計簿を作成しました"));
    assert!(body.contains("3月の家計簿"));

    let mut stranger = Client::new(&app);
    stranger.sign_up("jiro", "jiro@example.com").await;

    let response = stranger.get(&path).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = stranger.get(&format!("{path}/edit")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("ページが見つかりません"));

    let response = stranger
        .post(&format!("{path}?_method=DELETE"), &[])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = owner
        .post(
            &format!("{path}?_method=PATCH"),
            &[("title", "4月の家計簿"), ("description", "新生活")],
        )
        .await;
    assert_eq!(location(&response), path);
    let body = owner.follow(response).await;
    assert!(body.contains("4月の家計簿"));
    assert!(body.contains("新生活"));

    let response = owner.post(&format!("{path}?_method=DELETE"), &[]).await;
    assert_eq!(location(&response), "/account_books");
    assert!(owner.follow(response).await.contains("家計簿を削除しました"));

    let response = owner.get(&path).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expense_items_and_total() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);
    client.sign_up("taro", "taro@example.com").await;
    let path = client.create_book("3月").await;
    let items_path = format!("{path}/expense_items");

    let response = client
        .post(
            &items_path,
            &[
                ("amount", "0"),
                ("category", "食費"),
                ("memo", ""),
                ("spent_on", "2025-03-01"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("支出の登録に失敗しました"));
    assert!(body.contains("金額は0より大きい値にしてください"));

    let response = client
        .post(
            &items_path,
            &[
                ("amount", "1000000000001"),
                ("category", "食費"),
                ("memo", ""),
                ("spent_on", "2025-03-01"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("金額は1000000000000以下の値にしてください"));

    for (amount, category) in [("980", "食費"), ("300", "日用品")] {
        let response = client
            .post(
                &items_path,
                &[
                    ("amount", amount),
                    ("category", category),
                    ("memo", ""),
                    ("spent_on", "2025-03-02"),
                ],
            )
            .await;
        assert_eq!(location(&response), path);
    }

    let body = body_text(client.get(&path).await).await;
    assert!(body.contains("¥1,280"));
    assert!(body.contains("日用品"));

    let mut stranger = Client::new(&app);
    stranger.sign_up("jiro", "jiro@example.com").await;
    let response = stranger
        .post(
            &items_path,
            &[
                ("amount", "100"),
                ("category", "食費"),
                ("memo", ""),
                ("spent_on", "2025-03-02"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_is_unique_per_user_and_book() {
    let (state, app) = spawn_app().await;

    let mut owner = Client::new(&app);
    owner.sign_up("taro", "taro@example.com").await;
    let path = owner.create_book("3月").await;
    let id = book_id(&path).to_string();

    let mut fan = Client::new(&app);
    fan.sign_up("hanako", "hanako@example.com").await;

    let response = fan.post("/likes", &[("account_book_id", &id)]).await;
    assert_eq!(location(&response), path);
    let body = fan.follow(response).await;
    assert!(body.contains("いいねしました"));
    assert!(body.contains(r#"<span class="likes">1</span>"#));

    let response = fan.post("/likes", &[("account_book_id", &id)]).await;
    let body = fan.follow(response).await;
    assert!(body.contains("すでにいいねしています"));
    assert!(body.contains(r#"<span class="likes">1</span>"#));

    let fan_id = user_id(&state, "hanako@example.com").await;
    let like = state
        .store()
        .find_like(fan_id, AccountBookId::new(id.parse().unwrap()))
        .await
        .unwrap()
        .expect("like exists");

    let body = body_text(fan.get(&path).await).await;
    assert!(body.contains(&format!("/likes/{}", like.id)));
    let body = body_text(owner.get(&path).await).await;
    assert!(body.contains(r#"action="/likes""#));
    assert!(!body.contains(&format!("/likes/{}", like.id)));

    let response = owner
        .post(&format!("/likes/{}?_method=DELETE", like.id), &[])
        .await;
    assert!(owner.follow(response).await.contains("いいねが見つかりません"));

    let response = fan
        .post(&format!("/likes/{}?_method=DELETE", like.id), &[])
        .await;
    assert_eq!(location(&response), path);
    let body = fan.follow(response).await;
    assert!(body.contains("いいねを取り消しました"));
    assert!(body.contains(r#"<span class="likes">0</span>"#));
}

#[tokio::test]
async fn test_like_redirects_back_to_referer() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);
    client.sign_up("taro", "taro@example.com").await;
    let path = client.create_book("3月").await;

    let request = Request::builder()
        .method("POST")
        .uri("/likes")
        .header(header::COOKIE, client.cookie.clone().unwrap())
        .header(header::REFERER, "http://localhost:3000/account_books")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("account_book_id={}", book_id(&path))))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(location(&response), "/account_books");
}

#[tokio::test]
async fn test_liking_missing_book() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);
    client.sign_up("taro", "taro@example.com").await;

    let response = client.post("/likes", &[("account_book_id", "9999")]).await;
    assert_eq!(location(&response), "/account_books");
}

#[tokio::test]
async fn test_dashboard_is_private() {
    let (state, app) = spawn_app().await;

    let mut taro = Client::new(&app);
    taro.sign_up("taro", "taro@example.com").await;
    let path = taro.create_book("3月").await;
    taro.post(
        &format!("{path}/expense_items"),
        &[
            ("amount", "1500"),
            ("category", "食費"),
            ("memo", "外食"),
            ("spent_on", "2025-03-03"),
        ],
    )
    .await;

    let mut hanako = Client::new(&app);
    hanako.sign_up("hanako", "hanako@example.com").await;
    hanako
        .post("/likes", &[("account_book_id", book_id(&path))])
        .await;

    let taro_id = user_id(&state, "taro@example.com").await;
    let response = taro.get(&format!("/dashboards/{taro_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"<dd class="book-count">1</dd>"#));
    assert!(body.contains(r#"<dd class="likes-received">1</dd>"#));
    assert!(body.contains("¥1,500"));
    assert!(body.contains("食費"));

    let response = hanako.get(&format!("/dashboards/{taro_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oauth_sign_in_creates_and_reuses_user() {
    let (state, app) = spawn_app().await;

    for _ in 0..2 {
        let mut client = Client::new(&app);
        let response = client.get("/oauth/github").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let authorize = url::Url::parse(&location(&response)).unwrap();
        assert_eq!(authorize.host_str(), Some("github.example"));
        let csrf_state = authorize
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .expect("state parameter");

        let response = client
            .get(&format!("/oauth/callback?code=ok&state={csrf_state}"))
            .await;
        assert_eq!(location(&response), "/account_books");
        assert!(
            client
                .follow(response)
                .await
                .contains("外部アカウントでログインしました")
        );
    }

    assert_eq!(user_count(&state).await, 1);
    let user = state
        .store()
        .get_user_by_email("octocat@example.com")
        .await
        .unwrap()
        .expect("oauth user");
    assert_eq!(user.username, "octocat");
}

#[tokio::test]
async fn test_oauth_does_not_take_over_account_with_same_email() {
    let (state, app) = spawn_app().await;

    let mut owner = Client::new(&app);
    owner.sign_up("owner", "octocat@example.com").await;
    let owner_id = user_id(&state, "octocat@example.com").await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let mut client = Client::new(&app);
        let response = client.get("/oauth/github").await;
        let authorize = url::Url::parse(&location(&response)).unwrap();
        let csrf_state = authorize
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .expect("state parameter");

        let response = client
            .get(&format!("/oauth/callback?code=ok&state={csrf_state}"))
            .await;
        assert_eq!(location(&response), "/account_books");

        let edit = body_text(client.get("/users/edit").await).await;
        assert!(edit.contains("4242@github.oauth.invalid"));
        assert!(!edit.contains("octocat@example.com"));

        ids.push(user_id(&state, "4242@github.oauth.invalid").await);
    }

    assert_eq!(ids[0], ids[1]);
    assert_ne!(ids[0], owner_id);
    assert_eq!(user_count(&state).await, 2);

    let stored = state
        .store()
        .get_user_by_email("octocat@example.com")
        .await
        .unwrap()
        .expect("owner keeps the account");
    assert_eq!(stored.id, owner_id);
    assert_eq!(stored.username, "owner");

    let response = Client::new(&app)
        .log_in("octocat@example.com", PASSWORD)
        .await;
    assert_eq!(location(&response), "/account_books");
}

#[tokio::test]
async fn test_oauth_rejects_state_mismatch_and_bad_code() {
    let (state, app) = spawn_app().await;
    let mut client = Client::new(&app);

    client.get("/oauth/github").await;
    let response = client
        .get("/oauth/callback?code=ok&state=forged")
        .await;
    assert_eq!(location(&response), "/login");
    assert!(
        client
            .follow(response)
            .await
            .contains("外部アカウントでのログインに失敗しました")
    );

    let response = client.get("/oauth/github").await;
    let csrf_state = url::Url::parse(&location(&response))
        .unwrap()
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .unwrap();
    let response = client
        .get(&format!("/oauth/callback?code=rejected&state={csrf_state}"))
        .await;
    assert_eq!(location(&response), "/login");
    assert_eq!(user_count(&state).await, 0);

    let response = client.get("/oauth/unknown").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_renders_error_page() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);

    let response = client.get("/no/such/page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("ページが見つかりません"));
}

#[tokio::test]
async fn test_assets_and_metrics() {
    let (_, app) = spawn_app().await;
    let mut client = Client::new(&app);

    let response = client.get("/assets/app.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/css")
    );

    let response = client.get("/metrics").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
