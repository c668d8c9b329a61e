use ladle_client::{
    ApiError, DeleteOutcome, FavoriteToggle, LadleClient, MemoryTokenStore, Method, MockTransport,
    RecipeFilter, RequestBody, Session, StoredSession,
};
use ladle_core::{CreateRecipeRequest, Role, User};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

const BASE: &str = "http://localhost:3000";

fn user(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Cook".to_string(),
        email: "cook@example.com".to_string(),
        role,
        bio: None,
        avatar: None,
        created_at: chrono::Utc::now(),
    }
}

fn user_json(user: &User) -> Value {
    serde_json::to_value(user).unwrap()
}

fn signed_in(mock: MockTransport, user: Option<User>) -> (LadleClient, Arc<MockTransport>) {
    let mock = Arc::new(mock);
    let session = Session::load(MemoryTokenStore::with_session(StoredSession {
        token: "tok".to_string(),
        user,
    }));
    let client = LadleClient::with_transport(mock.clone(), Arc::new(session), BASE);
    (client, mock)
}

fn anonymous(mock: MockTransport) -> (LadleClient, Arc<MockTransport>) {
    let mock = Arc::new(mock);
    let client = LadleClient::with_transport(mock.clone(), Arc::new(Session::in_memory()), BASE);
    (client, mock)
}

fn summary(title: &str, status: &str, is_deleted: bool) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "slug": title.to_lowercase().replace(' ', "-"),
        "title": title,
        "preparationTime": 10,
        "cookingTime": 20,
        "servings": 2,
        "difficulty": "easy",
        "status": status,
        "isDeleted": is_deleted,
        "author": { "id": Uuid::new_v4(), "name": "Cook" },
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

fn recipe(id: Uuid, title: &str) -> Value {
    json!({
        "id": id,
        "slug": "x",
        "title": title,
        "preparationTime": 10,
        "cookingTime": 20,
        "servings": 2,
        "difficulty": "easy",
        "status": "deleted",
        "isDeleted": true,
        "deletedAt": "2024-01-02T00:00:00Z",
        "author": { "id": Uuid::new_v4(), "name": "Cook" },
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-02T00:00:00Z"
    })
}

fn list(recipes: Vec<Value>) -> Value {
    let total = recipes.len();
    json!({
        "recipes": recipes,
        "pagination": { "total": total, "limit": 20, "offset": 0 }
    })
}

fn new_recipe(title: &str) -> CreateRecipeRequest {
    serde_json::from_value(json!({ "title": title })).unwrap()
}

#[tokio::test]
async fn test_delete_falls_back_to_soft_delete_on_500() {
    let id = Uuid::new_v4();
    let path = format!("/api/recipes/{}", id);
    let mock = MockTransport::new()
        .with_json(Method::Delete, &path, 500, json!({ "error": "boom" }))
        .with_json(Method::Put, &path, 200, recipe(id, "Soup"));
    let (client, mock) = signed_in(mock, None);

    let outcome = client.delete_recipe(id).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::SoftDeleted);

    let puts = mock.requests_to(Method::Put, &path);
    assert_eq!(puts.len(), 1);
    match &puts[0].body {
        RequestBody::Json(body) => {
            assert_eq!(body["isDeleted"], json!(true));
            assert_eq!(body["status"], json!("deleted"));
            assert!(body["deletedAt"].is_string());
        }
        other => panic!("unexpected body {:?}", other),
    }
}

#[tokio::test]
async fn test_soft_deleted_recipe_disappears_from_active_listing() {
    let id = Uuid::new_v4();
    let path = format!("/api/recipes/{}", id);

    let mut soup = summary("Soup", "deleted", true);
    soup["id"] = json!(id);
    soup["deletedAt"] = json!("2024-01-02T00:00:00Z");

    let mock = MockTransport::new()
        .with_json(Method::Delete, &path, 500, json!({ "error": "boom" }))
        .with_json(Method::Put, &path, 200, recipe(id, "Soup"))
        .with_json(
            Method::Get,
            "/api/recipes",
            200,
            list(vec![soup, summary("Salad", "published", false)]),
        );
    let (client, mock) = signed_in(mock, None);

    assert_eq!(client.delete_recipe(id).await.unwrap(), DeleteOutcome::SoftDeleted);
    assert_eq!(mock.requests_to(Method::Put, &path).len(), 1);

    // The server still lists the marked row
    let raw = client.list_recipes(&RecipeFilter::new()).await.unwrap();
    let marked = raw.recipes.iter().find(|r| r.id == id).unwrap();
    assert!(marked.is_deleted);

    let active = client.active_recipes(&RecipeFilter::new()).await.unwrap();
    assert!(active.iter().all(|r| r.id != id));
    let titles: Vec<&str> = active.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Salad"]);
}

#[tokio::test]
async fn test_delete_other_failures_do_not_soft_delete() {
    let id = Uuid::new_v4();
    let path = format!("/api/recipes/{}", id);
    for status in [403, 404, 502] {
        let mock = MockTransport::new().with_status(Method::Delete, &path, status);
        let (client, mock) = signed_in(mock, None);

        let err = client.delete_recipe(id).await.unwrap_err();
        assert_eq!(err.status(), Some(status));
        assert!(mock.requests_to(Method::Put, &path).is_empty());
    }
}

#[tokio::test]
async fn test_successful_delete_is_hard() {
    let id = Uuid::new_v4();
    let path = format!("/api/recipes/{}", id);
    let mock = MockTransport::new().with_status(Method::Delete, &path, 204);
    let (client, _) = signed_in(mock, None);

    assert_eq!(client.delete_recipe(id).await.unwrap(), DeleteOutcome::Deleted);
}

#[tokio::test]
async fn test_active_recipes_drop_soft_deleted_entries() {
    let mock = MockTransport::new().with_json(
        Method::Get,
        "/api/recipes",
        200,
        list(vec![
            summary("Pancakes", "published", false),
            summary("Old Soup", "deleted", false),
            summary("Gone Stew", "published", true),
        ]),
    );
    let (client, _) = anonymous(mock);

    let recipes = client.active_recipes(&RecipeFilter::new()).await.unwrap();
    let titles: Vec<&str> = recipes.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Pancakes"]);
}

#[tokio::test]
async fn test_duplicate_title_blocks_create() {
    let mock = MockTransport::new().with_json(
        Method::Get,
        "/api/recipes",
        200,
        list(vec![summary("Banana Bread", "published", false)]),
    );
    let (client, mock) = signed_in(mock, None);

    let err = client
        .create_recipe_checked(&new_recipe("  banana bread "))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::DuplicateTitle("Banana Bread".to_string()));
    assert!(mock.requests_to(Method::Post, "/api/recipes").is_empty());

    let lookups = mock.requests_to(Method::Get, "/api/recipes");
    assert_eq!(lookups.len(), 1);
    assert!(lookups[0].path.contains("title=banana+bread"));
}

#[tokio::test]
async fn test_soft_deleted_title_can_be_reused() {
    let id = Uuid::new_v4();
    let mock = MockTransport::new()
        .with_json(
            Method::Get,
            "/api/recipes",
            200,
            list(vec![summary("Banana Bread", "deleted", true)]),
        )
        .with_json(Method::Post, "/api/recipes", 201, recipe(id, "Banana Bread"));
    let (client, mock) = signed_in(mock, None);

    let created = client
        .create_recipe_checked(&new_recipe("Banana Bread"))
        .await
        .unwrap();
    assert_eq!(created.id, id);
    assert_eq!(mock.requests_to(Method::Post, "/api/recipes").len(), 1);
}

#[tokio::test]
async fn test_blank_title_rejected_locally() {
    let (client, mock) = signed_in(MockTransport::new(), None);

    let err = client.create_recipe_checked(&new_recipe("   ")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_401_evicts_session_everywhere() {
    let recipe_id = Uuid::new_v4();
    let endpoints = [
        (Method::Get, "/api/auth/me".to_string()),
        (Method::Get, "/api/favorites".to_string()),
        (Method::Get, format!("/api/favorites/check/{}", recipe_id)),
        (Method::Get, "/api/admin/stats".to_string()),
    ];

    for (method, path) in endpoints {
        let mock = MockTransport::new().with_json(
            method,
            &path,
            401,
            json!({ "error": "Invalid or expired token" }),
        );
        let (client, _) = signed_in(mock, Some(user(Role::User)));

        let err = match path.as_str() {
            "/api/auth/me" => client.me().await.unwrap_err(),
            "/api/favorites" => client.list_favorites().await.unwrap_err(),
            "/api/admin/stats" => client.admin_stats().await.unwrap_err(),
            _ => client.is_favorite(recipe_id).await.unwrap_err(),
        };

        assert!(matches!(err, ApiError::Unauthorized(_)), "{}", path);
        assert_eq!(err.redirect(), Some("/login"));
        assert!(!client.session().is_authenticated(), "{}", path);
        assert!(client.session().user().is_none());
    }
}

#[tokio::test]
async fn test_403_keeps_session() {
    let mock = MockTransport::new().with_json(
        Method::Get,
        "/api/admin/stats",
        403,
        json!({ "error": "Admin access required" }),
    );
    let (client, _) = signed_in(mock, Some(user(Role::User)));

    let err = client.admin_stats().await.unwrap_err();
    assert_eq!(err, ApiError::Forbidden("Admin access required".to_string()));
    assert_eq!(err.redirect(), None);
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_protected_call_without_token_is_not_sent() {
    let (client, mock) = anonymous(MockTransport::new());

    let err = client.list_favorites().await.unwrap_err();
    assert_eq!(err, ApiError::NotLoggedIn);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_login_redirects_by_role() {
    for (role, landing) in [(Role::Admin, "/admin/dashboard"), (Role::User, "/dashboard")] {
        let account = user(role);
        let mock = MockTransport::new().with_json(
            Method::Post,
            "/api/auth/login",
            200,
            json!({ "token": "fresh", "user": user_json(&account) }),
        );
        let (client, mock) = anonymous(mock);

        let outcome = client.login("cook@example.com", "secret1").await.unwrap();
        assert_eq!(outcome.redirect, landing);
        assert_eq!(outcome.user, account);
        assert_eq!(client.session().token().as_deref(), Some("fresh"));
        assert_eq!(client.session().role(), Some(role));

        let sent = mock.requests_to(Method::Post, "/api/auth/login");
        assert_eq!(sent[0].token, None);
    }
}

#[tokio::test]
async fn test_bad_login_leaves_session_empty() {
    let mock = MockTransport::new().with_json(
        Method::Post,
        "/api/auth/login",
        401,
        json!({ "error": "Invalid credentials" }),
    );
    let (client, _) = anonymous(mock);

    let err = client.login("cook@example.com", "nope").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized("Invalid credentials".to_string()));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_even_when_offline() {
    let mock = MockTransport::new().with_network_error(Method::Post, "/api/auth/logout", "refused");
    let (client, _) = signed_in(mock, Some(user(Role::User)));

    assert!(client.logout().await.is_err());
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_favorite_toggle_commits() {
    let recipe_id = Uuid::new_v4();
    let path = format!("/api/favorites/{}", recipe_id);
    let mock = MockTransport::new().with_json(Method::Post, &path, 200, json!({ "isFavorite": true }));
    let (client, _) = signed_in(mock, None);

    let mut state = FavoriteToggle::Committed(false);
    assert!(client.toggle_favorite(recipe_id, &mut state).await.unwrap());
    assert_eq!(state, FavoriteToggle::Committed(true));
}

#[tokio::test]
async fn test_favorite_toggle_rolls_back_on_failure() {
    let recipe_id = Uuid::new_v4();
    let path = format!("/api/favorites/{}", recipe_id);
    let mock = MockTransport::new().with_json(Method::Delete, &path, 500, json!({ "error": "db down" }));
    let (client, _) = signed_in(mock, None);

    let mut state = FavoriteToggle::Committed(true);
    assert!(client.toggle_favorite(recipe_id, &mut state).await.is_err());
    assert_eq!(state, FavoriteToggle::Failed { current: true });
    assert!(state.is_favorite());
}

#[tokio::test]
async fn test_admin_cannot_modify_own_account() {
    let admin = user(Role::Admin);
    let (client, mock) = signed_in(MockTransport::new(), Some(admin.clone()));

    let err = client.update_user_role(admin.id, Role::User).await.unwrap_err();
    assert!(matches!(err, ApiError::SelfModification(_)));
    let err = client.delete_user(admin.id).await.unwrap_err();
    assert!(matches!(err, ApiError::SelfModification(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_admin_modifies_other_account() {
    let admin = user(Role::Admin);
    let other = user(Role::User);
    let path = format!("/api/admin/users/{}", other.id);
    let mut promoted = other.clone();
    promoted.role = Role::Admin;
    let mock = MockTransport::new().with_json(Method::Put, &path, 200, user_json(&promoted));
    let (client, mock) = signed_in(mock, Some(admin));

    let updated = client.update_user_role(other.id, Role::Admin).await.unwrap();
    assert_eq!(updated.role, Role::Admin);
    match &mock.requests_to(Method::Put, &path)[0].body {
        RequestBody::Json(body) => assert_eq!(body, &json!({ "role": "admin" })),
        other => panic!("unexpected body {:?}", other),
    }
}

#[tokio::test]
async fn test_image_url_resolution() {
    let (client, _) = anonymous(MockTransport::new());

    assert_eq!(client.image_url(None), "/images/recipe-placeholder.svg");
    assert_eq!(client.image_url(Some("/uploads/abc")), "http://localhost:3000/uploads/abc");
    assert_eq!(
        client.image_url(Some("https://cdn.example.com/x.png")),
        "https://cdn.example.com/x.png"
    );
}
