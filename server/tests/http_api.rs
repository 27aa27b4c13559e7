use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use tripcheck_server::{serve, AppState, DbState, REQUEST_ID_HEADER, USER_HEADER};

const OWNER: u32 = 1;
const FRIEND: u32 = 2;
const STRANGER: u32 = 3;

struct TestServer {
    base: String,
    client: Client,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start() -> Self {
        let db = DbState::open_in_memory().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(serve(listener, AppState::new(db), async {
            let _ = rx.await;
        }));
        Self {
            base: format!("http://{}", addr),
            client: Client::new(),
            _shutdown: tx,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn send(&self, method: reqwest::Method, path: &str, user: u32, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = self
            .client
            .request(method, self.url(path))
            .header(USER_HEADER, user.to_string());
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.unwrap();
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn new_checklist(&self, title: &str) -> u32 {
        let (status, body) = self
            .send(reqwest::Method::POST, "/checklist/new", OWNER, Some(json!({ "title": title })))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["newChecklist"]["id"].as_u64().unwrap() as u32
    }

    async fn tree(&self, checklist_id: u32) -> Value {
        let (status, body) = self
            .send(reqwest::Method::GET, &format!("/checklist/{}/items", checklist_id), OWNER, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

#[tokio::test]
async fn test_health_and_request_id() {
    let server = TestServer::start().await;

    let response = server
        .client
        .get(server.url("/health"))
        .header(REQUEST_ID_HEADER, "trace-42")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-42");

    let response = server.client.get(server.url("/health")).send().await.unwrap();
    let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
    assert!(generated.starts_with("req-"));
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let server = TestServer::start().await;

    let response = server.client.get(server.url("/checklist")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = server
        .client
        .get(server.url("/checklist"))
        .header(USER_HEADER, "not-a-number")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains(USER_HEADER));
}

#[tokio::test]
async fn test_new_checklist_is_seeded() {
    let server = TestServer::start().await;
    let id = server.new_checklist("Lisbon").await;

    let tree = server.tree(id).await;
    let roots = tree.as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["name"], "Suitcase");
    assert_eq!(roots[0]["position"], 0);
    assert_eq!(roots[0]["isChecked"], false);
    assert_eq!(roots[0]["children"], json!([]));

    let (status, list) = server.send(reqwest::Method::GET, "/checklist", OWNER, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "Lisbon");
}

#[tokio::test]
async fn test_non_member_sees_not_found() {
    let server = TestServer::start().await;
    let id = server.new_checklist("Private").await;

    let (status, _) = server
        .send(reqwest::Method::GET, &format!("/checklist/{}/items", id), STRANGER, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .send(reqwest::Method::GET, "/checklist/999/items", OWNER, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_item_lifecycle() {
    let server = TestServer::start().await;
    let id = server.new_checklist("Alps").await;
    let suitcase = server.tree(id).await[0]["id"].as_u64().unwrap();

    let (status, created) = server
        .send(
            reqwest::Method::POST,
            &format!("/checklist/{}/items/new", id),
            OWNER,
            Some(json!({
                "name": "Socks",
                "checklistId": id,
                "parentItemId": suitcase,
                "position": 0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["message"], "Item added successfully");
    let socks = created["newItem"]["id"].as_u64().unwrap();
    assert_eq!(created["newItem"]["parentItemId"], suitcase);

    let path = format!("/checklist/{}/items/{}", id, socks);
    let (status, toggled) = server
        .send(reqwest::Method::PUT, &path, OWNER, Some(json!({ "type": "toggle" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["isChecked"], true);

    let (status, _) = server
        .send(
            reqwest::Method::PUT,
            &path,
            OWNER,
            Some(json!({ "type": "updateName", "newName": "Wool socks" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let tree = server.tree(id).await;
    let child = &tree[0]["children"][0];
    assert_eq!(child["name"], "Wool socks");
    assert_eq!(child["isChecked"], true);

    let (status, deleted) = server
        .send(reqwest::Method::DELETE, &format!("/checklist/{}/items/{}", id, suitcase), OWNER, None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(deleted["error"].is_string());

    let (status, deleted) = server.send(reqwest::Method::DELETE, &path, OWNER, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deleted"], 1);
    assert_eq!(server.tree(id).await[0]["children"], json!([]));
}

#[tokio::test]
async fn test_rejects_bad_item_bodies() {
    let server = TestServer::start().await;
    let id = server.new_checklist("Oslo").await;
    let other = server.new_checklist("Bergen").await;

    let (status, _) = server
        .send(
            reqwest::Method::POST,
            &format!("/checklist/{}/items/new", id),
            OWNER,
            Some(json!({ "name": "Map", "checklistId": other })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .send(
            reqwest::Method::POST,
            &format!("/checklist/{}/items/new", id),
            OWNER,
            Some(json!({ "name": "Map", "checklistId": id, "position": -3 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let suitcase = server.tree(id).await[0]["id"].as_u64().unwrap();
    let (status, _) = server
        .send(
            reqwest::Method::PUT,
            &format!("/checklist/{}/items/{}", id, suitcase),
            OWNER,
            Some(json!({ "type": "explode" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_move_between_groups() {
    let server = TestServer::start().await;
    let id = server.new_checklist("Rome").await;
    let suitcase = server.tree(id).await[0]["id"].as_u64().unwrap();

    let (_, created) = server
        .send(
            reqwest::Method::POST,
            &format!("/checklist/{}/items/new", id),
            OWNER,
            Some(json!({ "name": "Passport", "checklistId": id, "parentItemId": suitcase })),
        )
        .await;
    let passport = created["newItem"]["id"].as_u64().unwrap();

    let (status, moved) = server
        .send(
            reqwest::Method::PUT,
            &format!("/checklist/{}/items/{}/move", id, passport),
            OWNER,
            Some(json!({ "parentItemId": null, "position": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["parentItemId"], Value::Null);

    let tree = server.tree(id).await;
    let names: Vec<&str> = tree
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Passport", "Suitcase"]);

    let (status, _) = server
        .send(
            reqwest::Method::PUT,
            &format!("/checklist/{}/items/{}/move", id, suitcase),
            OWNER,
            Some(json!({ "parentItemId": suitcase, "position": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sharing_roles() {
    let server = TestServer::start().await;
    let id = server.new_checklist("Kyoto").await;
    let members = format!("/checklist/{}/members", id);

    let (status, _) = server
        .send(reqwest::Method::POST, &members, OWNER, Some(json!({ "userId": FRIEND })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .send(reqwest::Method::GET, &format!("/checklist/{}/items", id), FRIEND, None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, list) = server.send(reqwest::Method::GET, &members, FRIEND, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (status, _) = server
        .send(reqwest::Method::POST, &members, FRIEND, Some(json!({ "userId": STRANGER })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = server
        .send(reqwest::Method::DELETE, &format!("/checklist/{}", id), FRIEND, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = server
        .send(reqwest::Method::DELETE, &format!("/checklist/{}", id), OWNER, None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .send(reqwest::Method::GET, &format!("/checklist/{}", id), OWNER, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
