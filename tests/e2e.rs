use tokio::net::TcpListener;
use tokio::sync::oneshot;

use tripcheck_client::{
    tree, ChecklistDetails, ChecklistStore, ClientError, HttpBackend, Reconciled,
};
use tripcheck_server::{serve, AppState, DbState};

const OWNER: u32 = 1;
const FRIEND: u32 = 2;

async fn start_server() -> (String, oneshot::Sender<()>) {
    let db = DbState::open_in_memory().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(serve(listener, AppState::new(db), async {
        let _ = rx.await;
    }));
    (format!("http://{}", addr), tx)
}

#[tokio::test]
async fn test_optimistic_edits_match_server() {
    let (base, _shutdown) = start_server().await;
    let owner = HttpBackend::new(&base, OWNER);
    let checklist = owner
        .create_checklist(&ChecklistDetails::titled("Iceland"))
        .await
        .unwrap();

    let store = ChecklistStore::load(owner, checklist.id).await.unwrap();
    let roots = store.snapshot();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name, "Suitcase");
    let suitcase = roots[0].key;

    let (_, pending) = store.insert_child(suitcase, "Rain jacket").unwrap();
    let jacket = pending.await.unwrap();
    let (_, pending) = store.insert_after(jacket, "Gloves").unwrap();
    let gloves = pending.await.unwrap();
    let (_, pending) = store.insert_child(suitcase, "Thermos").unwrap();
    let thermos = pending.await.unwrap();

    let names: Vec<String> = store.snapshot()[0]
        .children
        .iter()
        .map(|n| n.name.clone())
        .collect();
    assert_eq!(names, vec!["Thermos", "Rain jacket", "Gloves"]);

    assert_eq!(store.toggle(gloves).unwrap().await, Ok(true));
    store.rename(thermos, "Flask").unwrap().await.unwrap();
    assert_eq!(store.refresh().await, Ok(Reconciled::Unchanged));

    assert_eq!(store.delete(jacket).unwrap().await, Ok(1));
    assert_eq!(store.refresh().await, Ok(Reconciled::Unchanged));
    assert_eq!(tree::count(&store.snapshot()), 3);
    assert!(store.get(gloves).unwrap().is_checked);
    assert_eq!(store.get(thermos).unwrap().name, "Flask");
}

#[tokio::test]
async fn test_concurrent_edit_detected_on_refresh() {
    let (base, _shutdown) = start_server().await;
    let owner = HttpBackend::new(&base, OWNER);
    let checklist = owner
        .create_checklist(&ChecklistDetails::titled("Peru"))
        .await
        .unwrap();
    owner.share_checklist(checklist.id, FRIEND).await.unwrap();

    let mine = ChecklistStore::load(owner, checklist.id).await.unwrap();
    let theirs = ChecklistStore::load(HttpBackend::new(&base, FRIEND), checklist.id)
        .await
        .unwrap();

    let suitcase = mine.snapshot()[0].key;
    theirs.rename(suitcase, "Backpack").unwrap().await.unwrap();

    assert_eq!(mine.get(suitcase).unwrap().name, "Suitcase");
    assert_eq!(mine.refresh().await, Ok(Reconciled::Diverged));
    assert_eq!(mine.get(suitcase).unwrap().name, "Backpack");
}

#[tokio::test]
async fn test_server_rejection_is_flagged() {
    let (base, _shutdown) = start_server().await;
    let owner = HttpBackend::new(&base, OWNER);
    let checklist = owner
        .create_checklist(&ChecklistDetails::titled("Chile"))
        .await
        .unwrap();
    let store = ChecklistStore::load(owner, checklist.id).await.unwrap();
    let suitcase = store.snapshot()[0].key;

    // Someone else deletes the checklist behind our back
    store.backend().delete_checklist(checklist.id).await.unwrap();

    let result = store.rename(suitcase, "Duffel").unwrap().await;
    assert!(matches!(result, Err(ClientError::Api { status: 404, .. })));
    assert_eq!(store.get(suitcase).unwrap().name, "Duffel");
    assert_eq!(store.failures().len(), 1);
}

#[tokio::test]
async fn test_stranger_cannot_load() {
    let (base, _shutdown) = start_server().await;
    let owner = HttpBackend::new(&base, OWNER);
    let checklist = owner
        .create_checklist(&ChecklistDetails::titled("Nepal"))
        .await
        .unwrap();

    let result = ChecklistStore::load(HttpBackend::new(&base, 99), checklist.id).await;
    assert!(matches!(result, Err(ClientError::Api { status: 404, .. })));

    let (status, message) = match HttpBackend::new(&base, 99).get_checklist(checklist.id).await {
        Err(ClientError::Api { status, message }) => (status, message),
        other => panic!("expected an API error, got {:?}", other),
    };
    assert_eq!(status, 404);
    assert!(message.contains(&checklist.id.to_string()));
}
