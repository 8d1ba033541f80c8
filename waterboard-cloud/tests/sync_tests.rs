mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use support::harness;
use waterboard_cloud::{SaveOutcome, StatusLevel, SyncReport};
use waterboard_types::{record_millis, Dataset, RecordKey};
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn plant_key(location: &str) -> RecordKey {
    RecordKey::new(Dataset::Plant, "WESTERN", location)
}

fn plant_doc(location: &str, updated_at: &str) -> serde_json::Value {
    json!({
        "region": "WESTERN",
        "location": location,
        "treatmentType": "conventional",
        "photoUrls": [],
        "updatedAt": updated_at,
    })
}

async fn mount_online(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/commit"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_empty_collections(server: &MockServer, datasets: &[Dataset]) {
    for dataset in datasets {
        Mock::given(method("GET"))
            .and(path(format!(
                "/api/collections/{}/documents",
                dataset.collection()
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "documents": [] })))
            .mount(server)
            .await;
    }
}

// --- Push path ---

#[tokio::test]
async fn push_skips_everything_when_offline() {
    let server = MockServer::start().await;
    // No health mock: the probe answers 404 and reads as offline.
    let h = harness(&server.uri());
    h.local
        .put(&plant_key("Kalutara"), &plant_doc("Kalutara", "2024-01-01T00:00:00Z"));

    let report = h.coordinator.push_local_to_remote().await;
    assert_eq!(report, SyncReport::default());
}

#[tokio::test]
async fn push_writes_record_missing_from_remote() {
    let server = MockServer::start().await;
    mount_online(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/collections/plantSubmissions/documents/WESTERN__Kalutara"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/collections/plantSubmissions/documents/WESTERN__Kalutara"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let key = plant_key("Kalutara");
    h.local.put(&key, &plant_doc("Kalutara", "2024-01-01T00:00:00Z"));

    let report = h.coordinator.push_local_to_remote().await;
    assert_eq!(report.pushed, 1);
    assert_eq!(report.failed, 0);
    assert!(h.sink.has_level(StatusLevel::Success));

    // Local snapshot converged to the pushed state (fresh client stamp).
    let local = h.local.get(&key).unwrap();
    assert!(record_millis(&local) > record_millis(&plant_doc("Kalutara", "2024-01-01T00:00:00Z")));
}

#[tokio::test]
async fn second_push_of_unchanged_record_is_a_no_op() {
    let server = MockServer::start().await;
    mount_online(&server).await;
    let doc_path = "/api/collections/plantSubmissions/documents/WESTERN__Kalutara";

    // Remote starts empty; the one and only PUT is the first push.
    Mock::given(method("GET"))
        .and(path(doc_path))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(doc_path))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let key = plant_key("Kalutara");
    h.local.put(&key, &plant_doc("Kalutara", "2024-01-01T00:00:00Z"));

    let first = h.coordinator.push_local_to_remote().await;
    assert_eq!(first.pushed, 1);

    // The remote now holds exactly what the local cache converged to.
    let stored = h.local.get(&key).unwrap();
    Mock::given(method("GET"))
        .and(path(doc_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(&stored))
        .mount(&server)
        .await;

    let second = h.coordinator.push_local_to_remote().await;
    assert_eq!(second.pushed, 0);
    assert_eq!(second.skipped, 1);
}

#[tokio::test]
async fn push_never_clobbers_newer_remote() {
    let server = MockServer::start().await;
    mount_online(&server).await;
    let doc_path = "/api/collections/plantSubmissions/documents/WESTERN__Kalutara";
    Mock::given(method("GET"))
        .and(path(doc_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(plant_doc("Kalutara", "2024-06-01T00:00:00Z")),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(doc_path))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.local
        .put(&plant_key("Kalutara"), &plant_doc("Kalutara", "2024-01-01T00:00:00Z"));

    let report = h.coordinator.push_local_to_remote().await;
    assert_eq!(report.pushed, 0);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn push_isolates_per_record_failures() {
    let server = MockServer::start().await;
    mount_online(&server).await;

    for location in ["Alpha", "Gamma"] {
        Mock::given(method("GET"))
            .and(path(format!(
                "/api/collections/plantSubmissions/documents/WESTERN__{location}"
            )))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!(
                "/api/collections/plantSubmissions/documents/WESTERN__{location}"
            )))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }
    // The middle record's fetch blows up with a server error.
    Mock::given(method("GET"))
        .and(path("/api/collections/plantSubmissions/documents/WESTERN__Beta"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    for location in ["Alpha", "Beta", "Gamma"] {
        h.local.put(
            &plant_key(location),
            &plant_doc(location, "2024-01-01T00:00:00Z"),
        );
    }

    let report = h.coordinator.push_local_to_remote().await;
    assert_eq!(report.pushed, 2);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn push_uploads_pending_photos_and_strips_inline_copies() {
    let server = MockServer::start().await;
    mount_online(&server).await;
    let doc_path = "/api/collections/plantSubmissions/documents/WESTERN__Kalutara";

    Mock::given(method("GET"))
        .and(path(doc_path))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex("^/api/attachments/plant_photos/.*"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "url": "https://cdn.example/1.jpg" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    // The wire document carries the hosted URL and no inline photos.
    Mock::given(method("PUT"))
        .and(path(doc_path))
        .and(body_partial_json(json!({
            "photoUrls": ["https://cdn.example/1.jpg"],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let key = plant_key("Kalutara");
    let mut doc = plant_doc("Kalutara", "2024-01-01T00:00:00Z");
    doc["photosInline"] = json!([{
        "name": "intake.jpg",
        "mime": "image/jpeg",
        "size": 3,
        "dataUrl": "data:image/jpeg;base64,AAAA",
    }]);
    h.local.put(&key, &doc);

    let report = h.coordinator.push_local_to_remote().await;
    assert_eq!(report.pushed, 1);

    // All photos uploaded, so the local snapshot drops the inline copies.
    let local = h.local.get(&key).unwrap();
    assert!(local.get("photosInline").is_none());
}

#[tokio::test]
async fn failed_photo_upload_does_not_abort_the_record() {
    let server = MockServer::start().await;
    mount_online(&server).await;
    let doc_path = "/api/collections/plantSubmissions/documents/WESTERN__Kalutara";

    Mock::given(method("GET"))
        .and(path(doc_path))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex("^/api/attachments/.*"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(doc_path))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let key = plant_key("Kalutara");
    let mut doc = plant_doc("Kalutara", "2024-01-01T00:00:00Z");
    doc["photosInline"] = json!([{
        "name": "intake.jpg",
        "mime": "image/jpeg",
        "size": 3,
        "dataUrl": "data:image/jpeg;base64,AAAA",
    }]);
    h.local.put(&key, &doc);

    let report = h.coordinator.push_local_to_remote().await;
    assert_eq!(report.pushed, 1);

    // The inline copy stays in the local snapshot for a retry next sync.
    let local = h.local.get(&key).unwrap();
    assert!(local.get("photosInline").is_some());
}

// --- Pull path ---

#[tokio::test]
async fn pull_overwrites_local_unconditionally() {
    let server = MockServer::start().await;
    mount_online(&server).await;

    // Remote copy is OLDER than the local one; pull still wins.
    let remote_doc = plant_doc("Kalutara", "2023-01-01T00:00:00Z");
    Mock::given(method("GET"))
        .and(path("/api/collections/plantSubmissions/documents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "documents": [remote_doc] })),
        )
        .mount(&server)
        .await;
    mount_empty_collections(&server, &[Dataset::Scheme, Dataset::Labs]).await;

    let h = harness(&server.uri());
    let key = plant_key("Kalutara");
    h.local.put(&key, &plant_doc("Kalutara", "2024-06-01T00:00:00Z"));

    let report = h.coordinator.pull_remote_to_local().await;
    assert_eq!(report.pulled, 1);
    assert_eq!(h.local.get(&key).unwrap(), remote_doc);
}

#[tokio::test]
async fn pull_continues_past_a_failing_collection() {
    let server = MockServer::start().await;
    mount_online(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/collections/schemeExtended/documents"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/collections/plantSubmissions/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [plant_doc("Kalutara", "2024-01-01T00:00:00Z")]
        })))
        .mount(&server)
        .await;
    mount_empty_collections(&server, &[Dataset::Labs]).await;

    let h = harness(&server.uri());
    let report = h.coordinator.pull_remote_to_local().await;
    assert_eq!(report.pulled, 1);
    assert_eq!(report.failed, 1);
    assert!(h.local.get(&plant_key("Kalutara")).is_some());
}

#[tokio::test]
async fn pull_skips_documents_without_identity() {
    let server = MockServer::start().await;
    mount_online(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/collections/plantSubmissions/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{ "treatmentType": "conventional" }]
        })))
        .mount(&server)
        .await;
    mount_empty_collections(&server, &[Dataset::Scheme, Dataset::Labs]).await;

    let h = harness(&server.uri());
    let report = h.coordinator.pull_remote_to_local().await;
    assert_eq!(report.pulled, 0);
}

// --- Submit path ---

#[tokio::test]
async fn save_record_blocks_on_validation_failure() {
    let server = MockServer::start().await;
    let h = harness(&server.uri());

    let mut doc = plant_doc("Kalutara", "2024-01-01T00:00:00Z");
    doc["designedCapacity"] = json!(-5.0);

    let err = h
        .coordinator
        .save_record(Dataset::Plant, &doc)
        .await
        .unwrap_err();
    assert!(matches!(err, waterboard_cloud::CloudError::Validation(_)));
    assert!(h.sink.has_level(StatusLevel::Danger));
    // Blocked entirely: nothing was cached.
    assert!(h.local.get(&plant_key("Kalutara")).is_none());
}

#[tokio::test]
async fn save_record_degrades_to_local_when_offline() {
    let server = MockServer::start().await;
    // No health mock — offline.
    let h = harness(&server.uri());

    let outcome = h
        .coordinator
        .save_record(Dataset::Labs, &json!({
            "region": "CENTRAL",
            "location": "Kandy",
            "rawWater": "ok",
        }))
        .await
        .unwrap();
    assert_eq!(outcome, SaveOutcome::SavedLocally);
    assert!(h.sink.has_level(StatusLevel::Warning));

    let key = RecordKey::new(Dataset::Labs, "CENTRAL", "Kandy");
    let local = h.local.get(&key).unwrap();
    assert!(record_millis(&local) > 0, "local save is stamped");
}

#[tokio::test]
async fn save_record_syncs_when_online() {
    let server = MockServer::start().await;
    mount_online(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/collections/labsSubmissions/documents/CENTRAL__Kandy"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let outcome = h
        .coordinator
        .save_record(Dataset::Labs, &json!({
            "region": "CENTRAL",
            "location": "Kandy",
            "rawWater": "ok",
        }))
        .await
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Synced);
    assert!(h.sink.has_level(StatusLevel::Success));
}

#[tokio::test]
async fn save_record_degrades_when_remote_write_fails() {
    let server = MockServer::start().await;
    mount_online(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/collections/labsSubmissions/documents/CENTRAL__Kandy"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let outcome = h
        .coordinator
        .save_record(Dataset::Labs, &json!({
            "region": "CENTRAL",
            "location": "Kandy",
            "rawWater": "ok",
        }))
        .await
        .unwrap();
    assert_eq!(outcome, SaveOutcome::SavedLocally);

    // The record survived locally and will push later.
    let key = RecordKey::new(Dataset::Labs, "CENTRAL", "Kandy");
    assert!(h.local.get(&key).is_some());
}
