use std::fs;
use std::sync::Arc;

use riddle_hunt::api::{self, SaveMode, Status};
use riddle_hunt::content::defaults::default_success_messages;
use riddle_hunt::content::ContentStore;
use riddle_hunt::AnswerEngine;
use serde_json::{json, Value};
use tempfile::TempDir;

fn hunt(dir: &TempDir, payload: Value) -> AnswerEngine {
    let store = Arc::new(ContentStore::open(dir.path()));
    let response = api::save_content(&store, &payload, SaveMode::Unified);
    assert_eq!(response.status, Status::Ok, "{:?}", response.body);
    AnswerEngine::new(store)
}

fn two_riddle_payload() -> Value {
    json!({
        "riddles": [
            {"text": "Where the river meets the sea", "lat": 32.0, "lng": 34.0, "tolerance_m": 100},
            {"text": "The old lighthouse", "lat": 32.1, "lng": 34.1, "tolerance_m": 50}
        ],
        "landing": {"treasure_message": "Look under the third bench"}
    })
}

#[test]
fn exact_guess_advances_to_the_next_riddle() {
    let dir = TempDir::new().unwrap();
    let engine = hunt(&dir, two_riddle_payload());

    let response = api::check_answer(&engine, &json!({"riddle_id": 0, "lat": 32.0, "lng": 34.0}));
    let body = response.to_json();
    assert_eq!(body["correct"], json!(true));
    assert_eq!(body["finished"], json!(false));
    assert_eq!(body["next_riddle"]["id"], json!(1));
    assert_eq!(body["next_riddle"]["text"], json!("The old lighthouse"));
}

#[test]
fn distant_guess_reports_the_distance() {
    let dir = TempDir::new().unwrap();
    let engine = hunt(&dir, two_riddle_payload());

    let response = api::check_answer(&engine, &json!({"riddle_id": 0, "lat": 33.0, "lng": 34.0}));
    assert_eq!(response.status, Status::Ok);
    assert!(!response.body.correct);

    let distance: i64 = response
        .body
        .message
        .split_whitespace()
        .find_map(|word| word.parse().ok())
        .expect("message carries a distance");
    assert!(distance > 100);
    assert_eq!(distance, 111_194);
}

#[test]
fn solving_the_last_riddle_finds_the_treasure() {
    let dir = TempDir::new().unwrap();
    let engine = hunt(
        &dir,
        json!({
            "riddles": [{"text": "Only one", "lat": -33.8568, "lng": 151.2153}],
            "landing": {"treasure_message": "Behind the opera house"}
        }),
    );

    let response = api::check_answer(
        &engine,
        &json!({"riddle_id": 0, "lat": -33.8569, "lng": 151.2152}),
    );
    assert_eq!(
        response.to_json(),
        json!({
            "correct": true,
            "message": "Behind the opera house",
            "next_riddle": null,
            "finished": true
        })
    );
}

#[test]
fn out_of_range_ids_are_rejected_not_scored() {
    let dir = TempDir::new().unwrap();
    let engine = hunt(&dir, two_riddle_payload());

    for riddle_id in [-1, 2] {
        let response = api::check_answer(
            &engine,
            &json!({"riddle_id": riddle_id, "lat": 32.0, "lng": 34.0}),
        );
        assert_eq!(response.status.http_code(), 400);
        assert!(!response.body.correct);
    }
}

#[test]
fn invalid_save_leaves_the_document_on_disk_unchanged() {
    let dir = TempDir::new().unwrap();
    let engine = hunt(&dir, two_riddle_payload());
    let path = engine.store().content_path();
    let before = fs::read_to_string(&path).unwrap();

    let response = api::save_content(
        engine.store(),
        &json!({"riddles": [{"text": "x", "lat": "not-a-number", "lng": 34.0}]}),
        SaveMode::Unified,
    );
    assert_eq!(response.status, Status::ClientError);
    assert_eq!(response.to_json()["ok"], json!(false));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(engine.store().snapshot().riddles().len(), 2);
}

#[test]
fn empty_success_messages_come_back_as_defaults() {
    let dir = TempDir::new().unwrap();
    hunt(
        &dir,
        json!({"riddles": [], "landing": {"success_messages": []}}),
    );

    let reloaded = ContentStore::open(dir.path()).snapshot();
    assert_eq!(reloaded.landing().success_messages, default_success_messages());
}

#[test]
fn saved_ids_are_positions() {
    let dir = TempDir::new().unwrap();
    let engine = hunt(
        &dir,
        json!({"riddles": [
            {"id": 5, "text": "a", "lat": 1, "lng": 1},
            {"id": 5, "text": "b", "lat": 2, "lng": 2},
            {"text": "c", "lat": 3, "lng": 3}
        ]}),
    );

    let on_disk: Value =
        serde_json::from_str(&fs::read_to_string(engine.store().content_path()).unwrap()).unwrap();
    for (i, riddle) in on_disk["riddles"].as_array().unwrap().iter().enumerate() {
        assert_eq!(riddle["id"], json!(i));
    }
    assert!(on_disk["landing"].is_object());
}

#[test]
fn translation_without_a_key_echoes_the_input() {
    let gateway = riddle_hunt::TranslationGateway::disabled();
    let response = api::translate_texts(
        &gateway,
        &json!({"texts": ["שלום", "עולם"], "target": "en"}),
        500,
    );
    assert_eq!(
        response.to_json(),
        json!({"ok": true, "translations": ["שלום", "עולם"]})
    );
}
