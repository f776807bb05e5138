//! Concurrent Call Isolation Tests
//!
//! Runs several call connections against one server at the same time and
//! verifies that sessions, audio buffers, and persisted turns never bleed
//! into each other.

mod mock_providers;

use std::collections::HashSet;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use mock_providers::{MockLLM, MockSTT, MockTTS, mock_app_state};
use s2s_gateway::{ServerConfig, routes, state::AppState};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper function to create a minimal test configuration
fn test_config(port: u16) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port,
        tls: None,
        hf_token: None,
        stt_model: None,
        stt_base_url: None,
        llm_model: None,
        llm_base_url: None,
        tts_language: None,
        tts_base_url: None,
        allow_private_urls: true,
        cors_allowed_origins: None,
        session_idle_timeout_secs: 300,
        max_audio_frame_bytes: 1024 * 1024,
    }
}

/// Find an available port for testing
fn find_available_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Start a server with the given state on the given port
async fn start_test_server(app_state: Arc<AppState>, port: u16) {
    let app = Router::new()
        .route(
            "/",
            axum::routing::get(s2s_gateway::handlers::api::health_check),
        )
        .merge(routes::api::create_api_router())
        .merge(routes::call::create_call_router())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .expect("Failed to bind test server");
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .expect("Test server exited");
    });

    // Give the server a moment to start accepting connections
    tokio::time::sleep(Duration::from_millis(100)).await;
}

fn text_message(text: &str) -> Message {
    Message::Text(text.to_string().into())
}

fn binary_message(data: Vec<u8>) -> Message {
    Message::Binary(data.into())
}

/// Read the next JSON event from the socket, skipping ping/pong frames
async fn next_json(ws: &mut WsStream) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(10), ws.next())
            .await
            .expect("Timed out waiting for a server event")
            .expect("Connection closed while waiting for an event")
            .expect("WebSocket read failed");
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Server sent invalid JSON");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Unexpected WebSocket frame: {other:?}"),
        }
    }
}

/// Connect to the call endpoint and consume the session_id greeting
async fn connect_call(port: u16) -> (WsStream, String) {
    let (mut ws, _) = connect_async(format!("ws://127.0.0.1:{port}/call"))
        .await
        .expect("Failed to connect to call endpoint");

    let hello = next_json(&mut ws).await;
    assert_eq!(hello["type"], "session_id");
    let session_id = hello["session_id"]
        .as_str()
        .expect("session_id missing")
        .to_string();

    (ws, session_id)
}

/// Fetch the turns of one call over the REST API
async fn fetch_turns(port: u16, session_id: &str) -> Vec<Value> {
    let url = format!("http://127.0.0.1:{port}/v1/calls/{session_id}/turns");
    let response = reqwest::get(&url).await.expect("Turns request failed");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json().await.expect("Turns response was not JSON")
}

/// Drive one turn to completion and return the observed final transcript
/// and reply text
async fn run_turn(ws: &mut WsStream, audio: Vec<u8>) -> (String, String) {
    ws.send(text_message(r#"{"type":"start"}"#)).await.unwrap();
    let trace = next_json(ws).await;
    assert_eq!(trace["type"], "trace_event");

    ws.send(binary_message(audio)).await.unwrap();
    ws.send(text_message(r#"{"type":"stop"}"#)).await.unwrap();

    let mut transcript = String::new();
    let mut reply = String::new();
    loop {
        let event = next_json(ws).await;
        match event["type"].as_str().unwrap() {
            "stt_final" => transcript = event["text"].as_str().unwrap().to_string(),
            "assistant_text" if event["is_final"] == true => {
                reply = event["full_text"].as_str().unwrap().to_string();
            }
            "tts_done" => break,
            "error" => panic!("Turn failed: {}", event["message"]),
            _ => {}
        }
    }
    (transcript, reply)
}

// =============================================================================
// Session Identity Tests
// =============================================================================

/// Every concurrent connection receives a distinct session identifier
#[tokio::test]
async fn test_concurrent_connections_get_unique_ids() {
    let port = find_available_port();
    let state = mock_app_state(
        test_config(port),
        Arc::new(MockSTT::fixed("hi", 0.9)),
        Arc::new(MockLLM::echo()),
        Arc::new(MockTTS::with_audio_len(64)),
    );
    start_test_server(state, port).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        handles.push(tokio::spawn(async move {
            let (ws, session_id) = connect_call(port).await;
            // Keep the socket open until the id is reported back
            (ws, session_id)
        }));
    }

    let mut sockets = Vec::new();
    let mut ids = HashSet::new();
    for handle in handles {
        let (ws, session_id) = handle.await.unwrap();
        sockets.push(ws);
        ids.insert(session_id);
    }
    assert_eq!(ids.len(), 8);
}

/// The registry mirrors the set of live connections
#[tokio::test]
async fn test_registry_tracks_live_connections() {
    let port = find_available_port();
    let state = mock_app_state(
        test_config(port),
        Arc::new(MockSTT::fixed("hi", 0.9)),
        Arc::new(MockLLM::echo()),
        Arc::new(MockTTS::with_audio_len(64)),
    );
    start_test_server(state.clone(), port).await;
    assert!(state.registry.is_empty());

    let mut sockets = Vec::new();
    for _ in 0..4 {
        sockets.push(connect_call(port).await);
    }
    assert_eq!(state.registry.len(), 4);

    drop(sockets);

    // Unregistration happens as each connection task winds down
    let drained = timeout(Duration::from_secs(5), async {
        while !state.registry.is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(drained.is_ok(), "Registry still held closed connections");
}

// =============================================================================
// Data Isolation Tests
// =============================================================================

/// Interleaved turns on two connections keep their transcripts, replies,
/// and persisted rows apart
#[tokio::test]
async fn test_interleaved_turns_stay_isolated() {
    let port = find_available_port();
    let stt = Arc::new(
        MockSTT::fixed("unmapped", 0.9)
            .with_mapping(vec![1, 1, 1], "hello from a", 0.9)
            .with_mapping(vec![2, 2, 2], "hello from b", 0.9),
    );
    let state = mock_app_state(
        test_config(port),
        stt,
        Arc::new(MockLLM::echo()),
        Arc::new(MockTTS::with_audio_len(64)),
    );
    start_test_server(state, port).await;

    let (mut ws_a, session_a) = connect_call(port).await;
    let (mut ws_b, session_b) = connect_call(port).await;
    assert_ne!(session_a, session_b);

    let (result_a, result_b) = tokio::join!(
        run_turn(&mut ws_a, vec![1, 1, 1]),
        run_turn(&mut ws_b, vec![2, 2, 2]),
    );

    assert_eq!(result_a.0, "hello from a");
    assert_eq!(result_a.1, "Echo: hello from a");
    assert_eq!(result_b.0, "hello from b");
    assert_eq!(result_b.1, "Echo: hello from b");

    // Each call persisted exactly its own turn
    let turns_a = fetch_turns(port, &session_a).await;
    assert_eq!(turns_a.len(), 1);
    assert_eq!(turns_a[0]["user_transcript_final"], "hello from a");
    assert_eq!(turns_a[0]["session_id"], session_a.as_str());

    let turns_b = fetch_turns(port, &session_b).await;
    assert_eq!(turns_b.len(), 1);
    assert_eq!(turns_b[0]["user_transcript_final"], "hello from b");
    assert_eq!(turns_b[0]["session_id"], session_b.as_str());
}

/// Audio frames appended on different connections never mix, even when
/// the appends interleave in time
#[tokio::test]
async fn test_audio_buffers_do_not_mix() {
    let port = find_available_port();
    let stt = Arc::new(MockSTT::fixed("whatever", 0.9));
    let state = mock_app_state(
        test_config(port),
        stt.clone(),
        Arc::new(MockLLM::echo()),
        Arc::new(MockTTS::with_audio_len(64)),
    );
    start_test_server(state, port).await;

    let (mut ws_a, _session_a) = connect_call(port).await;
    let (mut ws_b, _session_b) = connect_call(port).await;

    ws_a.send(text_message(r#"{"type":"start"}"#)).await.unwrap();
    next_json(&mut ws_a).await;
    ws_b.send(text_message(r#"{"type":"start"}"#)).await.unwrap();
    next_json(&mut ws_b).await;

    // Interleave the frame appends across the two connections
    ws_a.send(binary_message(vec![1, 1])).await.unwrap();
    ws_b.send(binary_message(vec![2, 2, 2])).await.unwrap();
    ws_a.send(binary_message(vec![1, 1])).await.unwrap();

    ws_a.send(text_message(r#"{"type":"stop"}"#)).await.unwrap();
    ws_b.send(text_message(r#"{"type":"stop"}"#)).await.unwrap();

    let (_, _) = tokio::join!(
        async {
            loop {
                if next_json(&mut ws_a).await["type"] == "tts_done" {
                    break;
                }
            }
        },
        async {
            loop {
                if next_json(&mut ws_b).await["type"] == "tts_done" {
                    break;
                }
            }
        },
    );

    // Each transcription call saw one connection's concatenated frames
    let received: HashSet<Vec<u8>> = stt.received().into_iter().collect();
    let expected: HashSet<Vec<u8>> =
        [vec![1, 1, 1, 1], vec![2, 2, 2]].into_iter().collect();
    assert_eq!(received, expected);
}

/// Many connections each complete a full turn concurrently
#[tokio::test]
async fn test_many_concurrent_full_turns() {
    let port = find_available_port();
    let mut stt = MockSTT::fixed("unmapped", 0.9);
    for i in 0..6u8 {
        stt = stt.with_mapping(vec![i; 3], &format!("utterance {i}"), 0.9);
    }
    let state = mock_app_state(
        test_config(port),
        Arc::new(stt),
        Arc::new(MockLLM::echo()),
        Arc::new(MockTTS::with_audio_len(200)),
    );
    start_test_server(state, port).await;

    let mut handles = Vec::new();
    for i in 0..6u8 {
        handles.push(tokio::spawn(async move {
            let (mut ws, session_id) = connect_call(port).await;
            let (transcript, reply) = run_turn(&mut ws, vec![i; 3]).await;
            (i, session_id, transcript, reply)
        }));
    }

    let mut session_ids = HashSet::new();
    for handle in handles {
        let (i, session_id, transcript, reply) = handle.await.unwrap();
        assert_eq!(transcript, format!("utterance {i}"));
        assert_eq!(reply, format!("Echo: utterance {i}"));

        let turns = fetch_turns(port, &session_id).await;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0]["user_transcript_final"], transcript.as_str());

        session_ids.insert(session_id);
    }
    assert_eq!(session_ids.len(), 6);
}
