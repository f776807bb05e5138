//! Call WebSocket handler
//!
//! One task per accepted connection. The task owns the connection's turn
//! state machine and audio buffer outright; the only state it shares with
//! other connections is the session registry and the call store. All turn
//! work runs inline on this task, so events for a turn can never
//! interleave with another turn on the same connection.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::{select, time::Duration};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::session::{CallSession, SessionStatus, now_ts};
use crate::state::AppState;

use super::messages::{
    CallIncomingMessage, CallMessageRoute, CallOutgoingMessage, TRACE_TURN_STARTED,
};
use super::pipeline::TurnPipeline;
use super::turn::{StopOutcome, TurnStateMachine};

/// Optimized channel buffer size for audio workloads
const CHANNEL_BUFFER_SIZE: usize = 1024;

/// Maximum WebSocket frame size (10 MB)
const MAX_WS_FRAME_SIZE: usize = 10 * 1024 * 1024;

/// Maximum WebSocket message size (10 MB)
const MAX_WS_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Call WebSocket handler
///
/// Upgrades the HTTP connection to WebSocket and runs the call loop:
/// binary frames buffer audio, "start"/"stop" drive turns through the
/// pipeline, "end_call" hangs up.
pub async fn call_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    info!("Call WebSocket connection upgrade requested");

    ws.max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_call_socket(socket, state))
}

/// Handle the call WebSocket connection
async fn handle_call_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let session_id = Uuid::new_v4().to_string();
    info!("Call {} connected", session_id);

    if let Err(e) = app_state
        .store
        .create_session(CallSession::new(session_id.clone()))
        .await
    {
        error!("Failed to persist call {}: {}", session_id, e);
        return;
    }

    let (mut sender, mut receiver) = socket.split();
    let (message_tx, mut message_rx) = mpsc::channel::<CallMessageRoute>(CHANNEL_BUFFER_SIZE);

    if let Err(e) = app_state.registry.register(&session_id, message_tx.clone()) {
        error!("Failed to register call: {}", e);
        let _ = app_state.store.end_session(&session_id, now_ts()).await;
        return;
    }

    // Sender task for outgoing messages
    let sender_task = tokio::spawn(async move {
        while let Some(route) = message_rx.recv().await {
            let should_close = matches!(route, CallMessageRoute::Close);

            let result = match route {
                CallMessageRoute::Outgoing(message) => match serde_json::to_string(&message) {
                    Ok(json_str) => sender.send(Message::Text(json_str.into())).await,
                    Err(e) => {
                        error!("Failed to serialize outgoing message: {}", e);
                        continue;
                    }
                },
                CallMessageRoute::Close => {
                    info!("Closing call WebSocket connection");
                    sender.send(Message::Close(None)).await
                }
            };

            if let Err(e) = result {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }

            if should_close {
                break;
            }
        }
    });

    // The session identifier is the first thing the client hears
    let _ = message_tx
        .send(CallMessageRoute::Outgoing(CallOutgoingMessage::SessionId {
            session_id: session_id.clone(),
        }))
        .await;

    let mut machine = TurnStateMachine::new();

    // How often we check if the connection is stale
    let processing_timeout = Duration::from_secs(30);

    // Maximum idle time before closing the connection, with 10% jitter
    // so simultaneous connections do not all expire on the same tick
    let base_idle_secs = app_state.config.session_idle_timeout_secs.max(1);
    let jitter_range = (base_idle_secs / 10).max(1);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as u64;
    let jitter_offset = (nanos % (jitter_range * 2)) as i64 - jitter_range as i64;
    let idle_secs = (base_idle_secs as i64 + jitter_offset).max(1) as u64;
    let idle_timeout = Duration::from_secs(idle_secs);

    // Track last activity time for idle connection detection
    let mut last_activity = std::time::Instant::now();

    loop {
        select! {
            msg_result = receiver.next() => {
                // Update activity time on any message
                last_activity = std::time::Instant::now();

                match msg_result {
                    Some(Ok(msg)) => {
                        let continue_processing = process_call_message(
                            msg,
                            &mut machine,
                            &session_id,
                            &message_tx,
                            &app_state,
                        ).await;

                        if !continue_processing {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!("Call {} WebSocket error: {}", session_id, e);
                        break;
                    }
                    None => {
                        info!("Call {} closed by client", session_id);
                        break;
                    }
                }
            }
            _ = tokio::time::sleep(processing_timeout) => {
                // Check if connection has been idle too long
                if last_activity.elapsed() > idle_timeout {
                    warn!(
                        "Call {} idle for {}s, closing stale connection",
                        session_id,
                        last_activity.elapsed().as_secs()
                    );
                    let _ = message_tx
                        .send(CallMessageRoute::Outgoing(CallOutgoingMessage::error(
                            "Connection closed due to inactivity",
                        )))
                        .await;
                    let _ = message_tx.send(CallMessageRoute::Close).await;
                    break;
                }
                debug!("Call {} idle check - still active", session_id);
            }
        }
    }

    // Cleanup: buffer first, then the durable record, then the registry
    machine.on_close();
    if let Err(e) = app_state.store.end_session(&session_id, now_ts()).await {
        error!("Failed to finalize call {}: {}", session_id, e);
    }
    app_state.registry.unregister(&session_id);
    sender_task.abort();

    info!("Call {} terminated", session_id);
}

/// Process incoming WebSocket message
#[inline(always)]
async fn process_call_message(
    msg: Message,
    machine: &mut TurnStateMachine,
    session_id: &str,
    message_tx: &mpsc::Sender<CallMessageRoute>,
    app_state: &Arc<AppState>,
) -> bool {
    match msg {
        Message::Text(text) => {
            debug!("Received text message: {} bytes", text.len());

            let incoming: CallIncomingMessage = match serde_json::from_str(&text) {
                Ok(msg) => msg,
                Err(e) => {
                    error!("Failed to parse call message: {}", e);
                    let _ = message_tx
                        .send(CallMessageRoute::Outgoing(CallOutgoingMessage::error(
                            format!("Invalid message format: {e}"),
                        )))
                        .await;
                    return true;
                }
            };

            handle_call_incoming(incoming, machine, session_id, message_tx, app_state).await
        }
        Message::Binary(data) => {
            if data.is_empty() {
                debug!("Ignoring empty audio frame");
                return true;
            }
            if data.len() > app_state.config.max_audio_frame_bytes {
                warn!(
                    "Dropping oversized audio frame: {} bytes (max {})",
                    data.len(),
                    app_state.config.max_audio_frame_bytes
                );
                let _ = message_tx
                    .send(CallMessageRoute::Outgoing(CallOutgoingMessage::error(
                        "Audio frame too large",
                    )))
                    .await;
                return true;
            }

            machine.on_audio(&data);
            true
        }
        Message::Ping(_) => {
            debug!("Received ping");
            true
        }
        Message::Pong(_) => {
            debug!("Received pong");
            true
        }
        Message::Close(_) => {
            info!("Call {} close frame received", session_id);
            false
        }
    }
}

/// Handle typed control messages
async fn handle_call_incoming(
    msg: CallIncomingMessage,
    machine: &mut TurnStateMachine,
    session_id: &str,
    message_tx: &mpsc::Sender<CallMessageRoute>,
    app_state: &Arc<AppState>,
) -> bool {
    match msg {
        CallIncomingMessage::Start => {
            handle_start(machine, session_id, message_tx, app_state).await;
            true
        }
        CallIncomingMessage::Stop => {
            handle_stop(machine, session_id, message_tx, app_state).await;
            true
        }
        CallIncomingMessage::EndCall => {
            info!("Call {} hung up", session_id);
            let _ = message_tx.send(CallMessageRoute::Close).await;
            false
        }
    }
}

/// Arm a new turn and announce it
async fn handle_start(
    machine: &mut TurnStateMachine,
    session_id: &str,
    message_tx: &mpsc::Sender<CallMessageRoute>,
    app_state: &Arc<AppState>,
) {
    match machine.on_start() {
        Some(started) => {
            debug!("Call {} armed turn {}", session_id, started.turn_id);

            // The status write lands before the trace event goes out
            if let Err(e) = app_state
                .store
                .update_session_status(session_id, SessionStatus::Active)
                .await
            {
                error!("Failed to mark call {} active: {}", session_id, e);
            }

            let _ = message_tx
                .send(CallMessageRoute::Outgoing(CallOutgoingMessage::TraceEvent {
                    event: TRACE_TURN_STARTED.to_string(),
                    turn_id: started.turn_id,
                    ts: started.started_ts,
                }))
                .await;
        }
        None => {
            debug!(
                "Call {} ignoring start in phase {:?}",
                session_id,
                machine.phase()
            );
        }
    }
}

/// Freeze the buffer and run the pipeline to completion
///
/// The pipeline runs on this task, so the connection reads no further
/// messages until the turn is over. Anything the client sent meanwhile is
/// handled afterwards, from Idle.
async fn handle_stop(
    machine: &mut TurnStateMachine,
    session_id: &str,
    message_tx: &mpsc::Sender<CallMessageRoute>,
    app_state: &Arc<AppState>,
) {
    match machine.on_stop() {
        StopOutcome::Process { mut turn, audio } => {
            debug!(
                "Call {} processing turn {} ({} bytes)",
                session_id,
                turn.id,
                audio.len()
            );

            let pipeline = TurnPipeline {
                store: app_state.store.as_ref(),
                stt: app_state.stt.as_ref(),
                llm: app_state.llm.as_ref(),
                tts: app_state.tts.as_ref(),
                events: message_tx,
                session_id,
            };
            if let Err(e) = pipeline.run(&mut turn, audio).await {
                error!("Call {} turn {} aborted: {}", session_id, turn.id, e);
                let _ = message_tx
                    .send(CallMessageRoute::Outgoing(CallOutgoingMessage::error(
                        format!("Pipeline failed: {e}"),
                    )))
                    .await;
            }
            machine.finish_processing();
        }
        StopOutcome::NoAudio => {
            warn!("Call {} stop with no buffered audio", session_id);
            let _ = message_tx
                .send(CallMessageRoute::Outgoing(CallOutgoingMessage::error(
                    "No audio received",
                )))
                .await;
        }
        StopOutcome::NoActiveTurn => {
            warn!("Call {} stop without a started turn", session_id);
            let _ = message_tx
                .send(CallMessageRoute::Outgoing(CallOutgoingMessage::error(
                    "No active turn",
                )))
                .await;
        }
        StopOutcome::Ignored => {}
    }
}
