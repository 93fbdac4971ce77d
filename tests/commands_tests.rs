mod common;

use std::sync::atomic::Ordering;

use common::{GatewayCall, RecordingGateway, memory_store};
use whisperbot::api::interactive_handler::read_whisper;
use whisperbot::commands::whisper::{WhisperArgs, send_whisper};
use whisperbot::commands::{Invocation, dispatch, text};
use whisperbot::core::models::UserId;
use whisperbot::replies::{self, ButtonAction, EmbedColor, Visibility};

fn alice() -> UserId {
    UserId::new("UALICE")
}

fn bob() -> UserId {
    UserId::new("UBOB")
}

fn args(once: bool) -> WhisperArgs {
    WhisperArgs {
        recipient: bob(),
        once,
    }
}

// ============================================================================
// Saved text commands
// ============================================================================

#[tokio::test]
async fn test_view_text_without_saved_text() {
    let (store, _) = memory_store().await;

    let reply = text::view_text(&store, "", &alice()).await;

    assert_eq!(reply, replies::no_saved_text(""));
    assert!(reply.embed.description.contains("`/save-text`"));
}

#[tokio::test]
async fn test_view_text_echoes_saved_text() {
    let (store, _) = memory_store().await;
    store.save_text(&alice(), "hello *world*").await.unwrap();

    let reply = text::view_text(&store, "", &alice()).await;

    assert!(reply.is_ephemeral());
    assert!(reply.embed.description.ends_with("hello *world*"));
}

#[tokio::test]
async fn test_save_text_at_limit_is_accepted() {
    let (store, _) = memory_store().await;
    let text: String = "é".repeat(1024);

    let reply = text::save_text(&store, &alice(), &text).await.unwrap();

    assert_eq!(reply, replies::text_saved());
    assert_eq!(store.get_user(&alice()).await.saved_message, Some(text));
}

#[tokio::test]
async fn test_save_text_over_limit_is_rejected_before_store() {
    let (store, persistence) = memory_store().await;

    let reply = text::save_text(&store, &alice(), &"x".repeat(1025))
        .await
        .unwrap();

    assert_eq!(reply, replies::text_too_long());
    assert_eq!(reply.embed.color, EmbedColor::Error);
    assert_eq!(store.get_user(&alice()).await.saved_message, None);
    assert!(persistence.writes().await.is_empty());
}

#[tokio::test]
async fn test_save_empty_text_is_accepted() {
    let (store, _) = memory_store().await;

    text::save_text(&store, &alice(), "").await.unwrap();

    assert_eq!(
        store.get_user(&alice()).await.saved_message.as_deref(),
        Some("")
    );
}

#[tokio::test]
async fn test_remove_text() {
    let (store, persistence) = memory_store().await;

    let reply = text::remove_text(&store, &alice()).await.unwrap();
    assert_eq!(reply, replies::nothing_to_remove());
    assert!(persistence.writes().await.is_empty());

    store.save_text(&alice(), "secret").await.unwrap();
    let reply = text::remove_text(&store, &alice()).await.unwrap();
    assert_eq!(reply, replies::text_removed());
    assert_eq!(store.get_user(&alice()).await.saved_message, None);
}

// ============================================================================
// Whisper command
// ============================================================================

#[tokio::test]
async fn test_whisper_to_self_aborts_without_side_effects() {
    let (store, persistence) = memory_store().await;
    store.save_text(&alice(), "secret").await.unwrap();
    let gateway = RecordingGateway::new();

    let reply = send_whisper(
        &store,
        gateway.as_ref(),
        "",
        &alice(),
        "C0GENERAL",
        &WhisperArgs {
            recipient: alice(),
            once: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(reply, Some(replies::cannot_whisper_to_self()));
    assert!(gateway.calls().is_empty());
    assert_eq!(persistence.writes().await.len(), 1);
}

#[tokio::test]
async fn test_whisper_without_saved_text_aborts() {
    let (store, persistence) = memory_store().await;
    let gateway = RecordingGateway::new();

    let reply = send_whisper(&store, gateway.as_ref(), "", &alice(), "C0GENERAL", &args(false))
        .await
        .unwrap();

    assert_eq!(reply, Some(replies::nothing_to_whisper("")));
    assert!(gateway.calls().is_empty());
    assert!(persistence.writes().await.is_empty());
}

#[tokio::test]
async fn test_whisper_two_phase_protocol() {
    let (store, _) = memory_store().await;
    store.save_text(&alice(), "secret").await.unwrap();
    let gateway = RecordingGateway::new();

    let reply = send_whisper(&store, gateway.as_ref(), "", &alice(), "C0GENERAL", &args(true))
        .await
        .unwrap();
    assert_eq!(reply, None);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);

    let GatewayCall::Send {
        channel_id,
        reply: placeholder,
        assigned,
    } = &calls[0]
    else {
        panic!("expected placeholder post, got {:?}", calls[0]);
    };
    assert_eq!(channel_id, "C0GENERAL");
    assert_eq!(placeholder.visibility, Visibility::InChannel);
    assert!(placeholder.embed.description.contains("<@UALICE> whispers to <@UBOB>..."));
    let loading = placeholder.button.as_ref().unwrap();
    assert_eq!(loading.label, "Loading...");
    assert_eq!(loading.action, ButtonAction::Loading);

    let GatewayCall::Edit { message_id, reply: ready } = &calls[1] else {
        panic!("expected message edit, got {:?}", calls[1]);
    };
    assert_eq!(message_id, assigned);
    let read = ready.button.as_ref().unwrap();
    assert_eq!(read.label, "Read whisper");
    assert_eq!(read.action, ButtonAction::Read(assigned.clone()));

    let whisper = store.get_whisper(assigned).await.unwrap();
    assert_eq!(whisper.owner, alice());
    assert_eq!(whisper.viewer, bob());
    assert_eq!(whisper.text, "secret");
    assert!(whisper.once);
}

#[tokio::test]
async fn test_whisper_send_failure_registers_nothing() {
    let (store, persistence) = memory_store().await;
    store.save_text(&alice(), "secret").await.unwrap();
    let gateway = RecordingGateway::new();
    gateway.fail_send.store(true, Ordering::SeqCst);

    let result =
        send_whisper(&store, gateway.as_ref(), "", &alice(), "C0GENERAL", &args(false)).await;

    assert!(result.is_err());
    assert_eq!(persistence.writes().await.len(), 1);
}

#[tokio::test]
async fn test_whisper_edit_failure_drops_record() {
    let (store, _) = memory_store().await;
    store.save_text(&alice(), "secret").await.unwrap();
    let gateway = RecordingGateway::new();
    gateway.fail_edit.store(true, Ordering::SeqCst);

    let result =
        send_whisper(&store, gateway.as_ref(), "", &alice(), "C0GENERAL", &args(false)).await;
    assert!(result.is_err());

    let Some(GatewayCall::Send { assigned, .. }) = gateway.calls().into_iter().next() else {
        panic!("placeholder was not posted");
    };
    assert!(store.get_whisper(&assigned).await.is_none());
}

#[tokio::test]
async fn test_dispatch_routes_by_command_name() {
    let (store, _) = memory_store().await;
    let gateway = RecordingGateway::new();

    let invocation = Invocation {
        user_id: alice(),
        channel_id: "C0GENERAL".into(),
        command: "/w-save-text".into(),
        text: "saved via dispatch".into(),
    };
    let reply = dispatch(&store, gateway.as_ref(), "w-", &invocation)
        .await
        .unwrap();
    assert_eq!(reply, Some(replies::text_saved()));

    let unknown = Invocation {
        command: "/save-text".into(),
        ..invocation
    };
    let reply = dispatch(&store, gateway.as_ref(), "w-", &unknown)
        .await
        .unwrap();
    assert_eq!(reply, Some(replies::unknown_command("/save-text")));
}

#[tokio::test]
async fn test_dispatch_whisper_usage_error() {
    let (store, _) = memory_store().await;
    let gateway = RecordingGateway::new();

    let invocation = Invocation {
        user_id: alice(),
        channel_id: "C0GENERAL".into(),
        command: "/whisper".into(),
        text: "bob maybe".into(),
    };
    let reply = dispatch(&store, gateway.as_ref(), "", &invocation)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reply.embed.color, EmbedColor::Error);
    assert!(reply.embed.description.contains("Usage:"));
    assert!(gateway.calls().is_empty());
}

// ============================================================================
// End-to-end
// ============================================================================

#[tokio::test]
async fn test_one_time_whisper_end_to_end() {
    let (store, _) = memory_store().await;
    let gateway = RecordingGateway::new();

    text::save_text(&store, &alice(), "secret").await.unwrap();
    send_whisper(&store, gateway.as_ref(), "", &alice(), "C0GENERAL", &args(true))
        .await
        .unwrap();

    let button_value = gateway
        .calls()
        .into_iter()
        .find_map(|c| match c {
            GatewayCall::Edit { reply, .. } => match reply.button?.action {
                ButtonAction::Read(id) => Some(id.to_string()),
                ButtonAction::Loading => None,
            },
            _ => None,
        })
        .unwrap();

    let revealed = read_whisper(&store, &bob(), &button_value).await;
    assert_eq!(revealed.embed.description, "secret");
    assert!(revealed.embed.author.is_some());

    let again = read_whisper(&store, &bob(), &button_value).await;
    assert_eq!(again, replies::whisper_not_found());
}
