//! End-to-end pipeline scenarios: submit a prompt against a scripted
//! transport and assert the published message snapshots.

mod common;

use common::{engine_with, last_assistant, wait_for_snapshot};
use kbchat::adapters::MockTransport;
use kbchat::{
    ChatError, ChatEngine, MessageStatus, Notifier, NotificationLevel, Role, SubmitOptions,
};
use std::sync::Arc;

#[tokio::test]
async fn test_content_chunks_accumulate_to_success() {
    // Scenario: "Hel" + "lo" + [DONE] -> content "Hello", success.
    let engine = engine_with(MockTransport::new().with_chunks([
        "data: {\"content\":\"Hel\"}\n",
        "data: {\"content\":\"lo\"}\n",
        "data: [DONE]\n",
    ]));
    let mut rx = engine.subscribe();
    engine.submit("hi", SubmitOptions::default()).await.unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;
    let assistant = last_assistant(&snapshot);
    assert_eq!(assistant.content, "Hello");
    assert_eq!(assistant.display_content, "Hello");
    assert!(assistant.thinking.is_none());

    // The user message was appended complete.
    let user = snapshot.iter().find(|m| m.role == Role::User).unwrap();
    assert_eq!(user.content, "hi");
    assert_eq!(user.status, MessageStatus::Success);
}

#[tokio::test]
async fn test_retrieval_event_then_content() {
    let engine = engine_with(MockTransport::new().with_chunks([
        "data: {\"retrieveMode\":true,\"kbName\":\"Docs\",\"retrieves\":[{\"docId\":\"d1\",\"title\":\"T\",\"kbId\":1,\"chunkIndexs\":[\"0\"]}]}\n",
        "data: {\"content\":\"Answer\"}\n",
        "data: [DONE]\n",
    ]));
    let mut rx = engine.subscribe();
    engine
        .submit("question", SubmitOptions::default())
        .await
        .unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;
    let assistant = last_assistant(&snapshot);
    assert!(assistant.retrieve_mode);
    assert_eq!(assistant.kb_name.as_deref(), Some("Docs"));
    assert_eq!(assistant.retrieves.len(), 1);
    assert_eq!(assistant.retrieves[0].doc_id, "d1");
    assert_eq!(assistant.retrieves[0].chunk_indexes, vec!["0"]);
    assert_eq!(assistant.content, "Answer");
}

#[tokio::test]
async fn test_embedded_tags_split_across_chunks() {
    // The tag pair arrives split mid-tag across two wire events.
    let engine = engine_with(MockTransport::new().with_chunks([
        "data: {\"content\":\"<think>step1</th\"}\n",
        "data: {\"content\":\"ink>visible<tool>search</tool>\"}\n",
        "data: [DONE]\n",
    ]));
    let mut rx = engine.subscribe();
    engine.submit("go", SubmitOptions::default()).await.unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;
    let assistant = last_assistant(&snapshot);
    assert_eq!(assistant.thinking.as_deref(), Some("step1"));
    assert_eq!(assistant.display_content, "visible");
    assert_eq!(assistant.tool_names, vec!["search"]);
}

#[tokio::test]
async fn test_tool_names_deduplicated_first_seen_order() {
    let engine = engine_with(MockTransport::new().with_chunks([
        "data: {\"content\":\"<tool>search</tool>a<tool>calc\\nsearch</tool>b\"}\n",
        "data: [DONE]\n",
    ]));
    let mut rx = engine.subscribe();
    engine.submit("go", SubmitOptions::default()).await.unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;
    let assistant = last_assistant(&snapshot);
    assert_eq!(assistant.tool_names, vec!["search", "calc"]);
    assert_eq!(assistant.display_content, "ab");
}

#[tokio::test]
async fn test_wire_thinking_deltas() {
    let engine = engine_with(MockTransport::new().with_chunks([
        "data: {\"thinking\":\"let me \"}\n",
        "data: {\"thinking\":\"see\"}\n",
        "data: {\"content\":\"ok\"}\n",
        "data: [DONE]\n",
    ]));
    let mut rx = engine.subscribe();
    engine.submit("go", SubmitOptions::default()).await.unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;
    let assistant = last_assistant(&snapshot);
    assert_eq!(assistant.thinking.as_deref(), Some("let me see"));
    assert_eq!(assistant.content, "ok");
}

#[tokio::test]
async fn test_non_json_payload_becomes_literal_content() {
    // Scenario: "data: not-json" appends the literal text.
    let engine = engine_with(MockTransport::new().with_chunks(["data: not-json\n"]));
    let mut rx = engine.subscribe();
    engine.submit("go", SubmitOptions::default()).await.unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;
    assert_eq!(last_assistant(&snapshot).content, "not-json");
}

#[tokio::test]
async fn test_read_failure_rewrites_with_apology() {
    // Scenario: failure after partial "Hel" -> error status, apology text.
    let transport = MockTransport::new()
        .with_chunks(["data: {\"content\":\"Hel\"}\n"])
        .with_read_error("connection reset");
    let engine = engine_with(transport);
    let mut notes = engine.notifications();
    let mut rx = engine.subscribe();
    engine.submit("go", SubmitOptions::default()).await.unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Error
    })
    .await;
    let assistant = last_assistant(&snapshot);
    assert_eq!(assistant.content, kbchat::models::ERROR_APOLOGY);
    assert_ne!(assistant.content, "Hel");

    let note = notes.recv().await.unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
    assert!(note.message.contains("connection reset"));
}

#[tokio::test]
async fn test_session_creation_failure_leaves_no_placeholder() {
    let engine = engine_with(MockTransport::new().failing_session("backend down"));
    let mut notes = engine.notifications();

    let result = engine.submit("hi", SubmitOptions::default()).await;
    assert!(matches!(result, Err(ChatError::Transport(_))));
    assert!(engine.messages().is_empty());

    let note = notes.recv().await.unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
    assert!(note.message.contains("backend down"));
}

#[tokio::test]
async fn test_open_failure_drives_message_to_error() {
    let engine = engine_with(MockTransport::new().failing_open("refused"));
    let mut rx = engine.subscribe();
    engine.submit("hi", SubmitOptions::default()).await.unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Error
    })
    .await;
    assert_eq!(
        last_assistant(&snapshot).content,
        kbchat::models::ERROR_APOLOGY
    );
}

#[tokio::test]
async fn test_empty_prompt_rejected() {
    let engine = engine_with(MockTransport::new());
    let result = engine.submit("   ", SubmitOptions::default()).await;
    assert!(matches!(result, Err(ChatError::EmptyPrompt)));
    assert!(engine.messages().is_empty());
}

#[tokio::test]
async fn test_stream_end_without_done_sentinel_is_success() {
    // Physical end of input is an equally valid terminator.
    let engine = engine_with(MockTransport::new().with_chunks(["data: {\"content\":\"fin\"}\n"]));
    let mut rx = engine.subscribe();
    engine.submit("go", SubmitOptions::default()).await.unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;
    assert_eq!(last_assistant(&snapshot).content, "fin");
}

#[tokio::test]
async fn test_trailing_event_without_newline() {
    let engine = engine_with(MockTransport::new().with_chunks(["data: {\"content\":\"tail\"}"]));
    let mut rx = engine.subscribe();
    engine.submit("go", SubmitOptions::default()).await.unwrap();

    let snapshot = wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;
    assert_eq!(last_assistant(&snapshot).content, "tail");
}

#[tokio::test]
async fn test_session_reused_across_submits() {
    let transport = Arc::new(
        MockTransport::new().with_chunks(["data: {\"content\":\"x\"}\ndata: [DONE]\n"]),
    );
    let engine = ChatEngine::new(transport.clone(), Notifier::default());
    let mut rx = engine.subscribe();

    engine.submit("one", SubmitOptions::default()).await.unwrap();
    wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;
    engine.submit("two", SubmitOptions::default()).await.unwrap();
    wait_for_snapshot(&mut rx, |m| {
        m.len() == 4 && last_assistant(m).status == MessageStatus::Success
    })
    .await;

    assert_eq!(transport.session_count(), 1);
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].session_id, requests[1].session_id);
}

#[tokio::test]
async fn test_submit_options_reach_the_wire() {
    let transport = Arc::new(
        MockTransport::new().with_chunks(["data: {\"content\":\"x\"}\n"]),
    );
    let engine = ChatEngine::new(transport.clone(), Notifier::default());
    let mut rx = engine.subscribe();

    let options = SubmitOptions {
        model: kbchat::models::ModelSelection {
            provider_id: Some("openai".to_string()),
            model_name: Some("gpt-4o".to_string()),
        },
        search_enabled: true,
        knowledge_base: Some(kbchat::models::KnowledgeBaseSelection {
            kb_id: 7,
            kb_name: "Docs".to_string(),
        }),
    };
    engine.submit("question", options).await.unwrap();
    wait_for_snapshot(&mut rx, |m| {
        !m.is_empty() && last_assistant(m).status == MessageStatus::Success
    })
    .await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "question");
    assert_eq!(requests[0].model_name.as_deref(), Some("gpt-4o"));
    assert!(requests[0].search_enabled);
    assert!(requests[0].rag_enabled);
    assert_eq!(requests[0].kb_id, Some(7));
}
