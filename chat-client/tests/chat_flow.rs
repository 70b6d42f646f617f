//! Client flow against a fake chat endpoint.

use std::future::Future;
use std::pin::Pin;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{Json, Router, http::StatusCode, routing::post};
use chat_client::{
    ChatMessage, ChatReply, ChatRole, ChatSession, ChatTransport, ClientError, FAILURE_TEXT,
    GREETING, HttpTransport, repl,
};
use serde_json::{Value, json};
use tokio::sync::Notify;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/chat")
}

fn echo_server(hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/api/chat",
        post(move |Json(body): Json<Value>| {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                let q = body["question"].as_str().unwrap_or_default().to_string();
                Json(json!({"success": true, "data": format!("You asked: **{q}**")}))
            }
        }),
    )
}

#[tokio::test]
async fn hello_appends_user_then_one_bot_message() {
    let hits = Arc::new(AtomicUsize::new(0));
    let url = serve(echo_server(hits.clone())).await;
    let transport = HttpTransport::new(url, 5).unwrap();
    let mut session = ChatSession::new();

    let question = session.submit("hello").unwrap();
    assert_eq!(session.last(), Some(&ChatMessage::user("hello")));

    let reply = transport.send(&question).await;
    session.apply_reply(reply);

    assert_eq!(
        session.messages(),
        &[
            ChatMessage::bot(GREETING),
            ChatMessage::user("hello"),
            ChatMessage::bot("You asked: **hello**"),
        ]
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_error_becomes_generic_apology() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async {
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"success": false, "message": "embedding service failed: quota"})),
            )
        }),
    );
    let url = serve(app).await;
    let transport = HttpTransport::new(url, 5).unwrap();

    let reply = transport.send("hello").await;
    assert!(matches!(reply, Err(ClientError::Status { status: 502, .. })));

    let mut session = ChatSession::new();
    session.submit("hello");
    let msg = session.apply_reply(reply).clone();
    assert_eq!(msg, ChatMessage::bot(FAILURE_TEXT));
    assert_eq!(session.messages().len(), 3);
}

#[tokio::test]
async fn unreachable_server_becomes_generic_apology() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let transport = HttpTransport::new(format!("http://{addr}/api/chat"), 2).unwrap();

    let reply = transport.send("hello").await;
    assert!(matches!(reply, Err(ClientError::Transport { .. })));

    let mut session = ChatSession::new();
    session.submit("hello");
    assert_eq!(session.apply_reply(reply).text, FAILURE_TEXT);
}

#[tokio::test]
async fn garbage_body_is_a_decode_error() {
    let app = Router::new().route("/api/chat", post(|| async { "not json" }));
    let url = serve(app).await;
    let transport = HttpTransport::new(url, 5).unwrap();

    let reply = transport.send("hello").await;
    assert!(matches!(reply, Err(ClientError::Decode(_))));
}

#[tokio::test]
async fn only_non_empty_input_reaches_the_server() {
    let hits = Arc::new(AtomicUsize::new(0));
    let url = serve(echo_server(hits.clone())).await;
    let transport = HttpTransport::new(url, 5).unwrap();
    let mut session = ChatSession::new();

    for input in ["", "   "] {
        if let Some(question) = session.submit(input) {
            let reply = transport.send(&question).await;
            session.apply_reply(reply);
        }
    }

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        session.messages(),
        &[
            ChatMessage::bot(GREETING),
            ChatMessage::user("   "),
            ChatMessage::bot("You asked: **   **"),
        ]
    );
}

/// Holds the reply to `"first"` until `"second"` has been sent.
#[derive(Default)]
struct OutOfOrder {
    second_sent: Notify,
}

impl ChatTransport for OutOfOrder {
    fn send<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ChatReply, ClientError>> + Send + 'a>> {
        Box::pin(async move {
            if question == "first" {
                self.second_sent.notified().await;
            } else {
                self.second_sent.notify_one();
            }
            Ok(ChatReply {
                success: true,
                data: Some(format!("re: {question}")),
                message: None,
            })
        })
    }
}

#[tokio::test]
async fn overlapping_sends_append_replies_in_arrival_order() {
    colored::control::set_override(false);
    let transport: Arc<dyn ChatTransport> = Arc::new(OutOfOrder::default());
    let mut session = ChatSession::new();
    let mut out = Vec::new();

    repl::run(&mut session, transport, &b"first\nsecond\n"[..], &mut out)
        .await
        .unwrap();

    assert_eq!(
        session.messages(),
        &[
            ChatMessage::bot(GREETING),
            ChatMessage::user("first"),
            ChatMessage::user("second"),
            ChatMessage::bot("re: second"),
            ChatMessage::bot("re: first"),
        ]
    );
    let printed = String::from_utf8(out).unwrap();
    let pos = |s: &str| printed.find(s).unwrap();
    assert!(pos("\nfirst\n") < pos("\nsecond\n"));
    assert!(pos("re: second") < pos("re: first"));
    assert_eq!(printed.matches("Hunter bot").count(), 3);
}

#[test]
fn success_without_data_shows_empty_bot_message() {
    let mut session = ChatSession::new();
    session.submit("q");
    let msg = session.apply_reply(Ok(ChatReply {
        success: true,
        data: None,
        message: None,
    }));
    assert_eq!(msg.role, ChatRole::Bot);
    assert_eq!(msg.text, "");
}
