//! Orchestration behaviour with collaborator doubles.

use std::sync::{Arc, Mutex};

use ai_llm_service::Candidate;
use orchestrator::{
    BoxFuture, Embedder, FALLBACK_ANSWER, GENERIC_FAILURE, Generator, Orchestrator,
    OrchestratorError, OrchestratorResponse, Query, TOP_K, VectorSearch,
};
use review_store::ScoredMatch;
use serde_json::{Map, Value, json};

/// Shared call log so tests can assert ordering and short-circuiting.
#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    fn push(&self, s: impl Into<String>) {
        self.0.lock().unwrap().push(s.into());
    }
    fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct FakeEmbedder {
    log: Log,
    out: Result<Vec<Vec<f32>>, OrchestratorError>,
    inputs: Mutex<Vec<Vec<String>>>,
}

impl Embedder for FakeEmbedder {
    fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            self.log.push("embed");
            self.inputs.lock().unwrap().push(texts.to_vec());
            self.out.clone()
        })
    }
}

struct FakeSearch {
    log: Log,
    out: Result<Vec<ScoredMatch>, OrchestratorError>,
    seen: Mutex<Vec<(Vec<f32>, u64, bool)>>,
}

impl VectorSearch for FakeSearch {
    fn query<'a>(
        &'a self,
        vector: &'a [f32],
        top_k: u64,
        include_metadata: bool,
    ) -> BoxFuture<'a, Vec<ScoredMatch>> {
        Box::pin(async move {
            self.log.push("query");
            self.seen
                .lock()
                .unwrap()
                .push((vector.to_vec(), top_k, include_metadata));
            self.out.clone()
        })
    }
}

struct FakeGenerator {
    log: Log,
    out: Result<Vec<Candidate>, OrchestratorError>,
    prompts: Mutex<Vec<String>>,
}

impl Generator for FakeGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Vec<Candidate>> {
        Box::pin(async move {
            self.log.push("generate");
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.out.clone()
        })
    }
}

struct Harness {
    log: Log,
    embedder: Arc<FakeEmbedder>,
    search: Arc<FakeSearch>,
    generator: Arc<FakeGenerator>,
    orch: Orchestrator,
}

fn harness(
    embed: Result<Vec<Vec<f32>>, OrchestratorError>,
    search: Result<Vec<ScoredMatch>, OrchestratorError>,
    generate: Result<Vec<Candidate>, OrchestratorError>,
) -> Harness {
    let log = Log::default();
    let embedder = Arc::new(FakeEmbedder {
        log: log.clone(),
        out: embed,
        inputs: Mutex::new(Vec::new()),
    });
    let search = Arc::new(FakeSearch {
        log: log.clone(),
        out: search,
        seen: Mutex::new(Vec::new()),
    });
    let generator = Arc::new(FakeGenerator {
        log: log.clone(),
        out: generate,
        prompts: Mutex::new(Vec::new()),
    });
    let orch = Orchestrator::new(embedder.clone(), search.clone(), generator.clone());
    Harness {
        log,
        embedder,
        search,
        generator,
        orch,
    }
}

fn hit(name: &str, comment: &str, score: f32) -> ScoredMatch {
    let mut metadata = Map::new();
    metadata.insert("name".into(), Value::String(name.into()));
    metadata.insert("comment".into(), Value::String(comment.into()));
    ScoredMatch {
        id: format!("{name}-{score}"),
        score,
        metadata,
    }
}

fn query_json(v: Value) -> Query {
    serde_json::from_value(v).unwrap()
}

#[tokio::test]
async fn happy_path_returns_first_candidate() {
    let h = harness(
        Ok(vec![vec![0.1, 0.2, 0.3]]),
        Ok(vec![hit("Dr. Lee", "Great explanations", 0.9)]),
        Ok(vec![Candidate::new("Dr. Lee is highly recommended.")]),
    );

    let resp = h.orch.respond(&Query::new("Who teaches algorithms well?")).await;

    assert_eq!(resp, OrchestratorResponse::ok("Dr. Lee is highly recommended."));
    assert_eq!(h.log.calls(), vec!["embed", "query", "generate"]);
    let prompt = h.generator.prompts.lock().unwrap()[0].clone();
    assert!(prompt.contains("Who teaches algorithms well?"));
    assert!(prompt.contains(r#"{"comment":"Great explanations","teacherName":"Dr. Lee"}"#));
}

#[tokio::test]
async fn embedding_passes_unchanged_to_search_with_top_k_and_metadata() {
    let v = vec![0.25, -1.5, 3.0e-7, 42.0];
    let h = harness(
        Ok(vec![v.clone()]),
        Ok(vec![]),
        Ok(vec![Candidate::new("ok")]),
    );

    h.orch.answer(&Query::new("  spaced question ")).await.unwrap();

    assert_eq!(
        h.embedder.inputs.lock().unwrap().clone(),
        vec![vec!["  spaced question ".to_string()]]
    );
    let seen = h.search.seen.lock().unwrap().clone();
    assert_eq!(seen, vec![(v, TOP_K, true)]);
    assert_eq!(TOP_K, 5);
}

#[tokio::test]
async fn empty_results_give_an_ungrounded_prompt() {
    let h = harness(Ok(vec![vec![1.0]]), Ok(vec![]), Ok(vec![Candidate::new("guess")]));

    let out = h.orch.answer(&Query::new("anyone?")).await.unwrap();

    assert_eq!(out, "guess");
    let prompt = h.generator.prompts.lock().unwrap()[0].clone();
    assert!(!prompt.contains(orchestrator::prompt::CONTEXT_MARKER));
}

#[tokio::test]
async fn more_than_top_k_matches_are_truncated() {
    let hits: Vec<_> = (0..8).map(|i| hit(&format!("P{i}"), "c", 1.0 - i as f32 / 10.0)).collect();
    let h = harness(Ok(vec![vec![1.0]]), Ok(hits), Ok(vec![Candidate::new("x")]));

    h.orch.answer(&Query::new("q")).await.unwrap();

    let prompt = h.generator.prompts.lock().unwrap()[0].clone();
    assert_eq!(prompt.matches("teacherName").count(), 5);
    assert!(prompt.contains("P4") && !prompt.contains("P5"));
    let p0 = prompt.find("P0").unwrap();
    let p4 = prompt.find("P4").unwrap();
    assert!(p0 < p4);
}

#[tokio::test]
async fn no_usable_text_falls_back_without_failing() {
    for out in [vec![], vec![Candidate::new("   ")]] {
        let h = harness(Ok(vec![vec![1.0]]), Ok(vec![]), Ok(out));
        let resp = h.orch.respond(&Query::new("q")).await;
        assert_eq!(resp, OrchestratorResponse::ok(FALLBACK_ANSWER));
    }
}

#[tokio::test]
async fn invalid_question_calls_nothing() {
    for body in [json!({}), json!({"question": 42}), json!({"question": ""})] {
        let h = harness(Ok(vec![vec![1.0]]), Ok(vec![]), Ok(vec![]));
        let resp = h.orch.respond(&query_json(body)).await;
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert!(resp.message.unwrap().contains("Invalid question"));
        assert!(h.log.calls().is_empty());
    }
}

#[tokio::test]
async fn whitespace_question_is_still_answered() {
    let h = harness(Ok(vec![vec![1.0]]), Ok(vec![]), Ok(vec![Candidate::new("ok")]));

    let resp = h.orch.respond(&Query::new("   ")).await;

    assert_eq!(resp, OrchestratorResponse::ok("ok"));
    assert_eq!(h.log.calls(), vec!["embed", "query", "generate"]);
    assert_eq!(h.embedder.inputs.lock().unwrap().clone(), vec![vec!["   ".to_string()]]);
}

#[tokio::test]
async fn embedding_failure_stops_the_pipeline() {
    let h = harness(
        Err(OrchestratorError::upstream("embedding", "quota exceeded")),
        Ok(vec![]),
        Ok(vec![]),
    );
    let resp = h.orch.respond(&Query::new("q")).await;
    assert!(!resp.success);
    assert!(resp.message.unwrap().contains("quota exceeded"));
    assert_eq!(h.log.calls(), vec!["embed"]);
}

#[tokio::test]
async fn wrong_embedding_count_is_upstream_error() {
    for vectors in [vec![], vec![vec![1.0], vec![2.0]], vec![vec![]]] {
        let h = harness(Ok(vectors), Ok(vec![]), Ok(vec![]));
        let err = h.orch.answer(&Query::new("q")).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Upstream { service: "embedding", .. }));
        assert_eq!(h.log.calls(), vec!["embed"]);
    }
}

#[tokio::test]
async fn failure_without_a_cause_uses_generic_message() {
    let h = harness(
        Ok(vec![vec![1.0]]),
        Err(OrchestratorError::upstream("vector search", "  ")),
        Ok(vec![]),
    );
    let resp = h.orch.respond(&Query::new("q")).await;
    assert_eq!(resp, OrchestratorResponse::fail(GENERIC_FAILURE));
}

#[tokio::test]
async fn search_failure_skips_generation() {
    let h = harness(
        Ok(vec![vec![1.0]]),
        Err(OrchestratorError::upstream("vector search", "timeout")),
        Ok(vec![Candidate::new("unused")]),
    );
    let err = h.orch.answer(&Query::new("q")).await.unwrap_err();
    assert_eq!(err.to_string(), "vector search service failed: timeout");
    assert_eq!(h.log.calls(), vec!["embed", "query"]);
}

#[tokio::test]
async fn generation_failure_is_fatal() {
    let h = harness(
        Ok(vec![vec![1.0]]),
        Ok(vec![hit("Dr. Lee", "ok", 0.5)]),
        Err(OrchestratorError::Configuration("GOOGLE_API_KEY missing".into())),
    );
    let resp = h.orch.respond(&Query::new("q")).await;
    assert!(!resp.success);
    assert!(resp.message.unwrap().contains("GOOGLE_API_KEY"));
    assert_eq!(h.log.calls(), vec!["embed", "query", "generate"]);
}
