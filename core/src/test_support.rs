//! Hand-written collaborators for service and session tests.

use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use futures::{StreamExt, stream};
use tokio::sync::Barrier;

use crate::{
    domain::{
        chat::{
            entities::CompletionMessage,
            ports::{ChatCompletionClient, CompletionStream},
        },
        common::{
            ChatConfig, SearchConfig, UploadConfig, entities::app_errors::CoreError,
            services::Service,
        },
        ingredient_search::ports::EmbeddingClient,
        meal_analysis::{entities::ExtractedMeal, ports::NutritionExtractor, staging::StagedImage},
        vector_index::{entities::DistanceMetric, ports::VectorIndex},
    },
    infrastructure::vector_index::FlatVectorIndex,
};

pub struct FakeEmbeddingClient {
    vectors: HashMap<String, Vec<f32>>,
    fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl FakeEmbeddingClient {
    pub fn with_vector(text: &str, vector: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::from([(text.to_string(), vector)]),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            vectors: HashMap::new(),
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl EmbeddingClient for FakeEmbeddingClient {
    async fn embed(&self, text: String) -> Result<Vec<f32>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::ExternalServiceError(
                "embedding service unreachable".to_string(),
            ));
        }
        self.vectors
            .get(&text)
            .cloned()
            .ok_or_else(|| CoreError::ExternalServiceError(format!("no vector for '{}'", text)))
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub enum ScriptedReply {
    Fragments(Vec<String>),
    /// The completion request itself fails.
    Unavailable,
    /// Streams the fragments, then fails.
    FailsAfter(Vec<String>),
    /// Streams one fragment and never finishes. `dropped` flips when the stream is dropped.
    Hangs { first: String, dropped: Arc<AtomicBool> },
}

impl ScriptedReply {
    pub fn fragments(fragments: &[&str]) -> Self {
        ScriptedReply::Fragments(fragments.iter().map(|f| f.to_string()).collect())
    }
}

pub struct FakeChatClient {
    replies: Mutex<VecDeque<ScriptedReply>>,
    pub requests: Arc<Mutex<Vec<Vec<CompletionMessage>>>>,
}

impl FakeChatClient {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ChatCompletionClient for FakeChatClient {
    async fn stream_completion(
        &self,
        messages: Vec<CompletionMessage>,
    ) -> Result<CompletionStream, CoreError> {
        self.requests.lock().unwrap().push(messages);
        let reply = self.replies.lock().unwrap().pop_front();

        match reply {
            Some(ScriptedReply::Fragments(fragments)) => {
                Ok(stream::iter(fragments.into_iter().map(Ok)).boxed())
            }
            Some(ScriptedReply::FailsAfter(fragments)) => Ok(stream::iter(
                fragments
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(CoreError::ExternalServiceError(
                        "stream interrupted".to_string(),
                    )))),
            )
            .boxed()),
            Some(ScriptedReply::Hangs { first, dropped }) => {
                let guard = DropFlag(dropped);
                Ok(stream::iter(vec![Ok(first)])
                    .chain(stream::pending())
                    .map(move |fragment| {
                        let _guard = &guard;
                        fragment
                    })
                    .boxed())
            }
            Some(ScriptedReply::Unavailable) | None => Err(CoreError::ExternalServiceError(
                "chat model unavailable".to_string(),
            )),
        }
    }
}

pub struct FakeNutritionExtractor {
    outcome: Result<ExtractedMeal, CoreError>,
    barrier: Option<Arc<Barrier>>,
    /// Staged path and the bytes found there, per call.
    pub seen: Arc<Mutex<Vec<(PathBuf, Vec<u8>)>>>,
}

impl FakeNutritionExtractor {
    pub fn returning(outcome: Result<ExtractedMeal, CoreError>) -> Self {
        Self {
            outcome,
            barrier: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call waits until `barrier` is reached by all callers before reading the image.
    pub fn waiting_on(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }
}

impl NutritionExtractor for FakeNutritionExtractor {
    async fn extract(&self, image: &StagedImage) -> Result<ExtractedMeal, CoreError> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        let data = tokio::fs::read(image.path()).await?;
        self.seen
            .lock()
            .unwrap()
            .push((image.path().to_path_buf(), data));
        self.outcome.clone()
    }
}

fn empty_index() -> FlatVectorIndex {
    FlatVectorIndex::from_items(DistanceMetric::Cosine, 2, vec![])
        .expect("an empty index is valid")
}

pub type TestService<V> = Service<V, FakeEmbeddingClient, FakeChatClient, FakeNutritionExtractor>;

pub fn service_with<V: VectorIndex>(index: V, embedding: FakeEmbeddingClient) -> TestService<V> {
    Service::new(
        Arc::new(index),
        embedding,
        FakeChatClient::new(vec![]),
        FakeNutritionExtractor::returning(Ok(ExtractedMeal::default())),
        ChatConfig::default(),
        SearchConfig::default(),
        UploadConfig::default(),
    )
}

pub fn chat_service_with(client: FakeChatClient) -> TestService<FlatVectorIndex> {
    Service::new(
        Arc::new(empty_index()),
        FakeEmbeddingClient::failing(),
        client,
        FakeNutritionExtractor::returning(Ok(ExtractedMeal::default())),
        ChatConfig::default(),
        SearchConfig::default(),
        UploadConfig::default(),
    )
}

pub fn meal_service_with(
    extractor: FakeNutritionExtractor,
    upload_directory: &Path,
) -> TestService<FlatVectorIndex> {
    Service::new(
        Arc::new(empty_index()),
        FakeEmbeddingClient::failing(),
        FakeChatClient::new(vec![]),
        extractor,
        ChatConfig::default(),
        SearchConfig::default(),
        UploadConfig {
            directory: upload_directory.to_path_buf(),
            ..UploadConfig::default()
        },
    )
}
