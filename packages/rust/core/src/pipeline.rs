//! End-to-end pipelines.
//!
//! - `export`: CSV → normalize → group → two JSON documents on disk
//! - `push`: CSV → normalize → group → (optional delete) → remote create

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info, instrument};

use kbsync_ingest::{NormalizeOptions, load_intents, load_records};
use kbsync_remote::{
    RemoteClient, RemoteItem, SubjectFilter, SyncReport, entity_payload, intent_payload,
};
use kbsync_shared::{
    AnswerRecord, EntityRecord, IntentRecord, KbSyncError, RecordKind, Result, UnderstandingRecord,
};

use crate::emit::{self, RunStamp};
use crate::grouper::build_understandings;

/// Creation order: intents reference entities, so entities go first.
const CREATE_ORDER: [RecordKind; 2] = [RecordKind::Entities, RecordKind::Intents];

/// Deletion order: the reverse, so no entity is still referenced when removed.
const DELETE_ORDER: [RecordKind; 2] = [RecordKind::Intents, RecordKind::Entities];

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Locations of the three source sheets.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub intents: PathBuf,
    pub entities: PathBuf,
    pub answers: PathBuf,
}

impl InputPaths {
    /// `Intents.csv`, `Entities.csv` and `Answers.csv` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            intents: dir.join("Intents.csv"),
            entities: dir.join("Entities.csv"),
            answers: dir.join("Answers.csv"),
        }
    }
}

/// Every normalized record from one set of sheets.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    pub intents: Vec<IntentRecord>,
    pub entities: Vec<EntityRecord>,
    /// `Answers.csv` rows followed by any inline answers from the intents sheet.
    pub answers: Vec<AnswerRecord>,
}

impl KnowledgeBase {
    /// One understanding per answered topic.
    pub fn understandings(&self, stamp: &RunStamp) -> Vec<UnderstandingRecord> {
        build_understandings(&self.intents, &self.answers, stamp)
    }
}

/// Read, parse and normalize all three sheets.
#[instrument(skip_all, fields(intents = %inputs.intents.display()))]
pub fn load_knowledge_base(inputs: &InputPaths, opts: &NormalizeOptions) -> Result<KnowledgeBase> {
    let intents_csv = read_sheet(&inputs.intents)?;
    let entities_csv = read_sheet(&inputs.entities)?;
    let answers_csv = read_sheet(&inputs.answers)?;

    let sheet = load_intents(&intents_csv, opts).map_err(|e| in_file(e, &inputs.intents))?;
    let entities: Vec<EntityRecord> =
        load_records(&entities_csv, opts).map_err(|e| in_file(e, &inputs.entities))?;
    let mut answers: Vec<AnswerRecord> =
        load_records(&answers_csv, opts).map_err(|e| in_file(e, &inputs.answers))?;
    answers.extend(sheet.inline_answers);

    info!(
        intents = sheet.intents.len(),
        entities = entities.len(),
        answers = answers.len(),
        "loaded knowledge base"
    );

    Ok(KnowledgeBase {
        intents: sheet.intents,
        entities,
        answers,
    })
}

fn read_sheet(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| KbSyncError::io(path, e))
}

/// Prefix parse errors with the sheet they came from.
fn in_file(err: KbSyncError, path: &Path) -> KbSyncError {
    match err {
        KbSyncError::Parse { message } => {
            KbSyncError::parse(format!("{}: {message}", path.display()))
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Driver states, in the order a push walks through them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Deleting(RecordKind),
    Deleted,
    Importing(RecordKind),
    Imported,
    Writing,
    Done,
    Failed(String),
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading spreadsheets"),
            Self::Deleting(kind) => write!(f, "Deleting remote {kind}"),
            Self::Deleted => f.write_str("Deletion complete"),
            Self::Importing(kind) => write!(f, "Importing {kind}"),
            Self::Imported => f.write_str("Import complete"),
            Self::Writing => f.write_str("Writing documents"),
            Self::Done => f.write_str("Done"),
            Self::Failed(err) => write!(f, "Failed: {err}"),
        }
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called on every stage transition.
    fn stage(&self, stage: &Stage);
    /// Called when a remote batch finishes.
    fn batch_finished(&self, report: &SyncReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _stage: &Stage) {}
    fn batch_finished(&self, _report: &SyncReport) {}
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Configuration for the `export` pipeline.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub inputs: InputPaths,
    pub output_dir: PathBuf,
    pub normalize: NormalizeOptions,
    pub messaging_service: String,
}

/// Result of the `export` pipeline.
#[derive(Debug)]
pub struct ExportResult {
    pub entities_path: PathBuf,
    pub understandings_path: PathBuf,
    pub entity_count: usize,
    pub understanding_count: usize,
    pub elapsed: std::time::Duration,
}

/// Run the file-mode pipeline.
#[instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
pub fn export(config: &ExportConfig, progress: &dyn ProgressReporter) -> Result<ExportResult> {
    let result = run_export(config, progress);
    report_outcome(&result, progress);
    result
}

fn run_export(config: &ExportConfig, progress: &dyn ProgressReporter) -> Result<ExportResult> {
    let start = Instant::now();
    let stamp = RunStamp::now(&config.messaging_service);

    enter(progress, Stage::Loading);
    let kb = load_knowledge_base(&config.inputs, &config.normalize)?;

    enter(progress, Stage::Writing);
    let entities = emit::build_entities(&kb.entities, &stamp);
    let understandings = kb.understandings(&stamp);
    let written = emit::write_documents(&config.output_dir, &stamp, &entities, &understandings)?;

    let result = ExportResult {
        entities_path: written.entities_path,
        understandings_path: written.understandings_path,
        entity_count: entities.len(),
        understanding_count: understandings.len(),
        elapsed: start.elapsed(),
    };

    info!(
        entities = result.entity_count,
        understandings = result.understanding_count,
        elapsed_ms = result.elapsed.as_millis(),
        "export complete"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Push
// ---------------------------------------------------------------------------

/// Configuration for the `push` pipeline.
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub inputs: InputPaths,
    pub normalize: NormalizeOptions,
    pub messaging_service: String,
    /// Records to delete before importing; `None` skips deletion.
    pub subject: Option<SubjectFilter>,
}

/// Result of the `push` pipeline.
#[derive(Debug)]
pub struct PushResult {
    /// One report per deleted kind, in deletion order.
    pub deletions: Vec<SyncReport>,
    /// One report per created kind, in creation order.
    pub creations: Vec<SyncReport>,
    pub elapsed: std::time::Duration,
}

impl PushResult {
    /// Total per-item failures across all batches.
    pub fn failure_count(&self) -> usize {
        self.deletions
            .iter()
            .chain(&self.creations)
            .map(|r| r.failed.len())
            .sum()
    }
}

/// Run the API-mode pipeline.
///
/// 1. Load and normalize all sheets (any failure aborts before remote calls)
/// 2. Delete matching remote intents, then entities (if a subject is set)
/// 3. Create entities, then intents
///
/// Kinds run strictly one after another; items within a kind run with
/// bounded concurrency. Per-item failures are reported, not raised.
#[instrument(skip_all, fields(environment = %client.config().environment))]
pub async fn push(
    config: &PushConfig,
    client: &RemoteClient,
    progress: &dyn ProgressReporter,
) -> Result<PushResult> {
    let result = run_push(config, client, progress).await;
    report_outcome(&result, progress);
    result
}

async fn run_push(
    config: &PushConfig,
    client: &RemoteClient,
    progress: &dyn ProgressReporter,
) -> Result<PushResult> {
    let start = Instant::now();
    let stamp = RunStamp::now(&config.messaging_service);

    enter(progress, Stage::Loading);
    let kb = load_knowledge_base(&config.inputs, &config.normalize)?;
    let understandings = kb.understandings(&stamp);

    let mut pending_entities = kb
        .entities
        .iter()
        .map(|e| RemoteItem::new(e.name.clone(), &entity_payload(e)))
        .collect::<Result<Vec<_>>>()?;
    let mut pending_intents = understandings
        .iter()
        .map(|u| RemoteItem::new(u.topic.clone(), &intent_payload(u)))
        .collect::<Result<Vec<_>>>()?;

    let mut deletions = Vec::new();
    if let Some(filter) = &config.subject {
        for kind in DELETE_ORDER {
            enter(progress, Stage::Deleting(kind));
            let report = client.delete_all(kind, filter).await?;
            progress.batch_finished(&report);
            deletions.push(report);
        }
        enter(progress, Stage::Deleted);
    }

    let mut creations = Vec::new();
    for kind in CREATE_ORDER {
        enter(progress, Stage::Importing(kind));
        let items = match kind {
            RecordKind::Entities => std::mem::take(&mut pending_entities),
            RecordKind::Intents => std::mem::take(&mut pending_intents),
        };
        let report = client.create_all(kind, items).await;
        progress.batch_finished(&report);
        creations.push(report);
    }
    enter(progress, Stage::Imported);

    let result = PushResult {
        deletions,
        creations,
        elapsed: start.elapsed(),
    };

    info!(
        failures = result.failure_count(),
        elapsed_ms = result.elapsed.as_millis(),
        "push complete"
    );

    Ok(result)
}

/// Log a stage transition and forward it to the reporter.
fn enter(progress: &dyn ProgressReporter, stage: Stage) {
    info!(%stage, "pipeline stage");
    progress.stage(&stage);
}

/// Every error that escapes a driver has aborted it, so it must be fatal;
/// per-item remote failures stay inside a [`SyncReport`].
fn report_outcome<T>(result: &Result<T>, progress: &dyn ProgressReporter) {
    match result {
        Ok(_) => enter(progress, Stage::Done),
        Err(e) => {
            debug_assert!(e.is_fatal(), "non-fatal error aborted the run: {e}");
            error!(error = %e, "run aborted");
            enter(progress, Stage::Failed(e.to_string()));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use kbsync_shared::{AppConfig, RemoteConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FIXTURES: &str = "../../../fixtures/csv";

    /// Records every stage transition for assertions.
    #[derive(Default)]
    struct RecordingProgress {
        stages: Mutex<Vec<Stage>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn stage(&self, stage: &Stage) {
            self.stages.lock().unwrap().push(stage.clone());
        }
        fn batch_finished(&self, _report: &SyncReport) {}
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("kbsync-pipeline-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_sheets(dir: &Path, intents: &str, entities: &str, answers: &str) -> InputPaths {
        let inputs = InputPaths::in_dir(dir);
        std::fs::write(&inputs.intents, intents).unwrap();
        std::fs::write(&inputs.entities, entities).unwrap();
        std::fs::write(&inputs.answers, answers).unwrap();
        inputs
    }

    fn client_for(server: &MockServer) -> RemoteClient {
        let mut app = AppConfig::default();
        app.environments.get_mut("dev").unwrap().base_url = server.uri();
        RemoteClient::new(RemoteConfig::with_token(&app, "dev", "test-token").unwrap()).unwrap()
    }

    async fn mount_create(server: &MockServer, kind: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/{kind}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "new" })),
            )
            .mount(server)
            .await;
    }

    async fn mount_listing(server: &MockServer, kind: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{kind}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[test]
    fn load_fixture_knowledge_base() {
        let kb = load_knowledge_base(
            &InputPaths::in_dir(Path::new(FIXTURES)),
            &NormalizeOptions::default(),
        )
        .unwrap();

        assert_eq!(kb.intents.len(), 5);
        assert_eq!(kb.entities.len(), 2);
        assert_eq!(kb.answers.len(), 4);

        let understandings = kb.understandings(&RunStamp::now("georgia"));
        let topics: Vec<&str> = understandings.iter().map(|u| u.topic.as_str()).collect();
        assert_eq!(topics, vec!["greeting", "/billing/refund", "/shipping/track"]);
        assert_eq!(understandings[0].question_groups.len(), 2);
        assert_eq!(understandings[0].answer_groups[0].answers, vec!["Hello there!"]);
    }

    #[test]
    fn missing_sheet_is_io_error() {
        let dir = temp_dir();
        let result = load_knowledge_base(&InputPaths::in_dir(&dir), &NormalizeOptions::default());
        assert!(matches!(result, Err(KbSyncError::Io { .. })));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_answers_win_over_inline_answers() {
        let dir = temp_dir();
        let inputs = write_sheets(
            &dir,
            ",Hi,,Greeting,,,,,Inline!,,\n,Bye,,Farewell,,,,,See you,,\n",
            "",
            "greeting,File!\n",
        );
        let opts = NormalizeOptions {
            extended_intents: true,
            ..NormalizeOptions::default()
        };

        let kb = load_knowledge_base(&inputs, &opts).unwrap();
        assert_eq!(kb.answers.len(), 3);
        assert_eq!(kb.answers[0].answer, "File!");

        let understandings = kb.understandings(&RunStamp::now("georgia"));
        assert_eq!(understandings.len(), 2);
        assert_eq!(understandings[0].topic, "greeting");
        assert_eq!(understandings[0].answer_groups[0].answers, vec!["File!"]);
        assert_eq!(understandings[1].topic, "farewell");
        assert_eq!(understandings[1].answer_groups[0].answers, vec!["See you"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn parse_error_names_the_sheet() {
        let dir = temp_dir();
        let inputs = write_sheets(&dir, ",Hi,,greeting,,\n", "@a,b\n", "greeting,\"oops\n");
        let err = load_knowledge_base(&inputs, &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, KbSyncError::Parse { .. }));
        assert!(err.to_string().contains("Answers.csv"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_writes_greeting_scenario() {
        let dir = temp_dir();
        let inputs = write_sheets(
            &dir,
            ",Hi,Hello;Hey,Greeting,,\n",
            "@colour,red;crimson\n",
            "Greeting,Hello there!\n",
        );
        let config = ExportConfig {
            inputs,
            output_dir: dir.join("out"),
            normalize: NormalizeOptions::default(),
            messaging_service: "georgia".into(),
        };
        let progress = RecordingProgress::default();

        let result = export(&config, &progress).unwrap();
        assert_eq!(result.entity_count, 1);
        assert_eq!(result.understanding_count, 1);

        let content = std::fs::read_to_string(&result.understandings_path).unwrap();
        let parsed: Vec<UnderstandingRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].topic, "greeting");
        assert_eq!(parsed[0].question_groups.len(), 1);
        assert_eq!(
            parsed[0].question_groups[0].fuzzy_questions,
            vec!["Hi", "Hello", "Hey"]
        );
        assert_eq!(parsed[0].answer_groups[0].answers, vec!["Hello there!"]);

        let stages = progress.stages.lock().unwrap();
        assert_eq!(stages.last(), Some(&Stage::Done));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_derives_contexts_when_enabled() {
        let dir = temp_dir();
        let inputs = write_sheets(&dir, ",Start,,/a/b/c,,\n", "", "/a/b/c,Started\n");
        let config = ExportConfig {
            inputs,
            output_dir: dir.join("out"),
            normalize: NormalizeOptions {
                derive_contexts: true,
                ..NormalizeOptions::default()
            },
            messaging_service: "georgia".into(),
        };

        let result = export(&config, &SilentProgress).unwrap();
        let content = std::fs::read_to_string(&result.understandings_path).unwrap();
        let parsed: Vec<UnderstandingRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0].output_contexts, vec!["/a/b", "/a/b/c"]);
        assert_eq!(parsed[0].question_groups[0].input_contexts, vec!["/a"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_failure_reports_failed_stage() {
        let dir = temp_dir();
        let config = ExportConfig {
            inputs: InputPaths::in_dir(&dir.join("missing")),
            output_dir: dir.join("out"),
            normalize: NormalizeOptions::default(),
            messaging_service: "georgia".into(),
        };
        let progress = RecordingProgress::default();

        assert!(export(&config, &progress).is_err());
        let stages = progress.stages.lock().unwrap();
        assert!(matches!(stages.last(), Some(Stage::Failed(_))));
        assert!(!dir.join("out").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn push_deletes_in_reverse_dependency_order() {
        let server = MockServer::start().await;

        mount_listing(
            &server,
            "intents",
            serde_json::json!([
                { "id": "i1", "name": "/billing/refund" },
                { "id": "i2", "name": "/shipping/track" }
            ]),
        )
        .await;
        mount_listing(
            &server,
            "entities",
            serde_json::json!([
                { "id": "e1", "name": "billing-plan" },
                { "id": "e2", "name": "colour" }
            ]),
        )
        .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        mount_create(&server, "entities").await;
        mount_create(&server, "intents").await;

        let config = PushConfig {
            inputs: InputPaths::in_dir(Path::new(FIXTURES)),
            normalize: NormalizeOptions::default(),
            messaging_service: "georgia".into(),
            subject: Some(SubjectFilter::parse("billing")),
        };
        let progress = RecordingProgress::default();
        let result = push(&config, &client_for(&server), &progress).await.unwrap();

        assert_eq!(result.deletions.len(), 2);
        assert_eq!(result.deletions[0].kind, RecordKind::Intents);
        assert_eq!(result.deletions[0].succeeded, 1);
        assert_eq!(result.deletions[1].kind, RecordKind::Entities);
        assert_eq!(result.deletions[1].succeeded, 1);

        assert_eq!(result.creations[0].kind, RecordKind::Entities);
        assert_eq!(result.creations[0].succeeded, 2);
        assert_eq!(result.creations[1].kind, RecordKind::Intents);
        assert_eq!(result.creations[1].succeeded, 3);
        assert_eq!(result.failure_count(), 0);

        // Every call of one kind finishes before the next kind starts.
        let requests = server.received_requests().await.unwrap();
        let order: Vec<String> = requests
            .iter()
            .filter(|r| r.method.as_str() != "GET")
            .map(|r| format!("{} {}", r.method, r.url.path()))
            .collect();
        assert_eq!(
            order,
            vec![
                "DELETE /intents/i1",
                "DELETE /entities/e1",
                "POST /entities",
                "POST /entities",
                "POST /intents",
                "POST /intents",
                "POST /intents",
            ]
        );

        let stages = progress.stages.lock().unwrap();
        assert_eq!(
            *stages,
            vec![
                Stage::Loading,
                Stage::Deleting(RecordKind::Intents),
                Stage::Deleting(RecordKind::Entities),
                Stage::Deleted,
                Stage::Importing(RecordKind::Entities),
                Stage::Importing(RecordKind::Intents),
                Stage::Imported,
                Stage::Done,
            ]
        );
    }

    #[tokio::test]
    async fn push_without_subject_skips_deletion() {
        let server = MockServer::start().await;
        mount_create(&server, "entities").await;
        mount_create(&server, "intents").await;

        let config = PushConfig {
            inputs: InputPaths::in_dir(Path::new(FIXTURES)),
            normalize: NormalizeOptions::default(),
            messaging_service: "georgia".into(),
            subject: None,
        };
        let result = push(&config, &client_for(&server), &SilentProgress).await.unwrap();

        assert!(result.deletions.is_empty());
        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| r.method.as_str() == "POST"));
    }

    #[tokio::test]
    async fn push_tolerates_per_item_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/entities"))
            .respond_with(ResponseTemplate::new(500).set_body_string("unavailable"))
            .mount(&server)
            .await;
        mount_create(&server, "intents").await;

        let config = PushConfig {
            inputs: InputPaths::in_dir(Path::new(FIXTURES)),
            normalize: NormalizeOptions::default(),
            messaging_service: "georgia".into(),
            subject: None,
        };
        let result = push(&config, &client_for(&server), &SilentProgress).await.unwrap();

        assert_eq!(result.creations[0].failed.len(), 2);
        assert_eq!(result.creations[1].succeeded, 3);
        assert_eq!(result.failure_count(), 2);
    }

    #[tokio::test]
    async fn push_aborts_on_bad_csv_before_remote_calls() {
        let server = MockServer::start().await;
        let dir = temp_dir();
        let inputs = write_sheets(&dir, ",Hi,\"broken,greeting,,\n", "", "");

        let config = PushConfig {
            inputs,
            normalize: NormalizeOptions::default(),
            messaging_service: "georgia".into(),
            subject: Some(SubjectFilter::All),
        };
        let progress = RecordingProgress::default();
        let err = push(&config, &client_for(&server), &progress).await.unwrap_err();

        assert!(err.is_fatal());
        assert!(server.received_requests().await.unwrap().is_empty());
        assert!(matches!(
            progress.stages.lock().unwrap().last(),
            Some(Stage::Failed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn push_aborts_when_listing_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/intents"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let config = PushConfig {
            inputs: InputPaths::in_dir(Path::new(FIXTURES)),
            normalize: NormalizeOptions::default(),
            messaging_service: "georgia".into(),
            subject: Some(SubjectFilter::All),
        };
        let progress = RecordingProgress::default();
        let err = push(&config, &client_for(&server), &progress)
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(
            err,
            KbSyncError::Listing {
                kind: RecordKind::Intents,
                ..
            }
        ));
        assert!(matches!(
            progress.stages.lock().unwrap().last(),
            Some(Stage::Failed(_))
        ));
        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| r.method.as_str() == "GET"));
    }
}
