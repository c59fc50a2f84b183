//! Integration tests for resolution sessions.
//!
//! These tests drive the resolve-configuration handler end to end against the
//! mock rule engine, using engine responses decoded from the engine's JSON wire
//! format:
//! 1. Multi-round resolution with typed questions
//! 2. Fatal failures leave the document at the engine's last output
//! 3. Rejected answers are asked again
//! 4. Restarting a failed session from its last document

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use saas_configurator::adapters::{
    MockConfigurationEngine, PromptAnswerSource, ScriptedAnswerSource,
};
use saas_configurator::application::{
    ResolveConfigurationCommand, ResolveConfigurationHandler, ResolverSettings,
};
use saas_configurator::domain::foundation::ResolutionStatus;
use saas_configurator::domain::resolver::{
    Answer, ModelTarget, NumericRange, ResolutionSession, ResolverError, RoundStage, TypeInfo,
};
use saas_configurator::ports::{
    AnswerError, AnswerRequest, AnswerSource, EngineError, EngineResponse,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn target() -> ModelTarget {
    ModelTarget::new(
        "Configuration/apps/cluster-config-demo/1.0.0",
        "demo.config.configureKafkaCluster",
    )
    .unwrap()
}

fn skeleton() -> Value {
    json!({ "customer": {}, "configuration": {} })
}

/// Decodes an engine response from its wire form.
fn wire(response: Value) -> EngineResponse {
    serde_json::from_value(response).unwrap()
}

fn settings() -> ResolverSettings {
    ResolverSettings::default()
}

/// Answer source that never answers in time.
struct SlowAnswerSource(Duration);

#[async_trait]
impl AnswerSource for SlowAnswerSource {
    async fn answer(&self, _request: &AnswerRequest) -> Result<Answer, AnswerError> {
        tokio::time::sleep(self.0).await;
        Ok(Answer::new("late"))
    }
}

// =============================================================================
// Multi-round resolution
// =============================================================================

#[tokio::test]
async fn two_round_resolution_fills_missing_region() {
    let engine = Arc::new(
        MockConfigurationEngine::new()
            .with_response(wire(json!({
                "output": { "customer": {}, "configuration": {} },
                "missingData": [{
                    "target": "customer",
                    "member": "region",
                    "memberType": "Text",
                    "details": { "question": "Region?" }
                }]
            })))
            .with_response(wire(json!({
                "output": { "customer": { "region": "us-east-1" }, "configuration": {} },
                "missingData": []
            }))),
    );
    let answers = Arc::new(ScriptedAnswerSource::new().with_answer("customer.region", "us-east-1"));
    let handler = ResolveConfigurationHandler::new(engine.clone(), answers.clone(), settings());

    let mut session = ResolutionSession::new(target(), "en", skeleton());
    let resolution = handler.run(&mut session).await.unwrap();

    assert_eq!(session.status(), ResolutionStatus::Resolved);
    assert_eq!(resolution.document["customer"]["region"], json!("us-east-1"));
    assert_eq!(resolution.rounds, 2);

    let asked = answers.asked();
    assert_eq!(asked.len(), 1);
    assert_eq!(asked[0].question.path, "customer.region");
    assert_eq!(asked[0].question.type_info, TypeInfo::text());

    let calls = engine.get_calls();
    assert_eq!(calls[0].document, skeleton());
    assert_eq!(calls[1].document["customer"]["region"], json!("us-east-1"));
    assert_eq!(calls[1].lang, "en");
}

#[tokio::test]
async fn typed_answers_are_coerced_before_resubmission() {
    let engine = Arc::new(MockConfigurationEngine::new().with_response(wire(json!({
        "output": skeleton(),
        "missingData": [
            {
                "target": "configuration",
                "member": "brokerCount",
                "memberType": "Integer",
                "details": {
                    "question": "How many brokers?",
                    "restriction": {
                        "type": "numeric",
                        "underlying": "Integer",
                        "min": { "bound": 1 },
                        "max": { "bound": 10 }
                    }
                }
            },
            {
                "target": "configuration",
                "member": "tls",
                "memberType": "Boolean",
                "details": { "question": "Enable TLS?" }
            }
        ]
    }))));
    let answers = Arc::new(
        ScriptedAnswerSource::new()
            .with_answer("configuration.brokerCount", "7")
            .with_answer("configuration.tls", "Yes"),
    );
    let handler = ResolveConfigurationHandler::new(engine.clone(), answers.clone(), settings());

    let resolution = handler
        .handle(ResolveConfigurationCommand {
            target: target(),
            lang: "en".to_string(),
            document: skeleton(),
        })
        .await
        .unwrap();

    assert_eq!(
        resolution.document["configuration"],
        json!({ "brokerCount": 7, "tls": true })
    );

    let asked = answers.asked();
    assert_eq!(
        asked[0].question.type_info,
        TypeInfo::NumberType {
            range: Some(NumericRange {
                min: Some("1".to_string()),
                max: Some("10".to_string()),
                step: Some("1".to_string()),
            })
        }
    );
    assert_eq!(asked[1].question.type_info, TypeInfo::BooleanType);
}

#[tokio::test]
async fn ambiguous_collection_is_resolved_by_choosing_element_type() {
    let engine = Arc::new(MockConfigurationEngine::new().with_response(wire(json!({
        "output": skeleton(),
        "missingData": [{
            "target": "configuration",
            "member": "nodes",
            "memberType": "List[demo.config.Node]",
            "details": {
                "question": "Which nodes?",
                "collection": {
                    "min": 1,
                    "max": 5,
                    "possibleElementTypes": ["demo.config.Broker", "demo.config.Zookeeper"]
                }
            }
        }]
    }))));
    let answers = Arc::new(
        ScriptedAnswerSource::new()
            .with_answer("configuration.nodes", "2")
            .with_answer(
                "configuration.nodes",
                Answer::new("2").with_element_type("Zookeeper"),
            ),
    );
    let handler = ResolveConfigurationHandler::new(engine.clone(), answers.clone(), settings());

    let mut session = ResolutionSession::new(target(), "en", skeleton());
    handler.run(&mut session).await.unwrap();

    let submitted = &engine.get_calls()[1].document;
    assert_eq!(
        submitted["configuration"]["nodes"],
        json!([
            { "LGType_": "demo.config.Zookeeper" },
            { "LGType_": "demo.config.Zookeeper" }
        ])
    );

    let asked = answers.asked();
    assert_eq!(asked.len(), 2);
    assert!(asked[1].is_retry());
    assert!(asked[1]
        .previous_error
        .as_deref()
        .unwrap()
        .contains("demo.config.Broker"));
}

#[tokio::test]
async fn prompt_answers_drive_a_session() {
    let engine = Arc::new(MockConfigurationEngine::new().with_response(wire(json!({
        "output": skeleton(),
        "missingData": [{
            "target": "customer",
            "member": "provider",
            "memberType": "Text",
            "details": {
                "question": "Cloud provider?",
                "restriction": {
                    "type": "enum",
                    "possibleValues": [
                        { "v": "aws", "l": "Amazon Web Services" },
                        { "v": "gcp", "l": "Google Cloud" }
                    ]
                }
            }
        }]
    }))));
    let input: &[u8] = b"google cloud\n";
    let prompt = Arc::new(PromptAnswerSource::new(input, Vec::new()));
    let handler = ResolveConfigurationHandler::new(engine, prompt.clone(), settings());

    let mut session = ResolutionSession::new(target(), "en", skeleton());
    let resolution = handler.run(&mut session).await.unwrap();
    assert_eq!(resolution.document["customer"]["provider"], json!("gcp"));

    drop(handler);
    let (_, written) = Arc::try_unwrap(prompt).ok().unwrap().into_parts();
    let transcript = String::from_utf8(written).unwrap();
    assert!(transcript.contains("Cloud provider?"));
    assert!(transcript.contains("gcp = Google Cloud"));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn nonexistent_target_fails_and_leaves_document_unmodified() {
    let output = json!({ "customer": { "LGType_": "demo.config.CustomerRequest" }, "configuration": {} });
    let engine = Arc::new(MockConfigurationEngine::new().with_response(wire(json!({
        "output": output,
        "missingData": [
            {
                "target": "customer",
                "member": "region",
                "memberType": "Text",
                "details": { "question": "Region?" }
            },
            {
                "target": "nonexistent",
                "member": "size",
                "memberType": "Integer",
                "details": { "question": "Size?" }
            }
        ]
    }))));
    let answers = Arc::new(ScriptedAnswerSource::new().with_fallback("eu-west-1").with_fallback("3"));
    let handler = ResolveConfigurationHandler::new(engine.clone(), answers, settings());

    let mut session = ResolutionSession::new(target(), "en", skeleton());
    let err = handler.run(&mut session).await.unwrap_err();

    assert!(matches!(
        err,
        ResolverError::PathResolution { ref path, round: Some(1), .. } if path == "nonexistent"
    ));
    assert_eq!(session.status(), ResolutionStatus::Failed);
    assert_eq!(session.document(), &output);
    assert_eq!(session.failure(), Some(&err));
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn descriptor_without_member_fails_the_round_by_name() {
    let output = json!({ "customer": {}, "configuration": {} });
    let response = wire(json!({
        "output": output,
        "missingData": [{
            "target": "customer",
            "memberType": "Text",
            "details": { "question": "Region?" }
        }]
    }));
    assert_eq!(response.missing_data.len(), 1);

    let engine = Arc::new(MockConfigurationEngine::new().with_response(response));
    let answers = Arc::new(ScriptedAnswerSource::new().with_fallback("eu-west-1"));
    let handler = ResolveConfigurationHandler::new(engine.clone(), answers.clone(), settings());

    let mut session = ResolutionSession::new(target(), "en", skeleton());
    let err = handler.run(&mut session).await.unwrap_err();

    match &err {
        ResolverError::DescriptorMapping { round, reason, descriptor, .. } => {
            assert_eq!(*round, Some(1));
            assert_eq!(reason, "descriptor has no member");
            assert_eq!(descriptor.target, "customer");
        }
        other => panic!("expected DescriptorMapping, got {:?}", other),
    }
    assert!(answers.asked().is_empty());
    assert_eq!(session.status(), ResolutionStatus::Failed);
    assert_eq!(session.document(), &output);
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn unavailable_engine_is_reported_before_any_round() {
    let engine = Arc::new(MockConfigurationEngine::new().with_availability(false));
    let handler = ResolveConfigurationHandler::new(
        engine.clone(),
        Arc::new(ScriptedAnswerSource::new()),
        settings(),
    );

    let mut session = ResolutionSession::new(target(), "en", skeleton());
    let err = handler.run(&mut session).await.unwrap_err();

    assert_eq!(err, ResolverError::EngineUnavailable);
    assert_eq!(session.round(), 0);
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn engine_that_never_converges_hits_round_ceiling() {
    let missing = json!({
        "output": skeleton(),
        "missingData": [{
            "target": "customer",
            "member": "region",
            "memberType": "Text",
            "details": { "question": "Region?", "defaultValue": "eu-west-1" }
        }]
    });
    let mut engine = MockConfigurationEngine::new();
    for _ in 0..4 {
        engine = engine.with_response(wire(missing.clone()));
    }
    let engine = Arc::new(engine);
    let handler = ResolveConfigurationHandler::new(
        engine.clone(),
        Arc::new(ScriptedAnswerSource::new()),
        ResolverSettings {
            max_rounds: 4,
            ..settings()
        },
    );

    let mut session = ResolutionSession::new(target(), "en", skeleton());
    let err = handler.run(&mut session).await.unwrap_err();

    assert_eq!(err, ResolverError::NonConvergence { max_rounds: 4 });
    assert_eq!(engine.call_count(), 4);
    assert_eq!(session.history().len(), 4);
}

#[tokio::test]
async fn slow_answer_source_trips_round_deadline() {
    let engine = Arc::new(MockConfigurationEngine::new().with_response(wire(json!({
        "output": skeleton(),
        "missingData": [{
            "target": "customer",
            "member": "region",
            "memberType": "Text",
            "details": { "question": "Region?" }
        }]
    }))));
    let handler = ResolveConfigurationHandler::new(
        engine,
        Arc::new(SlowAnswerSource(Duration::from_secs(5))),
        ResolverSettings {
            round_timeout: Some(Duration::from_millis(50)),
            ..settings()
        },
    );

    let mut session = ResolutionSession::new(target(), "en", skeleton());
    let err = handler.run(&mut session).await.unwrap_err();

    assert_eq!(
        err,
        ResolverError::RoundDeadlineExceeded {
            round: 1,
            stage: RoundStage::Answer
        }
    );
    assert_eq!(session.document(), &skeleton());
}

// =============================================================================
// Restart
// =============================================================================

#[tokio::test]
async fn failed_session_restarts_from_last_document() {
    let engine = Arc::new(
        MockConfigurationEngine::new()
            .with_response(wire(json!({
                "output": { "customer": { "region": "eu-west-1" }, "configuration": {} },
                "missingData": [{
                    "target": "configuration",
                    "member": "brokers",
                    "memberType": "Integer",
                    "details": { "question": "Brokers?" }
                }]
            })))
            .with_error(EngineError::Status {
                status: 500,
                body: "rule evaluation failed".to_string(),
            }),
    );
    let answers = Arc::new(ScriptedAnswerSource::new().with_answer("configuration.brokers", "3"));
    let handler = ResolveConfigurationHandler::new(engine.clone(), answers, settings());

    let mut first = ResolutionSession::new(target(), "en", skeleton());
    let err = handler.run(&mut first).await.unwrap_err();
    assert!(matches!(
        err,
        ResolverError::EngineRequestFailed { round: 2, status: Some(500), .. }
    ));
    assert_eq!(first.document()["customer"]["region"], json!("eu-west-1"));

    let mut retry = first.restart();
    assert_ne!(retry.id(), first.id());
    assert_eq!(retry.round(), 0);
    let resolution = handler.run(&mut retry).await.unwrap();

    assert_eq!(resolution.session_id, retry.id());
    assert_eq!(resolution.document["customer"]["region"], json!("eu-west-1"));
    assert_eq!(engine.get_calls()[2].document, *first.document());
}
