//! Request bodies for the platform's `intents` and `entities` endpoints.

use kbsync_shared::{EntityRecord, UnderstandingRecord};
use serde::Serialize;

/// How many turns an output context stays active after its intent matches.
const CONTEXT_LIFESPAN: u32 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct EntityPayload {
    pub name: String,
    pub entries: Vec<EntityEntry>,
}

/// One reference value and its synonyms.
#[derive(Debug, Clone, Serialize)]
pub struct EntityEntry {
    pub value: String,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentPayload {
    pub name: String,
    pub auto: bool,
    /// Input contexts.
    pub contexts: Vec<String>,
    pub user_says: Vec<UserSays>,
    pub responses: Vec<IntentResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSays {
    pub data: Vec<UserSaysPart>,
    pub is_template: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSaysPart {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub reset_contexts: bool,
    pub affected_contexts: Vec<AffectedContext>,
    pub speech: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AffectedContext {
    pub name: String,
    pub lifespan: u32,
}

/// Entity body: the first synonym doubles as the reference value.
pub fn entity_payload(entity: &EntityRecord) -> EntityPayload {
    EntityPayload {
        name: entity.name.clone(),
        entries: vec![EntityEntry {
            value: entity.synonyms.first().cloned().unwrap_or_default(),
            synonyms: entity.synonyms.clone(),
        }],
    }
}

/// Intent body for one understanding, named after its topic.
pub fn intent_payload(understanding: &UnderstandingRecord) -> IntentPayload {
    let user_says = understanding
        .all_questions()
        .map(|q| UserSays {
            data: vec![UserSaysPart {
                text: q.to_string(),
            }],
            is_template: false,
        })
        .collect();

    let speech = understanding
        .answer_groups
        .iter()
        .flat_map(|g| g.answers.iter().cloned())
        .collect();

    let affected_contexts = understanding
        .output_contexts
        .iter()
        .map(|name| AffectedContext {
            name: name.clone(),
            lifespan: CONTEXT_LIFESPAN,
        })
        .collect();

    IntentPayload {
        name: understanding.topic.clone(),
        auto: true,
        contexts: understanding.input_contexts(),
        user_says,
        responses: vec![IntentResponse {
            reset_contexts: false,
            affected_contexts,
            speech,
        }],
    }
}
