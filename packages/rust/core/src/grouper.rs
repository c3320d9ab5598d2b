//! Topic grouper.
//!
//! Joins every intent row of a topic with that topic's answer into one
//! [`UnderstandingRecord`]. Topics without an answer are not publishable and
//! produce nothing.

use std::collections::HashMap;

use tracing::{debug, instrument};

use kbsync_shared::{AnswerGroup, AnswerRecord, IntentRecord, QuestionGroup, UnderstandingRecord};

use crate::emit::RunStamp;

/// Intent rows sharing one topic, in file order.
#[derive(Debug, Clone)]
pub struct TopicGroup<'a> {
    pub topic: &'a str,
    pub intents: Vec<&'a IntentRecord>,
}

/// Group intents by topic, ordered by each topic's first appearance.
pub fn group_by_topic(intents: &[IntentRecord]) -> Vec<TopicGroup<'_>> {
    let mut groups: Vec<TopicGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for intent in intents {
        match index.get(intent.topic.as_str()) {
            Some(&i) => groups[i].intents.push(intent),
            None => {
                index.insert(&intent.topic, groups.len());
                groups.push(TopicGroup {
                    topic: &intent.topic,
                    intents: vec![intent],
                });
            }
        }
    }

    groups
}

/// Topic → answer lookup. The first answer in file order wins.
pub fn answer_index(answers: &[AnswerRecord]) -> HashMap<&str, &AnswerRecord> {
    let mut index = HashMap::with_capacity(answers.len());
    for answer in answers {
        index.entry(answer.topic.as_str()).or_insert(answer);
    }
    index
}

/// Build one understanding per answered topic.
#[instrument(skip_all, fields(intents = intents.len(), answers = answers.len()))]
pub fn build_understandings(
    intents: &[IntentRecord],
    answers: &[AnswerRecord],
    stamp: &RunStamp,
) -> Vec<UnderstandingRecord> {
    let answers = answer_index(answers);
    let groups = group_by_topic(intents);
    let topic_count = groups.len();

    let understandings: Vec<UnderstandingRecord> = groups
        .into_iter()
        .filter_map(|group| {
            let answer = answers.get(group.topic)?;
            Some(understanding(&group, answer, stamp))
        })
        .collect();

    debug!(
        topics = topic_count,
        unanswered = topic_count - understandings.len(),
        "grouped intents by topic"
    );

    understandings
}

fn understanding(
    group: &TopicGroup<'_>,
    answer: &AnswerRecord,
    stamp: &RunStamp,
) -> UnderstandingRecord {
    let question_groups = group
        .intents
        .iter()
        .map(|intent| QuestionGroup {
            input_contexts: intent.input_contexts.clone(),
            fuzzy_questions: intent.questions.clone(),
            exact_questions: Vec::new(),
        })
        .collect();

    let mut output_contexts: Vec<String> = Vec::new();
    for ctx in group.intents.iter().flat_map(|i| &i.output_contexts) {
        if !output_contexts.contains(ctx) {
            output_contexts.push(ctx.clone());
        }
    }

    UnderstandingRecord {
        created: stamp.started_at,
        updated: stamp.started_at,
        topic: group.topic.to_string(),
        keywords: Vec::new(),
        question_groups,
        answer_groups: vec![AnswerGroup {
            messaging_service: stamp.messaging_service.clone(),
            answers: vec![answer.answer.clone()],
        }],
        output_contexts,
    }
}
