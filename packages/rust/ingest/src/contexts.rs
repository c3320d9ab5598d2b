//! Context derivation for slash-delimited topics.
//!
//! A topic such as `/billing/refund/start` names a position in a tree. When
//! derivation is enabled, matching a deep topic also activates each of its
//! ancestors below the root (`/billing/refund`, `/billing/refund/start`), and an
//! intent with no explicit input contexts is gated on its top-level segment
//! (`/billing`).

/// Every prefix of `topic` deeper than its first segment, shallowest first.
///
/// Returns nothing for topics that are not rooted paths.
pub fn output_prefixes(topic: &str) -> Vec<String> {
    let Some(segments) = path_segments(topic) else {
        return Vec::new();
    };

    (2..=segments.len())
        .map(|depth| format!("/{}", segments[..depth].join("/")))
        .collect()
}

/// The top-level segment context for a nested topic (`/a` for `/a/b/c`).
///
/// Single-segment topics get no default: gating `/a` on itself would make it
/// unreachable.
pub fn default_input_context(topic: &str) -> Option<String> {
    let segments = path_segments(topic)?;
    if segments.len() < 2 {
        return None;
    }
    Some(format!("/{}", segments[0]))
}

/// Apply the derivation policy to explicit context lists.
///
/// Output contexts become the explicit list followed by the derived prefixes,
/// without duplicates. Input contexts fall back to the top-level segment only
/// when none were given.
pub fn derive_contexts(
    topic: &str,
    explicit_inputs: Vec<String>,
    explicit_outputs: Vec<String>,
) -> (Vec<String>, Vec<String>) {
    let mut outputs = explicit_outputs;
    for prefix in output_prefixes(topic) {
        if !outputs.contains(&prefix) {
            outputs.push(prefix);
        }
    }

    let inputs = if explicit_inputs.is_empty() {
        default_input_context(topic).into_iter().collect()
    } else {
        explicit_inputs
    };

    (inputs, outputs)
}

fn path_segments(topic: &str) -> Option<Vec<&str>> {
    let rest = topic.strip_prefix('/')?;
    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}
