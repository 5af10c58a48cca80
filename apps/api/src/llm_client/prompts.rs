// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt used for every completion. Output is parsed leniently downstream,
/// but the cleaner the model's output, the less recovery is needed.
pub const PLAIN_OUTPUT_SYSTEM: &str = "You are a precise, structured assistant. \
    Respond with exactly the format requested in the prompt. \
    Do NOT use markdown code fences. \
    Do NOT include explanations, commentary or apologies.";
