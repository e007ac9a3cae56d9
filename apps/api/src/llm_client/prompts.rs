// Shared prompt fragments. Each feature that calls the LLM keeps its own
// prompts.rs next to it; only cross-cutting pieces live here.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a helpful assistant designed to output JSON. \
    You MUST respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
