//! Prompt templates for the text2cypher and answer steps.

use medgraph_models::Chunk;

pub const TEXT2CYPHER_SYSTEM_PROMPT: &str = "\
You are an expert in translating natural language questions into Cypher statements.
You will be provided with a question and a graph schema.
Use only the provided relationship types and properties in the schema to generate a Cypher statement.
The Cypher statement could retrieve nodes, relationships, or both.
Do not include any explanations or apologies in your responses.
Do not respond to any questions that might ask anything else than for you to construct a Cypher statement.";

pub const RAG_ANSWER_SYSTEM_PROMPT: &str = "\
You are an AI assistant using Retrieval-Augmented Generation (RAG).
RAG enhances your responses by retrieving relevant information from a knowledge base.
You will be provided with a question and relevant context. Use only this context to answer the question IN FULL SENTENCES.
Do not make up an answer. If you don't know the answer, say so clearly.
Always strive to provide concise, helpful, and context-aware answers.";

const QUERY_OUTPUT_FORMAT: &str = "\
Answer with a JSON object and nothing else, in this form:
{\"query\": \"<Cypher statement>\"}
If the question cannot be answered with the schema, use an empty string for \"query\".";

const ANSWER_OUTPUT_FORMAT: &str = "\
Answer with a JSON object and nothing else, in this form:
{\"answer\": \"<answer>\"}";

pub fn text2cypher_prompt(schema: &str, question: &str) -> String {
    format!(
        "Task: Generate a Cypher statement to query a graph database.\n\n\
         {schema}\n\n\
         The question is:\n\
         {question}\n\n\
         Instructions:\n\
         1. Use only the provided node and relationship types and properties in the schema.\n\
         2. When returning results, return property values rather than the entire node or relationship.\n\
         3. ALWAYS use the WHERE clause to compare string properties, and compare them using the LOWER() function.\n\n\
         {QUERY_OUTPUT_FORMAT}"
    )
}

pub fn answer_prompt(question: &str, context: &str) -> String {
    format!(
        "QUESTION: {question}\n\
         RELEVANT CONTEXT: {context}\n\n\
         {ANSWER_OUTPUT_FORMAT}\n\n\
         RESPONSE:"
    )
}

/// Ranked chunks as a JSON array, in the order given
pub fn chunks_context(chunks: &[Chunk]) -> String {
    serde_json::to_string(chunks).unwrap_or_else(|_| "[]".to_string())
}

/// Strip a surrounding markdown code fence (```json ... ```), if any
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string (e.g. "json", "cypher") on the opening line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// The JSON object embedded in model output, if there is one
pub fn extract_json_object(text: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    let body = strip_code_fence(text);
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str(&body[start..=end]).ok()? {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Pull a string field out of a JSON object embedded in model output.
///
/// Returns `None` when the output holds no parseable object or the field is
/// missing or not a string.
pub fn extract_json_field(text: &str, field: &str) -> Option<String> {
    extract_json_object(text)?
        .get(field)?
        .as_str()
        .map(|s| s.to_string())
}
