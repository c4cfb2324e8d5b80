// Shared prompt fragments. Each feature that calls the model keeps its own
// prompts.rs alongside it and pulls cross-cutting pieces from here.

/// System instruction fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT wrap the JSON in markdown code fences. \
    Do NOT include explanations or apologies.";

/// Formatting rules for any markdown body the model writes.
pub const MARKDOWN_ONLY_INSTRUCTION: &str = "\
IMPORTANT FORMATTING RULES:
- Use Markdown formatting (NOT HTML)
- Use ## for main headings, ### for subheadings
- Use **bold** for emphasis, *italic* for subtle emphasis
- Use `code` for inline code and ```language blocks for code examples
- Use - for bullet points and 1. for numbered lists
- Do NOT use HTML tags like <h2>, <p>, <strong>, etc.
- Write in clear, engaging paragraphs separated by blank lines
- Make it readable and well-structured";
