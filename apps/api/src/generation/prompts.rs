// Prompt constants for blog post generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, MARKDOWN_ONLY_INSTRUCTION};

/// System instruction role line. `JSON_ONLY_SYSTEM` is appended by `build_system`.
pub const BLOG_SYSTEM_ROLE: &str = "You are an experienced technical writer producing \
    original, practical blog posts for software developers.";

/// Blog post prompt template.
/// Replace: {topic}, {category}, {formatting_rules}
pub const BLOG_PROMPT_TEMPLATE: &str = r#"Write a comprehensive, original blog post about "{topic}" in the {category} category.

{formatting_rules}

Requirements:
1. Create an engaging, unique title
2. Write a compelling excerpt (2-3 sentences)
3. Write full content with introduction, main points, examples, and conclusion (800-1200 words)
   - Use proper Markdown formatting only
   - Structure with headings (## and ###)
   - Include code examples where relevant
   - Use lists for key points
4. Suggest 3-5 relevant tags
5. Estimate reading time (5-10 minutes)
6. Make it informative, practical, and valuable for developers
7. Provide 3-5 tech-related keywords for the article image (MUST be tech-related: programming, coding, software, technology, computer, developer, code editor, laptop, software development, etc. - NO nature, landscapes, or non-tech terms)

Format the response as JSON:
{
  "title": "Your title here",
  "excerpt": "Your excerpt here",
  "content": "Full content in Markdown format (NO HTML tags)",
  "tags": ["tag1", "tag2", "tag3"],
  "readingTime": 8,
  "suggestedImageKeywords": "keyword1, keyword2, keyword3"
}"#;

pub fn build_system() -> String {
    format!("{BLOG_SYSTEM_ROLE} {JSON_ONLY_SYSTEM}")
}

pub fn build_blog_prompt(topic: &str, category: &str) -> String {
    fill_template(
        BLOG_PROMPT_TEMPLATE,
        &[
            ("formatting_rules", MARKDOWN_ONLY_INSTRUCTION),
            ("category", category),
            ("topic", topic),
        ],
    )
}

/// Single left-to-right pass: substituted values are never scanned again.
/// Braces that do not open a known placeholder are copied through.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        for (name, value) in vars {
            let placeholder = format!("{{{name}}}");
            if tail.starts_with(&placeholder) {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
                continue 'scan;
            }
        }
        out.push('{');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}
