use std::fmt::Write;

use anyhow::Result;

use super::retry::ChatClient;
use crate::models::KnowledgeItem;

/// What to put under each title in the context block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    /// Numbered answer texts (normal Q&A)
    pub include_answers: bool,
    /// View count and date (always on for trend summaries)
    pub include_metadata: bool,
}

impl ContextOptions {
    pub fn answers() -> Self {
        Self {
            include_answers: true,
            include_metadata: false,
        }
    }

    pub fn metadata() -> Self {
        Self {
            include_answers: false,
            include_metadata: true,
        }
    }
}

/// Render the retrieved questions as plain text for the prompt.
pub fn build_context_block(knowledge: &[KnowledgeItem], options: ContextOptions) -> String {
    let mut ctx = String::new();

    for item in knowledge {
        let mut lines = vec![format!("Title: {}", item.title), format!("Tags: {}", item.tags)];
        if options.include_metadata {
            lines.push(format!("View count: {}", item.view_count));
            lines.push(format!("Date: {}", item.date));
        }
        if options.include_answers {
            lines.extend(
                item.answers
                    .iter()
                    .enumerate()
                    .map(|(i, answer)| format!("Answer{}: {answer}", i + 1)),
            );
        }
        let _ = writeln!(ctx, "{}", lines.join("\n"));
    }

    ctx
}

pub fn build_prompt(query: &str, context_block: &str) -> String {
    format!(
        "Context information is below.\n\
         ---------------------\n\
         {context_block}\n\
         ---------------------\n\
         Given the context information and not prior knowledge, answer the query.\n\
         Query: {query}\n\
         Answer: "
    )
}

/// Collapse blank lines the model likes to emit. Single newlines stay.
pub fn normalize_response(response: &str) -> String {
    response.replace("\n\n", "\n")
}

/// Answer `query` from the retrieved knowledge.
pub async fn synthesize(
    llm: &ChatClient,
    query: &str,
    knowledge: &[KnowledgeItem],
    options: ContextOptions,
) -> Result<String> {
    tracing::info!("Constructing prompt with context from graph database");
    let prompt = build_prompt(query, &build_context_block(knowledge, options));
    let response = llm.query(&prompt).await?;
    Ok(normalize_response(&response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(title: &str, answers: &[&str]) -> KnowledgeItem {
        KnowledgeItem {
            title: title.to_string(),
            tags: "vercel".to_string(),
            view_count: 1234,
            date: "2023-04-01".to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_context_with_answers() {
        let knowledge = vec![make_item("Deploy secrets?", &["Use env vars", "Use a JSON secret"])];
        let ctx = build_context_block(&knowledge, ContextOptions::answers());
        assert_eq!(
            ctx,
            "Title: Deploy secrets?\nTags: vercel\nAnswer1: Use env vars\nAnswer2: Use a JSON secret\n"
        );
        assert!(!ctx.contains("View count"));
    }

    #[test]
    fn test_context_with_metadata_only() {
        let knowledge = vec![make_item("Deploy secrets?", &["Use env vars"])];
        let ctx = build_context_block(&knowledge, ContextOptions::metadata());
        assert_eq!(
            ctx,
            "Title: Deploy secrets?\nTags: vercel\nView count: 1234\nDate: 2023-04-01\n"
        );
        assert!(!ctx.contains("Answer1"));
    }

    #[test]
    fn test_context_with_both() {
        let options = ContextOptions {
            include_answers: true,
            include_metadata: true,
        };
        let ctx = build_context_block(&[make_item("T", &["A"])], options);
        assert!(ctx.contains("View count: 1234\nDate: 2023-04-01\nAnswer1: A\n"));
    }

    #[test]
    fn test_context_multiple_items_in_order() {
        let knowledge = vec![make_item("First", &["a"]), make_item("Second", &["b"])];
        let ctx = build_context_block(&knowledge, ContextOptions::answers());
        let first = ctx.find("Title: First").unwrap();
        let second = ctx.find("Title: Second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_prompt_template() {
        let prompt = build_prompt("How to deploy?", "Title: X\n");
        assert!(prompt.starts_with("Context information is below.\n---------------------\nTitle: X\n\n"));
        assert!(prompt.contains("not prior knowledge"));
        assert!(prompt.ends_with("Query: How to deploy?\nAnswer: "));
    }

    #[test]
    fn test_normalize_collapses_double_newline() {
        assert_eq!(normalize_response("A\n\nB"), "A\nB");
    }

    #[test]
    fn test_normalize_keeps_single_newline_and_spaces() {
        assert_eq!(normalize_response("A\nB"), "A\nB");
        assert_eq!(normalize_response("A  \tB"), "A  \tB");
    }
}
