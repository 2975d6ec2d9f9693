use std::collections::HashMap;

use anyhow::Result;

use crate::graph::{fetch_answer_paths, GraphStore};
use crate::models::{AnswerPath, KnowledgeItem};

/// Collect the answers and metadata of each matched question.
///
/// Titles without any answer path are dropped silently. Callers must not pass
/// an empty list.
pub async fn get_knowledge(graph: &dyn GraphStore, titles: &[String]) -> Result<Vec<KnowledgeItem>> {
    let paths = fetch_answer_paths(graph, titles).await?;
    tracing::info!("Fetched {} answer path(s) for {} title(s)", paths.len(), titles.len());
    Ok(fold_paths(paths))
}

/// One item per distinct title, in first-seen order; answers keep row order.
pub fn fold_paths(paths: Vec<AnswerPath>) -> Vec<KnowledgeItem> {
    let mut items: Vec<KnowledgeItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for path in paths {
        match index.get(&path.question.title) {
            Some(&i) => items[i].answers.push(path.answer.content),
            None => {
                index.insert(path.question.title.clone(), items.len());
                items.push(KnowledgeItem {
                    title: path.question.title,
                    tags: path.question.tags,
                    view_count: path.question.view_count,
                    date: path.question.date,
                    answers: vec![path.answer.content],
                });
            }
        }
    }

    items
}
