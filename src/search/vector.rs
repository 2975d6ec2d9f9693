use crate::models::ScoredTitle;

/// Cosine similarity in [-1, 1]. Mismatched lengths, empty vectors and
/// zero-norm vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Fill in each title's similarity to the query embedding.
pub fn score_titles(titles: &mut [ScoredTitle], query_embedding: &[f32]) {
    for title in titles.iter_mut() {
        title.similarity = Some(cosine_similarity(&title.embedding, query_embedding));
    }
}

/// Keep at most `top` titles whose similarity is strictly above `threshold`.
///
/// Titles are only sorted (descending, stable) when there are more than
/// `top` of them; otherwise retrieval order is kept.
pub fn rank_titles(mut titles: Vec<ScoredTitle>, top: usize, threshold: f32) -> Vec<String> {
    if titles.len() > top {
        titles.sort_by(|a, b| sort_key(b).total_cmp(&sort_key(a)));
        titles.truncate(top);
    }

    titles
        .into_iter()
        .filter(|t| t.score() > threshold)
        .map(|t| t.text)
        .collect()
}

/// NaN similarities rank below every real score.
fn sort_key(title: &ScoredTitle) -> f32 {
    let score = title.score();
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
