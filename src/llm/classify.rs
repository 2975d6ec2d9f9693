use anyhow::Result;

use super::retry::ChatClient;

fn build_trend_prompt(query: &str) -> String {
    format!(
        "Here is a query from user: {query}.\n\
         If it queries about technology trend, answer YES. Otherwise, answer NO.\n\
         Don't give any extra answer."
    )
}

/// Naive verdict: any occurrence of "YES" counts, case-sensitive. "YESTERDAY"
/// is a trend query too; an error string never is.
fn parse_trend_verdict(response: &str) -> bool {
    response.contains("YES")
}

/// Ask the LLM whether `query` is about technology trends.
pub async fn is_trend_query(llm: &ChatClient, query: &str) -> Result<bool> {
    let response = llm.query(&build_trend_prompt(query)).await?;
    let is_trend = parse_trend_verdict(&response);
    tracing::info!(is_trend, "Classified query");
    Ok(is_trend)
}
