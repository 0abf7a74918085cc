//! User-facing response text, rendered as Markdown.
//!
//! Every string here is final output. Error replies are fixed remediation
//! messages selected by error variant; raw driver/API detail only appears in
//! the generic catch-all.

use crate::domain::error::AppError;

pub const EMPTY_QUESTION: &str = "Please enter a question.";

pub const GENERATION_FAILED: &str = "❌ **Unable to generate query**\n\nI couldn't understand your question. Please try:\n- Being more specific about table names\n- Using keywords like 'fact table' or 'dimension table'\n- Checking your spelling";

pub const QUOTA_EXCEEDED: &str = "❌ **API Quota Error**\n\nYour OpenAI API key has insufficient credits.\n\n**To fix:**\n1. Visit https://platform.openai.com/account/billing\n2. Add payment method and credits\n\n**Note:** ChatGPT Plus ≠ API access (separate services)";

pub const TABLE_NOT_FOUND: &str = "❌ **Table Not Found**\n\nThe table doesn't exist in the database.\n\n**Tip:** All tables follow the pattern:\n- Fact tables: `dbo.tbdw_tgt_*_fact`\n- Dimension tables: `dbo.tbdw_tgt_*_dim`\n\n**Try:** 'Show me the first 5 tables in the database'";

pub const COLUMN_NOT_FOUND: &str = "❌ **Column Not Found**\n\nThe column doesn't exist in that table.\n\n**Tip:** Enable 'Show SQL query' to see what was attempted.\n\n**Common abbreviations:**\n- amount → amt\n- description → desc\n- count → cnt\n- date → dt or dtm";

pub const CONNECTION_FAILED: &str = "❌ **Database Connection Error**\n\nCouldn't connect to the database.\n\n**Possible causes:**\n- Database server is down\n- Network issues\n- Credentials expired";

pub fn generic_error(detail: &str) -> String {
    format!("❌ **Error:** {detail}\n\n**Tip:** Try enabling 'Show SQL query and raw results' to debug.")
}

/// Map a pipeline error to its fixed reply.
pub fn for_error(error: &AppError) -> String {
    match error {
        AppError::QuotaExceeded(_) => QUOTA_EXCEEDED.to_string(),
        AppError::TableNotFound(_) => TABLE_NOT_FOUND.to_string(),
        AppError::ColumnNotFound(_) => COLUMN_NOT_FOUND.to_string(),
        AppError::ConnectionFailed(_) => CONNECTION_FAILED.to_string(),
        other => generic_error(&other.to_string()),
    }
}

fn sql_block(sql: &str) -> String {
    format!("### 🔍 Generated SQL Query\n```sql\n{}\n```", sql.trim())
}

pub fn no_data(sql: &str, show_details: bool) -> String {
    let details = if show_details {
        sql_block(sql)
    } else {
        String::new()
    };
    format!("### 💬 Answer\n\nNo data found matching your criteria.\n\n{details}")
}

pub fn answer(answer: &str, sql: &str, raw_result: &str, show_details: bool) -> String {
    let mut response = format!("### 💬 Answer\n{answer}\n");
    if show_details {
        response.push_str(&format!("\n{}\n", sql_block(sql)));
        response.push_str(&format!(
            "\n### 📋 Raw Database Result\n```\n{raw_result}\n```"
        ));
    }
    response
}
