//! Prompt templates for the three-stage SQL pipeline.
//!
//! The rule text is specific to the target warehouse: table naming
//! conventions, the `dbo.` schema prefix, the 8-digit YYYYMMDD date
//! encoding, and SQL Server 2005 legacy syntax. Pointing the assistant at a
//! different database means editing these templates.

/// Stop sequence passed on every generation-stage call so the completion is
/// truncated before the model can fabricate a `SQLResult:` transcript.
pub const STOP_SQL_RESULT: &str = "\nSQLResult:";

/// Sentinel table name used by the single-shot fallback when discovery
/// never ran.
pub const FALLBACK_TABLE: &str = "tbdw_tgt_unknown";

/// Static description of the warehouse, used by the fallback prompt and the
/// answer-composition prompt. Nothing is introspected up front; the text
/// tells the model how to discover tables and columns on its own.
pub fn schema_description() -> String {
    r#"Available Database: CMWDW_Insurance on SQL Server 2005

IMPORTANT Table Naming Conventions:
- All tables use the 'dbo' schema prefix (e.g., dbo.table_name)
- Fact tables follow pattern: dbo.tbdw_tgt_*_fact (e.g., dbo.tbdw_tgt_loan_account_summary_fact)
- Dimension tables follow pattern: dbo.tbdw_tgt_*_dim (e.g., dbo.tbdw_tgt_loan_account_dim)
- NEVER use database.table format (e.g., CMWDW_Insurance.table_name is WRONG)
- ALWAYS use schema.table format (e.g., dbo.table_name is CORRECT)

To discover tables, use:
SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE' AND TABLE_NAME LIKE 'tbdw_tgt_%'

To find columns in a table:
SELECT COLUMN_NAME, DATA_TYPE FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_NAME = 'your_table_name'

SQL Server 2005 syntax:
- Use TOP instead of LIMIT (e.g., SELECT TOP 5 * FROM dbo.table_name)
- Use GETDATE() instead of NOW()
- Use LEN() instead of LENGTH()"#
        .to_string()
}

/// Stage 1: ask for an `INFORMATION_SCHEMA.TABLES` search query matching the
/// question's keywords.
pub fn find_tables(question: &str) -> String {
    format!(
        r#"You are a SQL expert working with a Microsoft SQL Server 2005 database named CMWDW_Insurance.

The user asked: "{question}"

Your task: Find relevant tables that match the user's question.

CRITICAL - Table Naming Convention:
- ALL fact tables follow pattern: tbdw_tgt_*_fact (with tbdw_tgt_ prefix)
- ALL dimension tables follow pattern: tbdw_tgt_*_dim (with tbdw_tgt_ prefix)

Examples:
- "loan account summary fact" → tbdw_tgt_loan_account_summary_fact
- "real estate summary fact" → tbdw_tgt_real_estate_summary_fact
- "property dimension" → tbdw_tgt_property_dim
- "lender dimension" → tbdw_tgt_lender_dim

Extract keywords from the user's question and search for matching tables:
1. Identify if they're asking about a fact table (summary, transaction, fact) or dimension (lookup, dimension, dim)
2. Extract key subject words (loan, property, real estate, customer, etc.)
3. Search using LIKE pattern with tbdw_tgt_% prefix

Write a SQL query to find matching tables. Use wildcards to find tables containing the keywords:

SQL Query:"#
    )
}

/// Stage 2: given the table-search result, ask for an
/// `INFORMATION_SCHEMA.COLUMNS` query against the single best table. The
/// selected table name is later read back out of the generated query text.
pub fn discover_columns(question: &str, found_tables: &str) -> String {
    format!(
        r#"You are a SQL expert working with a Microsoft SQL Server 2005 database named CMWDW_Insurance.

User Question: "{question}"

Available Tables Found:
{found_tables}

Your task: Select the BEST matching table and get its columns.

Instructions:
1. Choose the most relevant table from the list above
2. The table name will start with 'tbdw_tgt_'
3. Query to get ALL columns from that specific table

Write a SQL query to get the column names:
SELECT COLUMN_NAME FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_NAME = 'exact_table_name_from_above'

SQL Query:"#
    )
}

/// Stage 3: the real generation prompt, grounded in the discovered table and
/// column names.
pub fn final_query(question: &str, selected_table: &str, discovered_columns: &str) -> String {
    format!(
        r#"You are a SQL expert working with a Microsoft SQL Server 2005 database named CMWDW_Insurance.

User Question: {question}

Selected Table: {selected_table}

Available Columns:
{discovered_columns}

CRITICAL RULES:
1. Table Naming: ALWAYS use dbo.table_name format
   ✓ CORRECT: SELECT * FROM dbo.{selected_table}
   ✗ WRONG: SELECT * FROM CMWDW_Insurance.real_estate_summary_fact

2. Column Matching:
   - Match natural language to actual column names
   - Common abbreviations: amt=amount, desc=description, cnt=count, ind=indicator, dt=date, dtm=datetime, nm=name
   - Users may say "amount" but column is "amt"
   - Users may say "date" but column might be "dt" or "dtm"

3. Date Handling:
   - Dates like "19870708" are in YYYYMMDD format
   - Convert dates properly: WHERE date_column = '19870708' or CONVERT(VARCHAR(8), date_column, 112) = '19870708'
   - Handle different date formats in the data

4. SQL Server 2005 Syntax:
   - Use TOP not LIMIT
   - Use GETDATE() not NOW()
   - Use LEN() not LENGTH()
   - Use CONVERT for date/type conversions

Based on the question and available columns, write the SQL query.
Use ONLY columns from the list above and the table name: dbo.{selected_table}

SQL Query:"#
    )
}

/// Single-shot fallback used when any discovery stage failed: the static
/// schema description stands in for the discovered facts.
pub fn fallback_query(question: &str) -> String {
    format!(
        "{}\n\n{}",
        schema_description(),
        final_query(question, FALLBACK_TABLE, "Unable to discover columns")
    )
}

/// Answer-composition prompt: turn the query result back into prose.
pub fn answer(question: &str, query: &str, response: &str) -> String {
    format!(
        r#"Based on the table schema below, question, sql query, and sql response, write a natural language response:
{schema}

Question: {question}
SQL Query: {query}
SQL Response: {response}
Answer:"#,
        schema = schema_description(),
    )
}
