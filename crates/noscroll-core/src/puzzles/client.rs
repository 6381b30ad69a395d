//! Read-only puzzle data client.
//!
//! Speaks the PostgREST-style query dialect: ascending id order, a row
//! limit, and `id=gt.N` cursor pagination. Every failure path yields an
//! empty page; callers never see transport errors.

use serde::Deserialize;

use super::PuzzleRecord;

const DEFAULT_TURN_TEXT: &str = "White to play";
const DEFAULT_PROMPT_TEXT: &str = "Can you solve this puzzle?";

/// Raw row as served by the puzzle tables. Field names vary between older
/// and newer rows.
#[derive(Debug, Deserialize)]
struct RawPuzzleRow {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    fen: Option<String>,
    #[serde(default, rename = "turnText")]
    turn_text: Option<String>,
    #[serde(default)]
    turn: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "correctMove")]
    correct_move: Option<String>,
}

/// HTTP client for the remote puzzle tables.
pub struct PuzzleClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PuzzleClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Fetch one page of `table`, id-ascending, starting after `after_id`
    /// when given. Fails soft to an empty page.
    pub async fn fetch_page(
        &self,
        table: &str,
        limit: u32,
        after_id: Option<i64>,
    ) -> Vec<PuzzleRecord> {
        match self.try_fetch_page(table, limit, after_id).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(table, error = %e, "puzzle fetch failed; returning empty page");
                Vec::new()
            }
        }
    }

    async fn try_fetch_page(
        &self,
        table: &str,
        limit: u32,
        after_id: Option<i64>,
    ) -> Result<Vec<PuzzleRecord>, reqwest::Error> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let mut query: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("order", "id.asc".to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(after) = after_id {
            query.push(("id", format!("gt.{after}")));
        }

        let rows: Vec<RawPuzzleRow> = self
            .http
            .get(&url)
            .query(&query)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows.into_iter().filter_map(map_row).collect())
    }
}

/// Rows without a numeric id cannot participate in cursor pagination and
/// are dropped.
fn map_row(row: RawPuzzleRow) -> Option<PuzzleRecord> {
    let id = row.id?;
    Some(PuzzleRecord {
        id,
        fen: row.fen.unwrap_or_default(),
        turn_text: row
            .turn_text
            .or(row.turn)
            .unwrap_or_else(|| DEFAULT_TURN_TEXT.into()),
        prompt_text: row.text.unwrap_or_else(|| DEFAULT_PROMPT_TEXT.into()),
        correct_move: row.correct_move,
    })
}
