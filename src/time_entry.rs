use serde::{Deserialize, Deserializer};

/// time entriesエンドポイントの1ページ分のレスポンス。
#[derive(Clone, Debug, Deserialize)]
pub struct TimeEntriesPage {
    pub data: Vec<TimeEntry>,
}

/// ClickUp APIから取得したtime entry。
///
/// durationが負の場合は実行中のタイマーを表す。
#[derive(Clone, Debug, Deserialize)]
pub struct TimeEntry {
    pub id: String,
    #[serde(default)]
    pub task: Option<TaskRef>,
    pub user: EntryUser,
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub duration: i64,
    #[serde(default)]
    pub billable: bool,
}

/// time entryに紐づくタスクへの参照。
#[derive(Clone, Debug, Deserialize)]
pub struct TaskRef {
    pub id: String,
    #[serde(default)]
    pub custom_id: Option<String>,
    pub name: String,
}

/// time entryを記録したユーザー。
#[derive(Clone, Debug, Deserialize)]
pub struct EntryUser {
    pub id: i64,
    pub username: String,
}

// ClickUp APIはdurationやIDを数値で返す場合と文字列で返す場合がある。
pub(crate) fn i64_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.parse::<i64>().map_err(serde::de::Error::custom),
    }
}
