use thiserror::Error;

/// 日付シーケンスの期待順序を示すヒント。
pub const DATE_SEQUENCE_HINT: &str =
    "Type data in a correct sequence (year, month, day[, hour, minute, second]).";
pub const DATE_TYPE_HINT: &str = "All components must be integers.";
pub const DATE_DATA_HINT: &str = "Use a timestamp or a list/tuple of \
    (year, month, day[, hour, minute, second]) values as integers.";
pub const TIME_ESTIMATE_HINT: &str = "Time estimate has to be a list/tuple of three \
    elements: days, hours and minutes. To omit any of those elements, type 0 \
    (eg: [0, 1, 0] for one hour duration).";

/// ClickUp APIクライアントで発生するエラー。
///
/// 全てのエラーは呼び出し元へ同期的に伝播する。
/// リトライや部分的な結果への変換は行わない。
#[derive(Debug, Error)]
pub enum Error {
    /// 日付シーケンスの長さは正しいが、カレンダー上の値が不正な場合のエラー。
    #[error("{reason}. {DATE_SEQUENCE_HINT}")]
    DateSequence { reason: String },

    /// 日付の構成要素が整数でない場合のエラー。
    #[error("{reason}. {DATE_TYPE_HINT}")]
    DateType { reason: String },

    /// 日付がタイムスタンプでも3-6要素のシーケンスでもない場合のエラー。
    #[error("Invalid date. {DATE_DATA_HINT}")]
    DateData,

    /// time estimateが(days, hours, minutes)の3要素でない場合のエラー。
    #[error("Invalid time duration. {TIME_ESTIMATE_HINT}")]
    TimeEstimate,

    /// 型は正しいが値が不正な引数に対するエラー。
    #[error("Invalid argument value. {0}")]
    InvalidValue(String),

    /// トークンに対して認可されたworkspaceが1つも存在しない場合のエラー。
    #[error("No teams (workspaces) found for a given token")]
    WorkspaceNotFound,

    /// workspace単位のtime entries応答に`data`フィールドが無い場合のエラー。
    ///
    /// 集計処理はこのエラーで即座に中断する(fail-fast)。
    #[error(
        "Team {team_id} not authorized for a given token user. \
         Change 'team_id' parameter or upgrade token value. API response: {body}"
    )]
    WorkspaceAuthorization { team_id: i64, body: String },

    /// workspaceのメンバー一覧にusernameが見つからない場合のエラー。
    #[error(
        "User '{0}' not found in workspace list of members. Validate 'username' \
         argument or use another token to search through different workspaces"
    )]
    UserNotFound(String),

    /// custom fieldsによるフィルタリングは未実装。
    #[error("A 'custom_fields' functionality is not yet implemented")]
    CustomFieldsUnsupported,

    /// HTTPリクエストの失敗。
    #[error("Request to ClickUp API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// レスポンスのデシリアライズ失敗。
    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// レスポンスの構造が期待と異なる場合のエラー。
    #[error("Unexpected response payload: {0}")]
    Payload(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// エラーメッセージにヒントが含まれることを確認する。
    #[test]
    fn test_date_sequence_error_message() {
        let error = Error::DateSequence {
            reason: "month must be in 1..=12".to_string(),
        };
        let message = error.to_string();

        assert!(message.contains("month must be in 1..=12"));
        assert!(message.contains("year, month, day"));
    }

    #[test]
    fn test_workspace_authorization_error_message() {
        let error = Error::WorkspaceAuthorization {
            team_id: 123,
            body: r#"{"err":"Team not authorized"}"#.to_string(),
        };

        assert!(error.to_string().contains("Team 123 not authorized"));
    }
}
