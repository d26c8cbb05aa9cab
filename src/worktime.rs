use std::collections::HashMap;

use log::info;

use crate::client::{ClickUpRepository, MemberUser, TimeEntriesQuery};
use crate::datetime::format_hms;
use crate::error::{Error, Result};
use crate::time_entry::{TimeEntriesPage, TimeEntry};

/// ユーザーが記録したタスクごとの作業時間。
#[derive(Clone, Debug, PartialEq)]
pub struct UserTasks {
    pub username: String,
    pub user_id: i64,
    pub tasks: Vec<TaskSummary>,
}

/// 1タスク分の作業時間の集計結果。
///
/// 同じタスクに対する複数のtime entryは合算される。
#[derive(Clone, Debug, PartialEq)]
pub struct TaskSummary {
    pub task_id: String,
    pub custom_id: Option<String>,
    pub task_name: String,
    pub duration: String,
}

/// 集計対象のworkspace idのリストを決定する。
///
/// idが指定されていない場合はトークンで認可されたworkspaceを全て使う。
///
/// # Arguments
///
/// * `repo` - ClickUp APIへのアクセス手段
/// * `workspace_ids` - 集計対象のworkspace id。省略時は認可された全workspace
pub async fn request_workspace_ids(
    repo: &(impl ClickUpRepository + Sync),
    workspace_ids: Option<&[i64]>,
) -> Result<Vec<i64>> {
    if let Some(ids) = workspace_ids {
        if !ids.is_empty() {
            return Ok(ids.to_vec());
        }
    }

    let workspaces = repo.authorized_workspaces().await?;
    if workspaces.teams.is_empty() {
        return Err(Error::WorkspaceNotFound);
    }

    Ok(workspaces.teams.iter().map(|team| team.id).collect())
}

/// 複数workspaceのtime entriesを1つのリストへ集める。
///
/// workspaceごとに順番に取得し、`data`フィールドを持たない応答があった
/// 時点で認可エラーとして処理を中断する。
pub async fn time_entries_for_workspaces(
    repo: &(impl ClickUpRepository + Sync),
    workspace_ids: &[i64],
    query: &TimeEntriesQuery,
) -> Result<Vec<TimeEntry>> {
    if workspace_ids.is_empty() {
        return Err(Error::InvalidValue(
            "At least one workspace id is required to request time entries.".to_string(),
        ));
    }

    let mut entries = Vec::new();
    for &team_id in workspace_ids {
        let body = repo.time_entries(team_id, query).await?;
        if body.get("data").is_none() {
            return Err(Error::WorkspaceAuthorization {
                team_id,
                body: body.to_string(),
            });
        }

        let page: TimeEntriesPage = serde_json::from_value(body)?;
        info!("workspace {}: {} time entries", team_id, page.data.len());
        entries.extend(page.data);
    }

    Ok(entries)
}

/// workspace横断でユーザーごとの合計作業時間を集計する。
///
/// 戻り値はusernameから`H:MM:SS`形式の合計時間へのマップ。
/// `only_billable`が有効な場合も、time entryを持つユーザーは
/// 0時間としてマップに含まれる。
///
/// # Arguments
///
/// * `repo` - ClickUp APIへのアクセス手段
/// * `workspace_ids` - 集計対象のworkspace id。省略時は認可された全workspace
/// * `query` - time entriesのフィルタ条件
/// * `only_billable` - billableなtime entryのみを合計する
pub async fn user_worktime(
    repo: &(impl ClickUpRepository + Sync),
    workspace_ids: Option<&[i64]>,
    query: &TimeEntriesQuery,
    only_billable: bool,
) -> Result<HashMap<String, String>> {
    let workspace_ids = request_workspace_ids(repo, workspace_ids).await?;
    let entries = time_entries_for_workspaces(repo, &workspace_ids, query).await?;

    let mut totals: HashMap<String, i64> = HashMap::new();
    for entry in entries {
        let total = totals.entry(entry.user.username).or_insert(0);
        if !only_billable || entry.billable {
            *total += entry.duration;
        }
    }

    Ok(totals
        .into_iter()
        .map(|(username, millis)| (username, format_hms(millis)))
        .collect())
}

/// 指定したユーザーのタスクごとの作業時間を集計する。
///
/// usernameは大文字小文字を区別せずworkspaceのメンバー一覧と照合する。
/// 同じタスクに対する複数のtime entryは1つにまとめて合算する。
pub async fn user_tasks(
    repo: &(impl ClickUpRepository + Sync),
    username: &str,
    workspace_ids: Option<&[i64]>,
    query: &TimeEntriesQuery,
) -> Result<UserTasks> {
    let workspaces = repo.authorized_workspaces().await?;
    if workspaces.teams.is_empty() {
        return Err(Error::WorkspaceNotFound);
    }

    let user = find_member(&workspaces.teams, username)
        .ok_or_else(|| Error::UserNotFound(username.to_string()))?;
    let workspace_ids = match workspace_ids {
        Some(ids) if !ids.is_empty() => ids.to_vec(),
        _ => workspaces.teams.iter().map(|team| team.id).collect(),
    };

    // タスク参照をcustom idで引けるようにcustom_task_idsを強制する。
    let query = TimeEntriesQuery {
        assignees: vec![user.id],
        custom_task_ids: true,
        ..query.clone()
    };
    let entries = time_entries_for_workspaces(repo, &workspace_ids, &query).await?;

    let mut totals: Vec<(String, Option<String>, String, i64)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        let task = entry.task.ok_or_else(|| {
            Error::Payload(format!(
                "time entry '{}' has no task reference; only task-bound entries \
                 can be aggregated",
                entry.id,
            ))
        })?;

        match positions.get(&task.id) {
            Some(&position) => totals[position].3 += entry.duration,
            None => {
                positions.insert(task.id.clone(), totals.len());
                totals.push((task.id, task.custom_id, task.name, entry.duration));
            }
        }
    }

    let tasks = totals
        .into_iter()
        .map(|(task_id, custom_id, task_name, millis)| TaskSummary {
            task_id,
            custom_id,
            task_name,
            duration: format_hms(millis),
        })
        .collect();

    Ok(UserTasks {
        username: user.username,
        user_id: user.id,
        tasks,
    })
}

/// 全workspaceのメンバー一覧からusernameに一致するユーザーを探す。
fn find_member(teams: &[crate::client::Workspace], username: &str) -> Option<MemberUser> {
    let username = username.to_lowercase();
    teams
        .iter()
        .flat_map(|team| team.members.iter())
        .find(|member| member.user.username.to_lowercase() == username)
        .map(|member| member.user.clone())
}
