use anyhow::{Context, Result};
use log::info;

use crate::client::{ClickUpRepository, TimeEntriesQuery};
use crate::datetime::{parse_date_spec, DateSpec};
use crate::worktime::{user_tasks, UserTasks};

/// ユーザーのタスクごとの作業時間を出力するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct TasksArgs {
    #[clap(help = "Username to aggregate time entries for")]
    username: String,

    #[clap(
        short = 's',
        long = "start-date",
        help = "Sets a start date in the format YYYY,MM,DD[,hh,mm,ss]",
        parse(try_from_str = parse_date_spec),
    )]
    start_date: Option<DateSpec>,

    #[clap(
        short = 'e',
        long = "end-date",
        help = "Sets an end date in the format YYYY,MM,DD[,hh,mm,ss]",
        parse(try_from_str = parse_date_spec),
    )]
    end_date: Option<DateSpec>,

    #[clap(
        short = 'w',
        long = "workspace-id",
        help = "Limits aggregation to the given workspace ids"
    )]
    workspace_ids: Vec<i64>,
}

pub struct TasksCommand<'a, T: ClickUpRepository + Sync> {
    clickup_client: &'a T,
}

impl<'a, T: ClickUpRepository + Sync> TasksCommand<'a, T> {
    /// 新しい`TasksCommand`を返す。
    ///
    /// # Arguments
    /// * `clickup_client` - ClickUp APIと通信するためのリポジトリ
    pub fn new(clickup_client: &'a T) -> Self {
        Self { clickup_client }
    }

    /// `tasks`サブコマンドの処理を行う。
    ///
    /// usernameはworkspaceのメンバー一覧と大文字小文字を区別せずに照合する。
    ///
    /// # Arguments
    ///
    /// * `args` - `tasks`サブコマンドの引数
    pub async fn run(&self, args: TasksArgs) -> Result<UserTasks> {
        let query = TimeEntriesQuery {
            start_date: args.start_date,
            end_date: args.end_date,
            ..Default::default()
        };
        let workspace_ids = match args.workspace_ids.is_empty() {
            true => None,
            false => Some(args.workspace_ids.as_slice()),
        };

        let tasks = user_tasks(self.clickup_client, &args.username, workspace_ids, &query)
            .await
            .with_context(|| format!("Failed to aggregate tasks for user: {}", args.username))?;

        info!(
            "Aggregated {} tasks for user: {}",
            tasks.tasks.len(),
            tasks.username,
        );

        Ok(tasks)
    }
}
