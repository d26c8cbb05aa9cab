use std::collections::HashMap;

use anyhow::{Context, Result};
use log::info;

use crate::client::{ClickUpRepository, TimeEntriesQuery};
use crate::datetime::{parse_date_spec, DateSpec};
use crate::worktime::user_worktime;

/// ユーザーごとの合計作業時間を出力するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct WorktimeArgs {
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

    #[clap(long = "billable", help = "Sums only billable time entries")]
    only_billable: bool,
}

pub struct WorktimeCommand<'a, T: ClickUpRepository + Sync> {
    clickup_client: &'a T,
}

impl<'a, T: ClickUpRepository + Sync> WorktimeCommand<'a, T> {
    /// 新しい`WorktimeCommand`を返す。
    ///
    /// # Arguments
    /// * `clickup_client` - ClickUp APIと通信するためのリポジトリ
    pub fn new(clickup_client: &'a T) -> Self {
        Self { clickup_client }
    }

    /// `worktime`サブコマンドの処理を行う。
    ///
    /// workspace横断でユーザーごとの合計作業時間を集計する。
    /// 日付が指定されていない場合は当月1日から現在時刻までを対象にする。
    ///
    /// # Arguments
    ///
    /// * `args` - `worktime`サブコマンドの引数
    pub async fn run(&self, args: WorktimeArgs) -> Result<HashMap<String, String>> {
        let query = TimeEntriesQuery {
            start_date: args.start_date,
            end_date: args.end_date,
            ..Default::default()
        };
        let workspace_ids = match args.workspace_ids.is_empty() {
            true => None,
            false => Some(args.workspace_ids.as_slice()),
        };
        info!("Workspace ids: {:?}", workspace_ids);

        let worktime = user_worktime(
            self.clickup_client,
            workspace_ids,
            &query,
            args.only_billable,
        )
        .await
        .context("Failed to aggregate worktime")?;

        info!("Worktime aggregated for {} users.", worktime.len());

        Ok(worktime)
    }
}
