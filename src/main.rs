use std::env;
use std::io::stdout;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use clickup_tools::client::ClickUpClient;
use clickup_tools::console::{ConsoleMarkdownList, ConsolePresenter};
use clickup_tools::tasks_command::{TasksArgs, TasksCommand};
use clickup_tools::worktime_command::{WorktimeArgs, WorktimeCommand};

/// ClickUpの作業時間を集計するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- worktime
/// $ cargo run -- tasks alice
/// $ cargo run -- workspaces
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// ユーザーごとの合計作業時間を表示する。
    Worktime(WorktimeArgs),
    /// 指定したユーザーのタスクごとの作業時間を表示する。
    Tasks(TasksArgs),
    /// 認可されたworkspaceの一覧を表示する。
    Workspaces,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let token = env::var("CLICKUP_API_TOKEN").context("CLICKUP_API_TOKEN must be set")?;
    let client = ClickUpClient::new(&token, None)?;

    let mut writer = stdout();
    let mut presenter = ConsoleMarkdownList::new(&mut writer);

    match args.subcommand {
        SubCommands::Worktime(worktime) => {
            let worktime = WorktimeCommand::new(&client).run(worktime).await?;
            presenter.show_worktime(&worktime)?;
        }
        SubCommands::Tasks(tasks) => {
            let user_tasks = TasksCommand::new(&client).run(tasks).await?;
            presenter.show_user_tasks(&user_tasks)?;
        }
        SubCommands::Workspaces => {
            let workspaces = client.get_authorized_workspaces().await?;
            presenter.show_workspaces(&workspaces.teams)?;
        }
    }

    Ok(())
}
