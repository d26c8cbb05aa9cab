use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result};

use crate::client::Workspace;
use crate::worktime::UserTasks;

/// Consoleに集計結果を表示するためのtrait。
pub trait ConsolePresenter {
    /// ユーザーごとの合計作業時間を表示する。
    ///
    /// # Arguments
    ///
    /// * `worktime` - usernameから`H:MM:SS`形式の合計時間へのマップ
    fn show_worktime(&mut self, worktime: &HashMap<String, String>) -> Result<()>;

    /// ユーザーのタスクごとの作業時間を表示する。
    fn show_user_tasks(&mut self, user_tasks: &UserTasks) -> Result<()>;

    /// 認可されたworkspaceの一覧を表示する。
    fn show_workspaces(&mut self, workspaces: &[Workspace]) -> Result<()>;
}

/// 集計結果をMarkdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // ユーザー名順のlist形式で表示する。
    fn show_worktime(&mut self, worktime: &HashMap<String, String>) -> Result<()> {
        let mut sorted_worktime: Vec<(&String, &String)> = worktime.iter().collect();
        sorted_worktime.sort_by_key(|(username, _)| username.to_lowercase());

        for (username, duration) in sorted_worktime {
            writeln!(self.writer, "- {}: {}", username, duration)
                .with_context(|| format!("Failed to write worktime for user: {}", username))?;
        }

        Ok(())
    }

    // タスクはAPIから返った順で表示する。custom idがあればそちらを優先する。
    fn show_user_tasks(&mut self, user_tasks: &UserTasks) -> Result<()> {
        for task in &user_tasks.tasks {
            let task_id = task.custom_id.as_deref().unwrap_or(&task.task_id);
            writeln!(
                self.writer,
                "- [{}] {}: {}",
                task_id, task.task_name, task.duration
            )
            .with_context(|| format!("Failed to write task: {:?}", task))?;
        }

        Ok(())
    }

    fn show_workspaces(&mut self, workspaces: &[Workspace]) -> Result<()> {
        for workspace in workspaces {
            writeln!(self.writer, "- {}: {}", workspace.id, workspace.name)
                .with_context(|| format!("Failed to write workspace: {}", workspace.id))?;
        }

        Ok(())
    }
}
