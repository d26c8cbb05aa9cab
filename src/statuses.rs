use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// タスクのステータスフィルタで利用できるステータス名の集合。
///
/// ステータス名はworkspaceごとに定義されるため、この集合は呼び出し元が
/// 構築して`ClickUpClient`へ渡す。追加・削除は新しい値を返し、
/// 共有状態を書き換えることはない。
///
/// # Examples
///
/// ```
/// use clickup_tools::statuses::StatusSet;
///
/// let statuses = StatusSet::new(["open", "in progress"]).with("done");
/// assert!(statuses.contains("Done"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSet {
    names: BTreeSet<String>,
}

impl StatusSet {
    /// 新しい`StatusSet`を返す。名前は小文字に正規化して保持する。
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.into().to_lowercase())
                .collect(),
        }
    }

    /// ステータス名が含まれるかを大文字小文字を区別せずに判定する。
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// ステータス名を1つ追加した新しい集合を返す。
    pub fn with(&self, name: &str) -> Self {
        let mut names = self.names.clone();
        names.insert(name.to_lowercase());
        Self { names }
    }

    /// ステータス名を1つ取り除いた新しい集合を返す。
    pub fn without(&self, name: &str) -> Self {
        let mut names = self.names.clone();
        names.remove(&name.to_lowercase());
        Self { names }
    }

    /// フィルタに指定されたステータス名が全て集合に含まれることを検証する。
    pub fn validate(&self, statuses: &[String]) -> Result<()> {
        for status in statuses {
            if !self.contains(status) {
                return Err(Error::InvalidValue(format!(
                    "Unknown status '{}'. Available statuses: {:?}.",
                    status, self.names,
                )));
            }
        }
        Ok(())
    }
}
