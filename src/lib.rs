//! ClickUp APIのクライアントと作業時間集計のためのツール群。

pub mod client;
pub mod console;
pub mod datetime;
pub mod error;
pub mod filters;
pub mod statuses;
pub mod tasks_command;
pub mod time_entry;
pub mod worktime;
pub mod worktime_command;
