use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Error, Result};

/// ClickUp APIに渡す日時の入力形式。
///
/// 構造化されたタイムスタンプか、`(year, month, day[, hour, minute, second])`の
/// 順に並んだ3〜6要素の整数列を受け付ける。
/// どちらの形式もUnixエポックからのミリ秒に正規化される。
///
/// # Examples
///
/// ```
/// use clickup_tools::datetime::DateSpec;
///
/// let date = DateSpec::from(vec![2024, 10, 10]);
/// assert!(date.to_unix_millis().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum DateSpec {
    Timestamp(DateTime<Utc>),
    Parts(Vec<i64>),
}

impl DateSpec {
    /// Unixエポックからのミリ秒へ変換する。
    ///
    /// 整数列はUTCのカレンダー日時として解釈する。
    /// 長さが3〜6以外の整数列はエラーとなる。
    pub fn to_unix_millis(&self) -> Result<i64> {
        match self {
            DateSpec::Timestamp(datetime) => Ok(datetime.timestamp_millis()),
            DateSpec::Parts(parts) => parts_to_unix_millis(parts),
        }
    }
}

impl From<DateTime<Utc>> for DateSpec {
    fn from(datetime: DateTime<Utc>) -> Self {
        DateSpec::Timestamp(datetime)
    }
}

impl From<Vec<i64>> for DateSpec {
    fn from(parts: Vec<i64>) -> Self {
        DateSpec::Parts(parts)
    }
}

impl From<&[i64]> for DateSpec {
    fn from(parts: &[i64]) -> Self {
        DateSpec::Parts(parts.to_vec())
    }
}

/// `(year, month, day[, hour, minute, second])`の整数列をミリ秒へ変換する。
fn parts_to_unix_millis(parts: &[i64]) -> Result<i64> {
    if !(3..=6).contains(&parts.len()) {
        return Err(Error::DateData);
    }

    let year = i32::try_from(parts[0]).map_err(|_| Error::DateSequence {
        reason: format!("Year {} is out of range", parts[0]),
    })?;
    let month = calendar_component(parts[1], "Month")?;
    let day = calendar_component(parts[2], "Day")?;
    let hour = calendar_component(parts.get(3).copied().unwrap_or(0), "Hour")?;
    let minute = calendar_component(parts.get(4).copied().unwrap_or(0), "Minute")?;
    let second = calendar_component(parts.get(5).copied().unwrap_or(0), "Second")?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| Error::DateSequence {
        reason: format!("'{}-{}-{}' is not a valid calendar date", year, month, day),
    })?;
    let datetime = date
        .and_hms_opt(hour, minute, second)
        .ok_or_else(|| Error::DateSequence {
            reason: format!("'{}:{}:{}' is not a valid time", hour, minute, second),
        })?;

    Ok(datetime.and_utc().timestamp_millis())
}

/// 日時の1要素を非負の`u32`として検証する。
fn calendar_component(value: i64, name: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::DateSequence {
        reason: format!("{} {} is out of range", name, value),
    })
}

/// カンマ区切りの整数文字列(例: `"2024,5,15"`)を`DateSpec`へ変換する。
///
/// 各トークンは前後の空白を取り除いてから整数として解釈する。
/// 整数にならないトークンや不正なカレンダー日時はエラーとなる。
pub fn parse_date_spec(text: &str) -> Result<DateSpec> {
    let parts = text
        .split(',')
        .map(|token| {
            token.trim().parse::<i64>().map_err(|_| Error::DateType {
                reason: format!("'{}' is not an integer", token.trim()),
            })
        })
        .collect::<Result<Vec<i64>>>()?;

    let date = DateSpec::from(parts);
    date.to_unix_millis()?;

    Ok(date)
}

/// カンマ区切りの整数文字列(例: `"2024,5,15"`)をミリ秒へ変換する。
pub fn date_string_to_unix_millis(text: &str) -> Result<i64> {
    parse_date_spec(text)?.to_unix_millis()
}

/// `(days, hours, minutes)`の3要素をミリ秒の見積り時間へ変換する。
pub fn time_estimate_to_millis(estimate: &[i64]) -> Result<i64> {
    if estimate.len() != 3 {
        return Err(Error::TimeEstimate);
    }
    let (days, hours, minutes) = (estimate[0], estimate[1], estimate[2]);
    if days < 0 || hours < 0 || minutes < 0 {
        return Err(Error::TimeEstimate);
    }

    Ok(((days * 24 + hours) * 60 + minutes) * 60 * 1000)
}

/// ミリ秒の累計を`H:MM:SS`形式の文字列にする。
///
/// 秒未満は切り捨てる。負のdurationは実行中のタイマーを表すため、
/// 符号を先頭に付けて絶対値で表示する。
pub fn format_hms(millis: i64) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let total_seconds = millis.abs() / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}{}:{:02}:{:02}", sign, hours, minutes, seconds)
}

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}


#[cfg(test)]
pub use mock_datetime::now;
