use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::{Error, Result};

/// フィルタリストの穴埋めに使うランダム値の生成元。
///
/// ClickUp APIは1要素の配列フィルタを不正な単一値として扱うため、
/// 1要素のリストには無意味な値を1つ追加して送信する必要がある。
/// テストで穴埋め結果を検証できるように生成元をtraitとして注入する。
#[cfg_attr(test, mockall::automock)]
pub trait FillerSource {
    /// 8文字の英数字文字列を返す。
    fn string_filler(&self) -> String;

    /// 8桁以下の非負整数を返す。
    fn numeric_filler(&self) -> i64;
}

/// 乱数による`FillerSource`の実装。
#[derive(Debug, Default)]
pub struct RandomFiller;

impl FillerSource for RandomFiller {
    fn string_filler(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect()
    }

    // 8桁の数字を並べた値に相当するため、先頭の桁が0になる値も許容する。
    fn numeric_filler(&self) -> i64 {
        rand::thread_rng().gen_range(0..100_000_000)
    }
}

/// 1要素の文字列リストにランダムな文字列を1つ追加する。
///
/// 空のリストと2要素以上のリストはそのまま返す。
pub fn adjust_string_list(mut list: Vec<String>, filler: &dyn FillerSource) -> Vec<String> {
    if list.len() == 1 {
        list.push(filler.string_filler());
    }
    list
}

/// 1要素の整数リストにランダムな整数を1つ追加する。
///
/// 空のリストと2要素以上のリストはそのまま返す。
pub fn adjust_numeric_list(mut list: Vec<i64>, filler: &dyn FillerSource) -> Vec<i64> {
    if list.len() == 1 {
        list.push(filler.numeric_filler());
    }
    list
}

/// 1要素のリストに入ったカンマ区切り文字列を複数要素の文字列リストへ展開する。
///
/// 分割結果が1要素の場合はランダムな文字列で穴埋めする。
/// 2要素以上のリストは検証せずそのまま返す。
pub fn split_string_array(list: Vec<String>, filler: &dyn FillerSource) -> Vec<String> {
    if list.is_empty() || list.len() > 1 {
        return list;
    }

    let split: Vec<String> = list[0]
        .split(',')
        .map(|token| token.trim().to_string())
        .collect();

    adjust_string_list(split, filler)
}

/// 1要素のリストに入ったカンマ区切り文字列を整数リストへ展開する。
///
/// リストは必ず1要素でなければならず、各トークンは整数として解釈できる
/// 必要がある。分割結果が1要素の場合はランダムな整数で穴埋めする。
pub fn split_int_array(list: Vec<String>, filler: &dyn FillerSource) -> Result<Vec<i64>> {
    if list.is_empty() {
        return Ok(vec![]);
    }
    if list.len() != 1 {
        return Err(Error::InvalidValue(
            "The list must contain a single string element with numbers \
             separated by commas."
                .to_string(),
        ));
    }

    let values = list[0]
        .trim_matches(',')
        .split(',')
        .map(|token| {
            token.trim().parse::<i64>().map_err(|_| {
                Error::InvalidValue(
                    "The list must contain a single string with numbers \
                     separated by commas."
                        .to_string(),
                )
            })
        })
        .collect::<Result<Vec<i64>>>()?;

    Ok(adjust_numeric_list(values, filler))
}

/// booleanをClickUp APIのクエリパラメータで要求されるリテラル文字列にする。
pub fn bool_query(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
