//! Region allow-list and year extraction

use regex::Regex;
use std::sync::LazyLock;

/// Region folder names processed in batch mode
pub const REGION_NAMES: &[&str] = &[
    "千代田区",
    "中央区",
    "港区",
    "新宿区",
    "文京区",
    "台東区",
    "墨田区",
    "江東区",
    "品川区",
    "目黒区",
    "大田区",
    "世田谷区",
    "渋谷区",
    "中野区",
    "杉並区",
    "豊島区",
    "北区",
    "荒川区",
    "板橋区",
    "練馬区",
    "足立区",
    "葛飾区",
    "江戸川区",
];

/// Year value when none can be derived
pub const UNKNOWN_YEAR: &str = "不明";

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(202[0-9])_校則").expect("year pattern is valid"));

/// True when `name` is exactly an allow-listed region
pub fn is_recognized_region(name: &str) -> bool {
    REGION_NAMES.contains(&name)
}

/// Year token from a folder name such as `2025_校則データ`
///
/// # Examples
///
/// ```
/// use dresscode_collector::region::extract_year;
///
/// assert_eq!(extract_year("2025_校則データ"), "2025");
/// assert_eq!(extract_year("校則データ"), "不明");
/// ```
pub fn extract_year(folder_name: &str) -> String {
    YEAR_PATTERN
        .captures(folder_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}
