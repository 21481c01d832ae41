//! 表格题
//!
//! 下载页面链接的 CSV，对选中的数值列求和（给出阈值时只累加小于阈值的值）。

use tracing::{info, warn};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::infrastructure::HttpTransport;
use crate::models::{Answer, ExtractedContent};

/// 视为缺失值的单元格内容
const MISSING_MARKERS: [&str; 6] = ["", "NA", "N/A", "NaN", "nan", "null"];

/// 求解表格题
///
/// 页面中没有 CSV 链接时返回 `0`。
pub async fn solve(
    transport: &dyn HttpTransport,
    content: &ExtractedContent,
    quiz_url: &str,
    cutoff: Option<f64>,
) -> AppResult<Answer> {
    let Some(csv_url) = find_csv_link(content, quiz_url) else {
        warn!("[表格题] 页面中没有 CSV 链接，答案取 0");
        return Ok(Answer::Integer(0));
    };

    info!("[表格题] 正在下载 CSV: {}", csv_url);
    let csv_text = transport.get_text(&csv_url).await?;
    let total = sum_column(&csv_text, cutoff)?;

    match cutoff {
        Some(c) => info!("[表格题] 最终答案 = 小于阈值 {} 的值之和 = {}", c, total),
        None => info!("[表格题] 最终答案 = 全部值之和 = {}", total),
    }
    Ok(Answer::Float(total))
}

/// 第一个以 `.csv` 结尾的链接（相对当前页面解析）
fn find_csv_link(content: &ExtractedContent, quiz_url: &str) -> Option<String> {
    let base = Url::parse(quiz_url).ok()?;
    content
        .dom
        .links
        .iter()
        .find(|href| href.to_ascii_lowercase().ends_with(".csv"))
        .and_then(|href| base.join(href).ok())
        .map(|u| u.to_string())
}

/// 对 CSV 中选中的列求和
///
/// 第一行为表头。选择第一个全部（非缺失）单元格都是数字的列；
/// 没有这样的列时使用第一列，非数字单元格按 0 计。
pub fn sum_column(csv_text: &str, cutoff: Option<f64>) -> AppResult<f64> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let width = reader.headers()?.len();
    if width == 0 {
        return Err(AppError::Tabular {
            reason: "CSV 没有任何列".to_string(),
        });
    }
    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

    let values: Vec<f64> = match (0..width).find(|&idx| is_numeric_column(&column(&rows, idx))) {
        Some(idx) => column(&rows, idx).into_iter().filter_map(parse_number).collect(),
        None => {
            warn!("[表格题] 没有纯数值列，将第一列强制转换为数字");
            column(&rows, 0)
                .into_iter()
                .map(|cell| parse_number(cell).unwrap_or(0.0))
                .collect()
        }
    };

    let total: f64 = match cutoff {
        Some(c) => values.iter().filter(|v| **v < c).sum(),
        None => values.iter().sum(),
    };
    Ok(total)
}

fn column(rows: &[csv::StringRecord], idx: usize) -> Vec<&str> {
    rows.iter().map(|r| r.get(idx).unwrap_or("")).collect()
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

fn parse_number(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_numeric_column(cells: &[&str]) -> bool {
    let mut present = cells.iter().copied().filter(|c| !is_missing(c)).peekable();
    present.peek().is_some() && present.all(|c| parse_number(c).is_some())
}
