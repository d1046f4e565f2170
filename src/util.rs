use chrono::{DateTime, Utc};
use std::fmt::Write;
use crate::models::stock::StockRecord;
use crate::errors::{Result, LensError};

// 交易日时间戳 -> YYYY-MM-DD (UTC)
pub fn format_session_date(timestamp: i64) -> Result<String> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .ok_or_else(|| LensError::DataError(format!("Invalid timestamp: {}", timestamp)))
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn text(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

// 缺失或越界的时间戳显示为 "-"
fn session_label(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|ts| format_session_date(ts).ok())
        .unwrap_or_else(|| "-".to_string())
}

fn pair_row(out: &mut String, left: (&str, String), right: (&str, String)) -> std::fmt::Result {
    writeln!(out, "{:<14} {:<12} {:<14} {:<12}", left.0, left.1, right.0, right.1)
}

/// Human-readable view of a record for the terminal.
pub fn render_table(record: &StockRecord, limit: usize) -> Result<String> {
    let mut out = String::new();
    write_table(&mut out, record, limit).map_err(|e| LensError::Unknown(e.to_string()))?;
    Ok(out)
}

fn write_table(out: &mut String, record: &StockRecord, limit: usize) -> std::fmt::Result {
    let trend = record.trend.map(|t| format!("{:?}", t).to_lowercase());
    let owned = |value: Option<&str>| text(value).to_string();

    writeln!(
        out,
        "{} ({}) - {} {}",
        record.name,
        record.symbol,
        text(record.exchange.as_deref()),
        text(record.currency.as_deref())
    )?;
    writeln!(out, "{:-<60}", "")?;
    pair_row(out, ("Price", cell(record.price)), ("Prev close", cell(record.prev_close)))?;
    pair_row(out, ("Change", cell(record.change)), ("Change %", cell(record.percent_change)))?;
    pair_row(out, ("Open", cell(record.open)), ("Volume", cell(record.volume)))?;
    pair_row(out, ("High", cell(record.high)), ("Low", cell(record.low)))?;
    pair_row(
        out,
        ("52w high", cell(record.fifty_two_week_high)),
        ("52w low", cell(record.fifty_two_week_low)),
    )?;
    pair_row(
        out,
        ("Avg price", cell(record.fifty_day_ma)),
        ("Avg volume", cell(record.avg_volume)),
    )?;
    pair_row(out, ("Trend", owned(trend.as_deref())), ("Volatility", cell(record.volatility)))?;
    pair_row(
        out,
        ("Sector", owned(record.sector.as_deref())),
        ("Industry", owned(record.industry.as_deref())),
    )?;
    pair_row(out, ("Market cap", cell(record.market_cap)), ("Beta", cell(record.beta)))?;
    writeln!(out, "{:<14} {}", "Domain", text(record.domain.as_deref()))?;
    writeln!(out, "{:<14} {}", "Logo", text(record.logo.as_deref()))?;

    // 修复后的收盘价过滤了空值；长度不一致时无法按下标对齐日期
    let dated = record.closes.len() == record.timestamps.len();
    let skip = record.closes.len().saturating_sub(limit);

    writeln!(out, "{:-<60}", "")?;
    writeln!(out, "{:<12} {:<10}", "Date", "Close")?;
    for (i, close) in record.closes.iter().enumerate().skip(skip) {
        let date = if dated {
            session_label(record.timestamps[i])
        } else {
            "-".to_string()
        };
        writeln!(out, "{:<12} {:<10.2}", date, close)?;
    }
    if skip > 0 {
        writeln!(out, "... and {} earlier sessions", skip)?;
    }

    Ok(())
}
