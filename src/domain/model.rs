use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// 一列 CSV 資料，欄位名稱對應原始字串值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, String>,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(|s| s.as_str())
    }
}

/// 合併後的收入任務（prepay/overtime 分組的結果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub work_date: NaiveDate,
    pub description: String,
    /// tasking_hours + exceed_hours
    pub hours: f64,
    pub tasking_hours: f64,
    pub exceed_hours: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_rate: f64,
    pub positive_items: usize,
    pub task_count: usize,
    pub total_hours: f64,
    pub total_amount: f64,
    pub malformed_payouts: usize,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub tasks: Vec<Task>,
    pub summary: ReportSummary,
}

/// 報表期間過濾。週以 UTC 星期日為開始。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Daily,
    Weekly,
    Monthly,
    All,
}

impl ReportPeriod {
    /// Half-open [start, end) date window anchored at `today`.
    /// `All` has no window.
    pub fn utc_range(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            ReportPeriod::Daily => Some((today, today + Duration::days(1))),
            ReportPeriod::Weekly => {
                let offset = today.weekday().num_days_from_sunday() as i64;
                let start = today - Duration::days(offset);
                Some((start, start + Duration::days(7)))
            }
            ReportPeriod::Monthly => {
                let start = today.with_day(1)?;
                let end = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)?
                };
                Some((start, end))
            }
            ReportPeriod::All => None,
        }
    }

    pub fn contains(self, today: NaiveDate, date: NaiveDate) -> bool {
        match self.utc_range(today) {
            Some((start, end)) => date >= start && date < end,
            None => true,
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(ReportPeriod::Daily),
            "weekly" => Ok(ReportPeriod::Weekly),
            "monthly" => Ok(ReportPeriod::Monthly),
            "all" => Ok(ReportPeriod::All),
            other => Err(format!(
                "Unknown period '{}'. Valid periods: daily, weekly, monthly, all",
                other
            )),
        }
    }
}
