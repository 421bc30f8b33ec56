use crate::core::parse::{parse_duration, parse_payout, parse_work_date, try_parse_rate};
use crate::core::{ConfigProvider, Pipeline, Record, ReportPeriod, ReportSummary, Storage, Task, TransformResult};
use crate::utils::error::{EtlError, Result};
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

// 會被合併成單一任務的計費類型
const GROUPED_PAY_TYPES: [&str; 3] = ["prepay", "overtimepay", "overtime"];

const WORK_DATE_COLUMN: &str = "workDate";
const ITEM_ID_COLUMN: &str = "itemID";
const DURATION_COLUMN: &str = "duration";
const PAY_TYPE_COLUMN: &str = "payType";
const PROJECT_COLUMN: &str = "projectName";
const STATUS_COLUMN: &str = "status";

pub struct EarningsPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> EarningsPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

/// prepay 與 overtime 在 itemID + 工作日相同時合併
#[derive(Debug)]
struct TaskGroup {
    work_date: NaiveDate,
    item_id: String,
    project: String,
    status: String,
    prepay: Option<(f64, f64)>,   // (duration hours, payout)
    overtime: Option<(f64, f64)>,
}

impl TaskGroup {
    fn add(slot: &mut Option<(f64, f64)>, duration: f64, payout: f64) {
        match slot {
            Some((d, p)) => {
                *d += duration;
                *p += payout;
            }
            None => *slot = Some((duration, payout)),
        }
    }

    fn into_task(self) -> Option<Task> {
        let description = format!(
            "Task {} - {} - {}",
            self.item_id, self.project, self.status
        );

        match (self.prepay, self.overtime) {
            // 只有 overtime 沒有 prepay 時仍要產生任務
            (None, Some((ot_duration, ot_payout))) => Some(Task {
                work_date: self.work_date,
                description,
                hours: ot_duration,
                tasking_hours: 0.0,
                exceed_hours: ot_duration,
                amount: ot_payout,
            }),
            (Some((pre_duration, pre_payout)), overtime) => {
                let (ot_duration, ot_payout) = overtime.unwrap_or((0.0, 0.0));
                Some(Task {
                    work_date: self.work_date,
                    description,
                    hours: pre_duration + ot_duration,
                    tasking_hours: pre_duration,
                    exceed_hours: ot_duration,
                    amount: pre_payout + ot_payout,
                })
            }
            (None, None) => None,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for EarningsPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::debug!(
            "Reading earnings report from: {}",
            self.config.source_path()
        );
        let bytes = self.storage.read_file(self.config.source_path()).await?;

        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        let headers = reader.headers()?.clone();
        if !headers.iter().any(|h| h == self.config.payout_column()) {
            return Err(EtlError::MissingColumnError {
                column: self.config.payout_column().to_string(),
            });
        }

        let mut records = Vec::new();
        for row in reader.deserialize::<HashMap<String, String>>() {
            records.push(Record { data: row? });
        }

        tracing::debug!("Extracted {} rows", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let period = self.config.period().parse::<ReportPeriod>().map_err(|reason| {
            EtlError::InvalidConfigValueError {
                field: "period".to_string(),
                value: self.config.period().to_string(),
                reason,
            }
        })?;
        let today = Utc::now().date_naive();

        let payout_column = self.config.payout_column();
        let mut summary = ReportSummary::default();
        let mut tasks = Vec::new();
        let mut grouped: BTreeMap<String, TaskGroup> = BTreeMap::new();

        for record in &data {
            let work_date = record.field(WORK_DATE_COLUMN).and_then(parse_work_date);

            // 期間過濾：啟用時沒有可解析日期的列一併剔除
            if period != ReportPeriod::All {
                match work_date {
                    Some(date) if period.contains(today, date) => {}
                    _ => continue,
                }
            }

            let raw_payout = record.field(payout_column).unwrap_or("");
            let rate = match try_parse_rate(raw_payout) {
                Some(value) => value,
                None => {
                    summary.malformed_payouts += 1;
                    tracing::warn!(
                        "Malformed payout value '{}', treating as 0",
                        raw_payout.trim()
                    );
                    0.0
                }
            };
            summary.total_rate += rate;
            if rate > 0.0 {
                summary.positive_items += 1;
            }

            // 分組只處理三個欄位齊全的列，其他列仍計入上面的總計
            let pay_type = match record.field(PAY_TYPE_COLUMN) {
                Some(value) if !value.trim().is_empty() => value.trim(),
                _ => continue,
            };
            let item_id = match record.field(ITEM_ID_COLUMN) {
                Some(value) if !value.trim().is_empty() => value.trim(),
                _ => continue,
            };
            let date = match work_date {
                Some(date) => date,
                None => continue,
            };

            let duration = parse_duration(record.field(DURATION_COLUMN).unwrap_or(""));
            let payout = parse_payout(raw_payout);
            let project = record.field(PROJECT_COLUMN).unwrap_or("").trim();
            let pay_type_lc = pay_type.to_lowercase();

            if GROUPED_PAY_TYPES.contains(&pay_type_lc.as_str()) {
                let key = format!("{}-{}", item_id, date.format("%Y-%m-%d"));
                let group = grouped.entry(key).or_insert_with(|| TaskGroup {
                    work_date: date,
                    item_id: item_id.to_string(),
                    project: project.to_string(),
                    status: record.field(STATUS_COLUMN).unwrap_or("").trim().to_string(),
                    prepay: None,
                    overtime: None,
                });

                if pay_type_lc == "prepay" {
                    TaskGroup::add(&mut group.prepay, duration, payout);
                } else {
                    TaskGroup::add(&mut group.overtime, duration, payout);
                }
            } else {
                // 其他計費類型逐列成為任務；hubstaffOperation 的時數計入 tasking
                let hours = if pay_type_lc == "hubstaffoperation" {
                    duration
                } else {
                    0.0
                };
                tasks.push(Task {
                    work_date: date,
                    description: format!("{} - {} - {}", pay_type, project, item_id),
                    hours,
                    tasking_hours: hours,
                    exceed_hours: 0.0,
                    amount: payout,
                });
            }
        }

        tasks.extend(grouped.into_values().filter_map(TaskGroup::into_task));

        summary.task_count = tasks.len();
        summary.total_hours = tasks.iter().map(|t| t.hours).sum();
        summary.total_amount = tasks.iter().map(|t| t.amount).sum();

        if summary.malformed_payouts > 0 {
            tracing::warn!(
                "{} rows had malformed payout values and were counted as 0",
                summary.malformed_payouts
            );
        }

        Ok(TransformResult { tasks, summary })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        // stdout 只輸出報表行，其他訊息都走日誌
        println!("Total Rate Applied: ${:.2}", result.summary.total_rate);
        println!("Total Items Counted: {}", result.summary.positive_items);

        let formats = self.config.output_formats();
        let want_csv = formats.iter().any(|f| f == "csv");
        let want_json = formats.iter().any(|f| f == "json");

        let csv_output = if want_csv {
            Some(tasks_to_csv(&result.tasks)?)
        } else {
            None
        };
        let json_output = if want_json {
            Some(serde_json::to_string_pretty(&result.summary)?)
        } else {
            None
        };

        if self.config.compress_output() {
            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

                if let Some(csv_output) = &csv_output {
                    zip.start_file::<_, ()>("tasks.csv", FileOptions::default())?;
                    zip.write_all(csv_output.as_bytes())?;
                }

                if let Some(json_output) = &json_output {
                    zip.start_file::<_, ()>("summary.json", FileOptions::default())?;
                    zip.write_all(json_output.as_bytes())?;
                }

                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            tracing::debug!("Writing ZIP bundle ({} bytes) to storage", zip_data.len());
            self.storage
                .write_file("earnings_report.zip", &zip_data)
                .await?;

            return Ok(format!(
                "{}/earnings_report.zip",
                self.config.output_path()
            ));
        }

        if let Some(csv_output) = &csv_output {
            self.storage
                .write_file("tasks.csv", csv_output.as_bytes())
                .await?;
        }
        if let Some(json_output) = &json_output {
            self.storage
                .write_file("summary.json", json_output.as_bytes())
                .await?;
        }

        Ok(self.config.output_path().to_string())
    }
}

fn tasks_to_csv(tasks: &[Task]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for task in tasks {
        writer.serialize(task)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::ProcessingError {
            message: format!("CSV writer finalization failed: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output was not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        source_path: String,
        output_path: String,
        payout_column: String,
        period: String,
        output_formats: Vec<String>,
        compress: bool,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                source_path: "earnings.csv".to_string(),
                output_path: "test_output".to_string(),
                payout_column: "payout".to_string(),
                period: "all".to_string(),
                output_formats: vec!["csv".to_string(), "json".to_string()],
                compress: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn source_path(&self) -> &str {
            &self.source_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn payout_column(&self) -> &str {
            &self.payout_column
        }

        fn period(&self) -> &str {
            &self.period
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn compress_output(&self) -> bool {
            self.compress
        }
    }

    async fn pipeline_with(csv_data: &str) -> EarningsPipeline<MockStorage, MockConfig> {
        let storage = MockStorage::new();
        storage.put_file("earnings.csv", csv_data.as_bytes()).await;
        EarningsPipeline::new(storage, MockConfig::new())
    }

    #[tokio::test]
    async fn test_extract_rejects_missing_payout_column() {
        let pipeline = pipeline_with("workDate,itemID\n2025-02-18,abc\n").await;

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::MissingColumnError { .. }));
    }

    #[tokio::test]
    async fn test_transform_totals_and_positive_count() {
        let pipeline = pipeline_with(
            "workDate,itemID,payout\n\
             2025-02-18,a,$10.00/hr\n\
             2025-02-18,b,-\n\
             2025-02-19,c,$5.25/hr\n",
        )
        .await;

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();

        assert!((result.summary.total_rate - 15.25).abs() < 1e-9);
        assert_eq!(result.summary.positive_items, 2);
        assert_eq!(result.summary.malformed_payouts, 0);
    }

    #[tokio::test]
    async fn test_transform_counts_malformed_payouts() {
        let pipeline = pipeline_with(
            "workDate,itemID,payout\n\
             2025-02-18,a,garbage\n\
             2025-02-18,b,$3.00/hr\n",
        )
        .await;

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();

        assert!((result.summary.total_rate - 3.0).abs() < 1e-9);
        assert_eq!(result.summary.malformed_payouts, 1);
    }

    #[tokio::test]
    async fn test_transform_groups_prepay_and_overtime() {
        let pipeline = pipeline_with(
            "workDate,itemID,duration,payType,payout,projectName,status\n\
             2025-02-18,item1,1h,prepay,$10.00,Proj,done\n\
             2025-02-18,item1,30m,overtime,$5.00,Proj,done\n\
             2025-02-18,item2,15m,overtimePay,$2.50,Proj,done\n",
        )
        .await;

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();

        assert_eq!(result.tasks.len(), 2);

        let merged = result
            .tasks
            .iter()
            .find(|t| t.description.contains("item1"))
            .unwrap();
        assert!((merged.tasking_hours - 1.0).abs() < 1e-9);
        assert!((merged.exceed_hours - 0.5).abs() < 1e-9);
        assert!((merged.hours - 1.5).abs() < 1e-9);
        assert!((merged.amount - 15.0).abs() < 1e-9);

        // overtime without prepay still yields a task
        let overtime_only = result
            .tasks
            .iter()
            .find(|t| t.description.contains("item2"))
            .unwrap();
        assert_eq!(overtime_only.tasking_hours, 0.0);
        assert!((overtime_only.exceed_hours - 0.25).abs() < 1e-9);
        assert!((overtime_only.amount - 2.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_transform_individual_pay_types() {
        let pipeline = pipeline_with(
            "workDate,itemID,duration,payType,payout,projectName,status\n\
             2025-02-18,item1,47m 46s,hubstaffOperation,$7.96,Ops,done\n\
             2025-02-18,item2,-,missionReward,$25.00,Promo,done\n",
        )
        .await;

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();

        assert_eq!(result.tasks.len(), 2);

        let hubstaff = &result.tasks[0];
        assert!(hubstaff.description.starts_with("hubstaffOperation"));
        assert!((hubstaff.hours - (47.0 / 60.0 + 46.0 / 3600.0)).abs() < 1e-9);
        assert_eq!(hubstaff.tasking_hours, hubstaff.hours);

        let reward = &result.tasks[1];
        assert_eq!(reward.hours, 0.0);
        assert!((reward.amount - 25.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_load_writes_outputs_and_prints_report() {
        let pipeline = pipeline_with(
            "workDate,itemID,duration,payType,payout,projectName,status\n\
             2025-02-18,item1,1h,prepay,$10.00,Proj,done\n",
        )
        .await;

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_output");

        let tasks_csv = pipeline.storage.get_file("tasks.csv").await.unwrap();
        let tasks_csv = String::from_utf8(tasks_csv).unwrap();
        assert!(tasks_csv.contains("work_date"));
        assert!(tasks_csv.contains("Task item1 - Proj - done"));

        let summary_json = pipeline.storage.get_file("summary.json").await.unwrap();
        let summary: ReportSummary = serde_json::from_slice(&summary_json).unwrap();
        assert_eq!(summary.task_count, 1);
    }

    #[tokio::test]
    async fn test_load_compressed_bundle() {
        let storage = MockStorage::new();
        storage
            .put_file(
                "earnings.csv",
                b"workDate,itemID,payout\n2025-02-18,a,$1.00/hr\n",
            )
            .await;
        let mut config = MockConfig::new();
        config.compress = true;
        let pipeline = EarningsPipeline::new(storage, config);

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert!(output_path.ends_with("earnings_report.zip"));

        let zip_data = pipeline
            .storage
            .get_file("earnings_report.zip")
            .await
            .unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"tasks.csv".to_string()));
        assert!(names.contains(&"summary.json".to_string()));
    }
}
