use earnings_etl::core::parse::parse_rate;
use std::env;
use std::error::Error;
use std::fs::File;

// 單檔快速加總：只印出總費率，不做分組或檔案輸出
fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "./uploads/Outlier_Earnings_Report (3).csv".to_string());

    let file = File::open(&path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    let payout_idx = headers
        .iter()
        .position(|h| h == "payout")
        .ok_or("input file has no 'payout' column")?;

    let mut total_rate = 0.0_f64;
    for row in reader.records() {
        let row = row?;
        total_rate += parse_rate(row.get(payout_idx).unwrap_or(""));
    }

    println!("Total Rate Applied: ${:.2}", total_rate);

    Ok(())
}
