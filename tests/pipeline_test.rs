use anyhow::Result;
use cafe_sales_cleaner::config::Config;
use cafe_sales_cleaner::error::CleanerError;
use cafe_sales_cleaner::pipeline::Pipeline;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DIRTY_CSV: &str = "\
Transaction ID,Item,Quantity,Price Per Unit,Total Spent,Payment Method,Location,Transaction Date
TXN_1961373,Coffee,2,2.0,4.0,Credit Card,Takeaway,2023-09-08
TXN_4977031,Cake,4,3.0,12.0,Cash,In-store,2023-05-16
TXN_4271903,Cookie,4,1.0,ERROR,Credit Card,In-store,2023-07-19
TXN_7034554,Salad,2,5.0,10.0,UNKNOWN,UNKNOWN,2023-04-27
TXN_3160411,Coffee,2,2.0,4.0,Digital Wallet,In-store,2023-06-11
TXN_2602893,Smoothie,5,4.0,20.0,Credit Card,,2023-03-31
TXN_4433211,UNKNOWN,3,3.0,9.0,ERROR,Takeaway,2023-10-06
TXN_6699534,Sandwich,4,4.0,16.0,Cash,UNKNOWN,2023-10-28
TXN_4717867,,5,3.0,15.0,,Takeaway,2023-07-28
TXN_2064365,Sandwich,5,4.0,20.0,,In-store,2023-12-31
TXN_2548360,Salad,5,5.0,25.0,Cash,Takeaway,2023-11-07
TXN_7619095,Sandwich,2,4.0,8.0,Cash,In-store,2023-05-03
TXN_3567645,Smoothie,4,4.0,16.0,Credit Card,Takeaway,2023-06-01
TXN_5522041,ERROR,1,5.0,5.0,cash,in-store,2023-03-07
TXN_1736287,juice,3,3.0,,Digital Wallet,Takeaway,2023-10-22
TXN_9437049,Cookie,5,1.0,5.0,,Takeaway,ERROR
TXN_8915701,ERROR,2,1.5,3.0,Cash,In-store,2023-01-16
TXN_2847255,Salad,3,5.0,15.0,Cash,In-store,
TXN_3765707,Tea,1,1.5,1.5,Digital Wallet,UNKNOWN,2023-09-27
TXN_6769710,Juice,2,3.0,7.0,Cash,In-store,2023-07-22
";

fn run_on(input: &str, dir: &Path, configure: impl FnOnce(&mut Config)) -> Result<cafe_sales_cleaner::pipeline::PipelineResult> {
    let input_path = dir.join("dirty_cafe_sales.csv");
    fs::write(&input_path, input)?;

    let mut config = Config::default();
    config.input.path = input_path;
    config.output.dir = dir.join("out");
    configure(&mut config);

    Ok(Pipeline::new(config).run()?)
}

#[test]
fn test_full_run_writes_clean_outputs() -> Result<()> {
    let temp_dir = tempdir()?;
    let result = run_on(DIRTY_CSV, temp_dir.path(), |_| {})?;

    // Rows with a bad total, a missing total, a bad date and a missing date are dropped
    assert_eq!(result.audit.row_count, 20);
    assert_eq!(result.missing.dropped_rows, 4);
    assert_eq!(result.records.len(), 16);

    let csv_path = temp_dir.path().join("out").join("cafe_sales_clean.csv");
    let xlsx_path = temp_dir.path().join("out").join("cafe_sales_final.xlsx");
    assert!(csv_path.exists());
    assert!(xlsx_path.exists());
    assert_eq!(result.output_files.len(), 2);

    let mut reader = csv::Reader::from_path(&csv_path)?;
    let headers = reader.headers()?.clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "transaction_id",
            "item",
            "quantity",
            "price_per_unit",
            "total_spent",
            "payment_method",
            "location",
            "transaction_date"
        ]
    );

    let mut rows = 0;
    for record in reader.records() {
        let record = record?;
        rows += 1;
        // Every field is populated
        for field in record.iter() {
            assert!(!field.is_empty(), "empty field in {:?}", record);
        }
        // Numeric fields parse and the date is ISO formatted
        for idx in 2..5 {
            record[idx].parse::<f64>()?;
        }
        chrono::NaiveDate::parse_from_str(&record[7], "%Y-%m-%d")?;
        // No raw error tokens survive
        for idx in [1, 5, 6] {
            assert!(!["ERROR", "Error", "UNKNOWN", "unknown"].contains(&&record[idx]));
        }
    }
    assert_eq!(rows, 16);
    Ok(())
}

#[test]
fn test_deductive_imputation_on_real_shape() -> Result<()> {
    let temp_dir = tempdir()?;
    let result = run_on(DIRTY_CSV, temp_dir.path(), |c| c.output.write_xlsx = false)?;

    let item_of = |id: &str| {
        result
            .records
            .iter()
            .find(|r| r.transaction_id.as_deref() == Some(id))
            .map(|r| r.item.clone())
    };

    // 3.0 is shared by Cake and Juice, so it is ambiguous
    assert_eq!(item_of("TXN_4433211").as_deref(), Some("Unknown"));
    assert_eq!(item_of("TXN_4717867").as_deref(), Some("Unknown"));
    // 5.0 is only ever Salad
    assert_eq!(item_of("TXN_5522041").as_deref(), Some("Salad"));
    // 1.5 is only ever Tea
    assert_eq!(item_of("TXN_8915701").as_deref(), Some("Tea"));

    assert_eq!(result.imputation.unknown_before, 4);
    assert_eq!(result.imputation.unknown_after, 2);
    assert_eq!(result.imputation.recovered, 2);
    Ok(())
}

#[test]
fn test_text_normalization_and_sentinels() -> Result<()> {
    let temp_dir = tempdir()?;
    let result = run_on(DIRTY_CSV, temp_dir.path(), |c| c.output.write_xlsx = false)?;

    let txn = result
        .records
        .iter()
        .find(|r| r.transaction_id.as_deref() == Some("TXN_5522041"))
        .unwrap();
    assert_eq!(txn.payment_method, "Cash");
    assert_eq!(txn.location, "In-Store");

    for record in &result.records {
        assert!(!record.item.is_empty());
        assert!(!record.payment_method.is_empty());
        assert!(!record.location.is_empty());
        assert_ne!(record.payment_method, "Error");
    }
    Ok(())
}

#[test]
fn test_math_check_and_revenue() -> Result<()> {
    let temp_dir = tempdir()?;
    let result = run_on(DIRTY_CSV, temp_dir.path(), |c| c.output.write_xlsx = false)?;

    // Only the Juice sale at 2 x 3.0 recorded as 7.0 disagrees
    assert_eq!(result.math_check.flagged, 1);
    assert_eq!(result.math_check.sample[0].transaction_id.as_deref(), Some("TXN_6769710"));

    let expected: f64 = result.records.iter().map(|r| r.total_spent).sum();
    assert!((result.summary.total_revenue - expected).abs() < 1e-9);
    assert!((result.summary.total_revenue - 175.5).abs() < 1e-9);

    let top: Vec<&str> = result.summary.top_items.iter().map(|t| t.item.as_str()).collect();
    assert_eq!(top[0], "Sandwich");
    assert_eq!(result.summary.top_items.len(), 5);
    Ok(())
}

#[test]
fn test_summary_json_written_when_enabled() -> Result<()> {
    let temp_dir = tempdir()?;
    let result = run_on(DIRTY_CSV, temp_dir.path(), |c| {
        c.output.write_xlsx = false;
        c.output.summary_json = true;
    })?;

    let summary_path = temp_dir.path().join("out").join("cleaning_summary.json");
    assert!(summary_path.exists());
    assert_eq!(result.output_files.len(), 2);

    let summary: serde_json::Value = serde_json::from_str(&fs::read_to_string(summary_path)?)?;
    assert_eq!(summary["imputation"]["recovered"], 2);
    assert_eq!(summary["missing"]["dropped_rows"], 4);
    assert!(summary.get("records").is_none());
    Ok(())
}

#[test]
fn test_missing_input_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let mut config = Config::default();
    config.input.path = temp_dir.path().join("nope.csv");
    config.output.dir = temp_dir.path().to_path_buf();

    let result = Pipeline::new(config).run();
    assert!(matches!(result, Err(CleanerError::Input { .. })));
    assert!(!temp_dir.path().join("cafe_sales_clean.csv").exists());
}

#[test]
fn test_rerunning_on_clean_output_is_stable() -> Result<()> {
    let temp_dir = tempdir()?;
    run_on(DIRTY_CSV, temp_dir.path(), |c| c.output.write_xlsx = false)?;
    let first = fs::read_to_string(temp_dir.path().join("out").join("cafe_sales_clean.csv"))?;

    let second_dir = tempdir()?;
    let second = run_on(&first, second_dir.path(), |c| c.output.write_xlsx = false)?;

    assert_eq!(second.missing.dropped_rows, 0);
    assert_eq!(second.normalization.labels_changed, 0);
    assert_eq!(second.imputation.recovered, 0);
    let rerun = fs::read_to_string(second_dir.path().join("out").join("cafe_sales_clean.csv"))?;
    assert_eq!(first, rerun);
    Ok(())
}

#[test]
fn test_out_of_range_dates_are_dropped_before_export() -> Result<()> {
    let input = "\
Transaction ID,Item,Quantity,Price Per Unit,Total Spent,Payment Method,Location,Transaction Date
TXN_1,Coffee,2,2.0,4.0,Cash,Takeaway,2023-09-08
TXN_2,Tea,1,1.5,1.5,Cash,Takeaway,+70000-01-01
TXN_3,Cake,1,3.0,3.0,Cash,Takeaway,1850-01-01
";
    let temp_dir = tempdir()?;
    let result = run_on(input, temp_dir.path(), |_| {})?;

    assert_eq!(result.coercion.invalid_transaction_date, 2);
    assert_eq!(result.missing.dropped_rows, 2);
    assert_eq!(result.records.len(), 1);
    assert!(temp_dir.path().join("out").join("cafe_sales_final.xlsx").exists());
    Ok(())
}
