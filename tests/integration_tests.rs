use sales_etl::{CleaningPipeline, CliConfig, EtlEngine, LocalStorage};
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> CliConfig {
    CliConfig {
        data_dir: dir.path().to_str().unwrap().to_string(),
        input: "Sales.csv".to_string(),
        output: "Stores_fully_cleaned.csv".to_string(),
        seed: Some(123),
        no_synth: false,
        report: false,
        schema: None,
        verbose: false,
        monitor: false,
    }
}

fn write_input(dir: &TempDir, content: &str) {
    std::fs::write(dir.path().join("Sales.csv"), content).unwrap();
}

fn read_output(dir: &TempDir) -> (Vec<String>, Vec<Vec<String>>) {
    let path = dir.path().join("Stores_fully_cleaned.csv");
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

const MESSY_INPUT: &str = "\
Store ID,Store Area,Items Available,Daily Customer Count,Store Sales,DATE,name,gender,country_name,age
1,1659,1961,530,66490,2023-01-01,customer 1,M,usa ,34
2,1461,1752,210,39820,2023-01-02,customer 2,FEMALE ,UK,41
3,1340,1609,720,54010,2023-01-03,customer 3,f, united kingdom,25
4,1451,1748,620,oops,2023-01-04,customer 4,Male,Germany,39
5,1770,2111,450,46620,2023-01-05,customer 5,m,France,
5,1770,2111,450,46620,2023-01-05,customer 5,m,France,
7,1542,1858,1030,72240,2023-01-07,customer 7,MALE ,Canada,52
8,1261,1507,680,51540,2023-01-08,customer 8,Female,Japan,27
9,1090,1321,750,57620,2023-01-09,customer 9,f,usa ,60
10,1030,1235,560,54370,2023-01-10,customer 10,Female,Brazil,44
";

#[tokio::test]
async fn test_end_to_end_cleaning_of_messy_input() {
    let temp_dir = TempDir::new().unwrap();
    write_input(&temp_dir, MESSY_INPUT);

    let config = config_for(&temp_dir);
    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = CleaningPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    let output_path = engine.run().await.unwrap();
    assert!(output_path.ends_with("Stores_fully_cleaned.csv"));

    let (headers, rows) = read_output(&temp_dir);

    // headers trimmed, lowercased, underscored; no index column
    assert_eq!(
        headers,
        vec![
            "store_id",
            "store_area",
            "items_available",
            "daily_customer_count",
            "store_sales",
            "date",
            "name",
            "gender",
            "country_name",
            "age"
        ]
    );

    // one exact duplicate pair collapsed
    assert_eq!(rows.len(), 9);

    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();

    for row in &rows {
        assert_eq!(row.len(), headers.len());

        // business columns and age come out as non-empty integers
        for name in [
            "store_id",
            "store_area",
            "items_available",
            "daily_customer_count",
            "store_sales",
            "age",
        ] {
            let field = &row[col(name)];
            assert!(
                field.parse::<i64>().is_ok(),
                "column '{}' holds non-integer '{}'",
                name,
                field
            );
        }

        assert!(
            row[col("gender")] == "male" || row[col("gender")] == "female",
            "unexpected gender '{}'",
            row[col("gender")]
        );
        assert!(row[col("name")].starts_with("Customer "));
    }

    // the unparseable store_sales value was median-filled, not zeroed
    let fixed = rows.iter().find(|r| r[col("store_id")] == "4").unwrap();
    assert_eq!(fixed[col("store_sales")], "54190");

    // country aliases resolved, plain names just title-cased
    let countries: Vec<&str> = rows.iter().map(|r| r[col("country_name")].as_str()).collect();
    assert!(countries.contains(&"United States"));
    assert!(countries.contains(&"United Kingdom"));
    assert!(countries.contains(&"Germany"));
    assert!(!countries.iter().any(|c| c.ends_with(' ')));

    // null age on the surviving duplicate row was filled with the median (40)
    let dup = rows.iter().find(|r| r[col("store_id")] == "5").unwrap();
    assert_eq!(dup[col("age")], "40");
}

#[tokio::test]
async fn test_raw_input_gets_synthesized_columns() {
    let temp_dir = TempDir::new().unwrap();
    write_input(
        &temp_dir,
        "Store ID,Store Sales\n1,100\n2,200\n3,300\n4,400\n",
    );

    let config = config_for(&temp_dir);
    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = CleaningPipeline::new(storage, config);

    EtlEngine::new(pipeline).run().await.unwrap();

    let (headers, rows) = read_output(&temp_dir);
    assert_eq!(
        headers,
        vec![
            "store_id",
            "store_sales",
            "date",
            "name",
            "gender",
            "country_name",
            "age"
        ]
    );
    assert_eq!(rows.len(), 4);

    // sequential dates from the fixed epoch survive the date conversion
    assert_eq!(rows[0][2], "2023-01-01");
    assert_eq!(rows[3][2], "2023-01-04");
    assert_eq!(rows[0][3], "Customer 1");
}

#[tokio::test]
async fn test_same_seed_produces_identical_output() {
    let input = "Store ID,Store Sales\n1,100\n2,200\n3,300\n";

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let temp_dir = TempDir::new().unwrap();
        write_input(&temp_dir, input);

        let config = config_for(&temp_dir);
        let storage = LocalStorage::new(temp_dir.path());
        let pipeline = CleaningPipeline::new(storage, config);
        EtlEngine::new(pipeline).run().await.unwrap();

        outputs.push(std::fs::read(temp_dir.path().join("Stores_fully_cleaned.csv")).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn test_report_file_is_written_on_request() {
    let temp_dir = TempDir::new().unwrap();
    write_input(&temp_dir, MESSY_INPUT);

    let mut config = config_for(&temp_dir);
    config.report = true;
    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = CleaningPipeline::new(storage, config);

    EtlEngine::new(pipeline).run().await.unwrap();

    let raw = std::fs::read(temp_dir.path().join("cleaning_report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(report["rows_loaded"], 10);
    assert_eq!(report["rows_written"], 9);
    assert_eq!(report["duplicates_removed"], 1);
    assert_eq!(report["coerced_to_null"]["store_sales"], 1);
}

#[tokio::test]
async fn test_missing_input_file_is_fatal() {
    let temp_dir = TempDir::new().unwrap();

    let config = config_for(&temp_dir);
    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = CleaningPipeline::new(storage, config);

    let result = EtlEngine::new(pipeline).run().await;
    assert!(result.is_err());
}
