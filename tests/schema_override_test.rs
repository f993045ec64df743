use sales_etl::{CleaningPipeline, CleaningSchema, CliConfig, EtlEngine, LocalStorage};
use tempfile::TempDir;

#[tokio::test]
async fn test_schema_file_extends_the_country_mapping() {
    let temp_dir = TempDir::new().unwrap();

    std::fs::write(
        temp_dir.path().join("Sales.csv"),
        "\
Store ID,Store Sales,DATE,name,gender,country_name,age
1,100,2023-01-01,customer 1,m,deutschland ,30
2,200,2023-01-02,customer 2,f,usa ,40
",
    )
    .unwrap();

    let schema_toml = r#"
[country_map]
Usa = "United States"
Uk = "United Kingdom"
Deutschland = "Germany"
"#;
    let schema_path = temp_dir.path().join("schema.toml");
    std::fs::write(&schema_path, schema_toml).unwrap();

    let config = CliConfig {
        data_dir: temp_dir.path().to_str().unwrap().to_string(),
        input: "Sales.csv".to_string(),
        output: "Stores_fully_cleaned.csv".to_string(),
        seed: None,
        no_synth: true,
        report: false,
        schema: Some(schema_path.to_str().unwrap().to_string()),
        verbose: false,
        monitor: false,
    };

    let schema = CleaningSchema::from_file(&schema_path).unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = CleaningPipeline::with_schema(storage, config, schema);

    EtlEngine::new(pipeline).run().await.unwrap();

    let output =
        std::fs::read_to_string(temp_dir.path().join("Stores_fully_cleaned.csv")).unwrap();
    assert!(output.contains("Germany"));
    assert!(output.contains("United States"));
    assert!(!output.contains("deutschland"));
}

#[tokio::test]
async fn test_schema_file_with_bad_key_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let schema_path = temp_dir.path().join("schema.toml");
    std::fs::write(
        &schema_path,
        r#"
[gender_map]
"M " = "male"
"#,
    )
    .unwrap();

    assert!(CleaningSchema::from_file(&schema_path).is_err());
}
