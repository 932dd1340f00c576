// ==========================================
// 导入层集成测试
// ==========================================
// 覆盖: 四文件导入 / 表头解释 / 编号规范化 / 缺失门店补零 / 错误路径
// ==========================================

#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use pallet_allocation::importer::{DatasetImporter, DatasetImporterImpl, ImportError};
use pallet_allocation::FunctionCode;
use tempfile::TempDir;
use test_data_builder::{write_csv, write_sample_inputs};

#[test]
fn test_load_sample_inputs() {
    println!("\n=== 测试：导入四个 CSV 文件 ===");

    let dir = TempDir::new().unwrap();
    let paths = write_sample_inputs(dir.path());

    let dataset = DatasetImporterImpl::new().load(&paths).unwrap();

    // 门店表
    let names: Vec<&str> = dataset.stores.store_names().collect();
    assert_eq!(names, vec!["MILANO", "ROMA", "NAPOLI"]);
    let codes: Vec<&str> = dataset
        .stores
        .function_codes()
        .iter()
        .map(FunctionCode::as_str)
        .collect();
    assert_eq!(codes, vec!["10", "20"]);

    let napoli = &dataset.stores.stores()[2];
    assert_eq!(napoli.total_delivered(), 50.0);
    assert_eq!(napoli.delivered(&FunctionCode::new("20")), 0.0);

    // 托盘表: 编号规范化 + 价值合计
    let ids: Vec<&str> = dataset.pallets.iter().map(|p| p.pallet_id.as_str()).collect();
    assert_eq!(ids, vec!["1001", "1002", "1003"]);
    let values: Vec<f64> = dataset.pallets.iter().map(|p| p.total_value()).collect();
    assert_eq!(values, vec![5.0, 5.0, 4.0]);

    println!("✓ 门店 {} 家，托盘 {} 个", names.len(), ids.len());
}

#[test]
fn test_missing_stores_are_zero_filled() {
    println!("\n=== 测试：进度表/库存表缺失门店补零 ===");

    let dir = TempDir::new().unwrap();
    let paths = write_sample_inputs(dir.path());

    let dataset = DatasetImporterImpl::new().load(&paths).unwrap();

    assert!(dataset.progress.contains_store("NAPOLI"));
    assert!(dataset.stock.contains_store("NAPOLI"));
    assert_eq!(
        dataset.progress.value("NAPOLI", &FunctionCode::new("10")),
        0.0
    );
    assert_eq!(
        dataset
            .stock
            .store_quantity("NAPOLI", &[FunctionCode::new("10")]),
        0.0
    );
    assert_eq!(dataset.progress.value("MILANO", &FunctionCode::new("10")), 0.6);
    assert_eq!(
        dataset
            .stock
            .total_quantity(&[FunctionCode::new("10"), FunctionCode::new("20")]),
        140.0
    );

    println!("✓ NAPOLI 已补零");
}

#[tokio::test]
async fn test_async_import_matches_sync_load() {
    let dir = TempDir::new().unwrap();
    let paths = write_sample_inputs(dir.path());
    let importer = DatasetImporterImpl::new();

    let via_trait = importer.import_dataset(&paths).await.unwrap();
    let via_load = importer.load(&paths).unwrap();

    assert_eq!(via_trait.pallets, via_load.pallets);
    assert_eq!(via_trait.stores.len(), via_load.stores.len());
}

#[test]
fn test_missing_file_reported() {
    let dir = TempDir::new().unwrap();
    let mut paths = write_sample_inputs(dir.path());
    paths.stock_file = dir.path().join("missing.csv");

    let result = DatasetImporterImpl::new().load(&paths);
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

#[test]
fn test_unsupported_extension_reported() {
    let dir = TempDir::new().unwrap();
    let mut paths = write_sample_inputs(dir.path());
    paths.pallet_file = write_csv(dir.path(), "prelievi.txt", &[&["ID_PRELIEVO", "10"]]);

    let result = DatasetImporterImpl::new().load(&paths);
    assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
}

#[test]
fn test_missing_key_column_reported() {
    let dir = TempDir::new().unwrap();
    let mut paths = write_sample_inputs(dir.path());
    paths.progress_file = write_csv(
        dir.path(),
        "progress_bad.csv",
        &[&["Negozio", "10"], &["MILANO", "0.5"]],
    );

    let result = DatasetImporterImpl::new().load(&paths);
    assert!(matches!(
        result,
        Err(ImportError::MissingColumn { ref column, .. }) if column == "Des Negozio"
    ));
}

#[test]
fn test_non_numeric_quantity_reported_with_row() {
    let dir = TempDir::new().unwrap();
    let mut paths = write_sample_inputs(dir.path());
    paths.pallet_file = write_csv(
        dir.path(),
        "prelievi_bad.csv",
        &[&["ID_PRELIEVO", "10"], &["1001", "5"], &["1002", "molti"]],
    );

    let result = DatasetImporterImpl::new().load(&paths);
    match result {
        Err(ImportError::TypeConversionError { row, field, .. }) => {
            assert_eq!(row, 3);
            assert_eq!(field, "10");
        }
        other => panic!("应为类型转换错误: {:?}", other.map(|d| d.pallets.len())),
    }
}
