// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use pallet_allocation::domain::{
    AllocationDataset, FunctionCode, Pallet, ProgressTable, StockTable, StoreRecord, StoreTable,
};
use std::fs;
use std::path::{Path, PathBuf};

// ==========================================
// StoreRecord 构建器
// ==========================================

pub struct StoreBuilder {
    record: StoreRecord,
}

impl StoreBuilder {
    pub fn new(store_name: &str) -> Self {
        Self {
            record: StoreRecord::new(store_name),
        }
    }

    /// 追加一个功能族 (delivered, sales, st_value)
    pub fn function(mut self, code: &str, delivered: f64, sales: f64, st_value: f64) -> Self {
        self.record = self.record.with_function(code, delivered, sales, st_value);
        self
    }

    pub fn build(self) -> StoreRecord {
        self.record
    }
}

// ==========================================
// AllocationDataset 构建器
// ==========================================

#[derive(Default)]
pub struct DatasetBuilder {
    stores: Vec<StoreRecord>,
    progress: Vec<(String, String, f64)>,
    stock: Vec<(String, String, f64)>,
    pallets: Vec<Pallet>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: StoreBuilder) -> Self {
        self.stores.push(store.build());
        self
    }

    pub fn progress(mut self, store: &str, code: &str, value: f64) -> Self {
        self.progress
            .push((store.to_string(), code.to_string(), value));
        self
    }

    pub fn stock(mut self, store: &str, code: &str, quantity: f64) -> Self {
        self.stock
            .push((store.to_string(), code.to_string(), quantity));
        self
    }

    pub fn pallet(mut self, pallet_id: &str, quantities: &[(&str, f64)]) -> Self {
        self.pallets.push(Pallet::new(
            pallet_id,
            quantities
                .iter()
                .map(|(code, qty)| (FunctionCode::new(code), *qty))
                .collect(),
        ));
        self
    }

    /// 构建数据集（已补零）
    pub fn build(self) -> AllocationDataset {
        let stores = StoreTable::new(vec![], self.stores);

        let mut progress = ProgressTable::new(vec![]);
        for (store, code, value) in self.progress {
            progress.insert(&store, FunctionCode::new(&code), value);
        }

        let mut stock = StockTable::new();
        for (store, code, quantity) in self.stock {
            stock.add(&store, FunctionCode::new(&code), quantity);
        }

        let mut dataset = AllocationDataset::new(stores, progress, stock, self.pallets);
        dataset.zero_fill_missing_stores();
        dataset
    }
}

// ==========================================
// 输入文件写入
// ==========================================

/// 写入 CSV 文件（单元格不含逗号）
pub fn write_csv(dir: &Path, file_name: &str, rows: &[&[&str]]) -> PathBuf {
    let path = dir.join(file_name);
    let content: String = rows
        .iter()
        .map(|row| format!("{}\n", row.join(",")))
        .collect();
    fs::write(&path, content).expect("写入测试 CSV 失败");
    path
}

/// 写入一套最小输入文件
///
/// 门店: MILANO / ROMA / NAPOLI（NAPOLI 累计交付 50）
/// 托盘: 1001（功能 10）/ 1002（功能 10 + 20）/ 1003（功能 99，不受支持）
pub fn write_sample_inputs(dir: &Path) -> pallet_allocation::importer::DatasetPaths {
    let store_file = write_csv(
        dir,
        "st.csv",
        &[
            &["Des Negozio", "ST", "", "", "", "", ""],
            &["", "10", "", "", "20", "", ""],
            &["", "Delivered", "Sales", "ST value", "Delivered", "Sales", "ST value"],
            &["MILANO", "500", "400", "0.8", "300", "150", "0.5"],
            &["ROMA", "400", "200", "0.5", "200", "100", "0.5"],
            &["NAPOLI", "50", "10", "0.2", "", "", ""],
        ],
    );
    let progress_file = write_csv(
        dir,
        "avanzamenti.csv",
        &[
            &["Des Negozio", "10", "20"],
            &["MILANO", "0.6", "0.4"],
            &["ROMA", "0.3", "0.2"],
        ],
    );
    let stock_file = write_csv(
        dir,
        "stock.csv",
        &[
            &["Des Negozio", "10", "20"],
            &["MILANO", "20", "10"],
            &["ROMA", "80", "30"],
        ],
    );
    let pallet_file = write_csv(
        dir,
        "prelievi.csv",
        &[
            &["ID_PRELIEVO", "10", "20", "99"],
            &["1001.0", "5", "", ""],
            &["1002", "2", "3", ""],
            &["1003", "", "", "4"],
        ],
    );

    pallet_allocation::importer::DatasetPaths {
        store_file,
        progress_file,
        stock_file,
        pallet_file,
    }
}
