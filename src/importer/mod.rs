// ==========================================
// 托盘门店分配系统 - 导入层
// ==========================================
// 职责: 读取门店 / 进度 / 库存 / 托盘四个文件, 生成引擎输入数据集
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod dataset_importer;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod metrics_loader;
pub mod pallet_loader;
pub mod store_loader;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use dataset_importer::DatasetImporterImpl;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use metrics_loader::{KeyedTableLoader, STORE_KEY_COLUMN};
pub use pallet_loader::{PalletTableLoader, PALLET_KEY_COLUMN};
pub use store_loader::StoreTableLoader;

// 重导出 Trait 接口
pub use importer_trait::{DatasetImporter, DatasetPaths, FileParser, RawGrid};
