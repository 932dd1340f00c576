// ==========================================
// 托盘门店分配系统 - 数据集导入器实现
// ==========================================
// 导入流程:
// 1. 解析四个文件为原始网格
// 2. 各表加载器解释表头 / 数值
// 3. 进度表、库存表为缺失门店补零
// ==========================================

use crate::domain::dataset::AllocationDataset;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{DatasetImporter, DatasetPaths};
use crate::importer::metrics_loader::KeyedTableLoader;
use crate::importer::pallet_loader::PalletTableLoader;
use crate::importer::store_loader::StoreTableLoader;
use async_trait::async_trait;
use tracing::{info, instrument};

pub struct DatasetImporterImpl {
    parser: UniversalFileParser,
    store_loader: StoreTableLoader,
    keyed_loader: KeyedTableLoader,
    pallet_loader: PalletTableLoader,
}

impl DatasetImporterImpl {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            store_loader: StoreTableLoader::new(),
            keyed_loader: KeyedTableLoader::new(),
            pallet_loader: PalletTableLoader::new(),
        }
    }

    /// 同步加载（CLI / 测试直接调用）
    #[instrument(skip(self), fields(store_file = %paths.store_file.display()))]
    pub fn load(&self, paths: &DatasetPaths) -> ImportResult<AllocationDataset> {
        let stores = self
            .store_loader
            .load(&self.parser.parse(&paths.store_file)?)?;
        let progress = self
            .keyed_loader
            .load_progress(&self.parser.parse(&paths.progress_file)?)?;
        let stock = self
            .keyed_loader
            .load_stock(&self.parser.parse(&paths.stock_file)?)?;
        let pallets = self
            .pallet_loader
            .load(&self.parser.parse(&paths.pallet_file)?)?;

        let mut dataset = AllocationDataset::new(stores, progress, stock, pallets);
        let (progress_filled, stock_filled) = dataset.zero_fill_missing_stores();

        info!(
            stores = dataset.stores.len(),
            pallets = dataset.pallets.len(),
            progress_filled,
            stock_filled,
            "输入数据加载完成"
        );
        Ok(dataset)
    }
}

impl Default for DatasetImporterImpl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetImporter for DatasetImporterImpl {
    async fn import_dataset(&self, paths: &DatasetPaths) -> ImportResult<AllocationDataset> {
        self.load(paths)
    }
}
