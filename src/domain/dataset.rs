// ==========================================
// 托盘门店分配系统 - 分配输入数据集
// ==========================================
// 四张内存表: 门店表 / 进度表 / 库存表 / 托盘表
// 由导入层产出，引擎只读
// ==========================================

use crate::domain::metrics::{ProgressTable, StockTable};
use crate::domain::pallet::Pallet;
use crate::domain::store::StoreTable;

#[derive(Debug, Clone, Default)]
pub struct AllocationDataset {
    pub stores: StoreTable,
    pub progress: ProgressTable,
    pub stock: StockTable,
    pub pallets: Vec<Pallet>,
}

impl AllocationDataset {
    pub fn new(
        stores: StoreTable,
        progress: ProgressTable,
        stock: StockTable,
        pallets: Vec<Pallet>,
    ) -> Self {
        Self {
            stores,
            progress,
            stock,
            pallets,
        }
    }

    /// 进度表 / 库存表中缺失的门店补零
    ///
    /// # 返回
    /// (进度表补入数, 库存表补入数)
    pub fn zero_fill_missing_stores(&mut self) -> (usize, usize) {
        let names: Vec<String> = self.stores.store_names().map(str::to_string).collect();
        let progress_filled = self.progress.zero_fill(names.iter().map(String::as_str));
        let stock_filled = self.stock.zero_fill(names.iter().map(String::as_str));
        (progress_filled, stock_filled)
    }
}
