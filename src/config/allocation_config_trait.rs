// ==========================================
// 托盘门店分配系统 - 分配配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::allocation_params::AllocationParams;
use crate::config::error::ConfigResult;
use async_trait::async_trait;

// ==========================================
// AllocationConfigReader Trait
// ==========================================
// 用途: 分配参数读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait AllocationConfigReader: Send + Sync {
    /// 获取加权历史均值权重 I1（%）
    ///
    /// # 默认值
    /// - 70
    async fn get_history_weight(&self) -> ConfigResult<u32>;

    /// 获取得分指数 alpha
    ///
    /// # 默认值
    /// - 0.7
    async fn get_alpha(&self) -> ConfigResult<f64>;

    /// 获取门店准入累计交付阈值
    ///
    /// # 默认值
    /// - 100000
    async fn get_delivered_threshold(&self) -> ConfigResult<f64>;

    /// 获取重分配容量倍数
    ///
    /// # 默认值
    /// - 5.0
    async fn get_reassign_multiplier(&self) -> ConfigResult<f64>;

    /// 组装完整参数（I2 = 100 - I1）
    ///
    /// 说明：这里不做校验，校验统一在编排器前置执行。
    async fn load_params(&self) -> ConfigResult<AllocationParams> {
        Ok(AllocationParams::default()
            .with_history_weight(self.get_history_weight().await?)
            .with_alpha(self.get_alpha().await?)
            .with_delivered_threshold(self.get_delivered_threshold().await?)
            .with_reassign_multiplier(self.get_reassign_multiplier().await?))
    }
}
