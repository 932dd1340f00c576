// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use pallet_allocation::config::{AllocationConfigReader, AllocationParams, ConfigResult};

/// Mock 配置结构（固定参数，不读数据库）
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub params: AllocationParams,
}

impl MockConfig {
    pub fn new(params: AllocationParams) -> Self {
        Self { params }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self::new(AllocationParams::default().with_delivered_threshold(100.0))
    }
}

#[async_trait]
impl AllocationConfigReader for MockConfig {
    async fn get_history_weight(&self) -> ConfigResult<u32> {
        Ok(self.params.history_weight)
    }

    async fn get_alpha(&self) -> ConfigResult<f64> {
        Ok(self.params.alpha)
    }

    async fn get_delivered_threshold(&self) -> ConfigResult<f64> {
        Ok(self.params.delivered_threshold)
    }

    async fn get_reassign_multiplier(&self) -> ConfigResult<f64> {
        Ok(self.params.reassign_multiplier)
    }
}
