// ==========================================
// 配置层集成测试
// ==========================================
// 覆盖: 参数跨连接持久化 / 快照恢复 / 默认值回退
// ==========================================


use pallet_allocation::config::{
    config_keys, AllocationConfigReader, AllocationParams, ConfigError, ConfigManager,
};
use std::sync::{Arc, Mutex};
use test_helpers::{create_test_db, open_test_connection};

#[tokio::test]
async fn test_params_survive_reopen() {
    println!("\n=== 测试：参数跨连接持久化 ===");

    let (_tmp_db, db_path) = create_test_db().unwrap();
    let params = AllocationParams::default()
        .with_history_weight(35)
        .with_alpha(0.5)
        .with_delivered_threshold(12_500.0)
        .with_reassign_multiplier(3.0);

    {
        let manager = ConfigManager::new(&db_path).unwrap();
        manager.save_params(&params).unwrap();
    }

    let reopened = ConfigManager::new(&db_path).unwrap();
    let loaded = reopened.load_params().await.unwrap();
    assert_eq!(loaded, params);
    assert_eq!(loaded.progress_weight, 65);

    println!("✓ 重新打开后参数一致");
}

#[tokio::test]
async fn test_snapshot_restore_on_fresh_database() {
    println!("\n=== 测试：配置快照恢复到新库 ===");

    let (_src_db, src_path) = create_test_db().unwrap();
    let source = ConfigManager::new(&src_path).unwrap();
    source.set_param(config_keys::HISTORY_WEIGHT, "60").unwrap();
    source.set_param(config_keys::ALPHA, "0.9").unwrap();
    let snapshot = source.get_config_snapshot().unwrap();

    let (_dst_db, dst_path) = create_test_db().unwrap();
    let conn = open_test_connection(&dst_path).unwrap();
    let target = ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap();
    assert_eq!(target.load_params().await.unwrap(), AllocationParams::default());

    let restored = target.restore_config_from_snapshot(&snapshot).unwrap();
    assert_eq!(restored, 2);

    let params = target.load_params().await.unwrap();
    assert_eq!(params.history_weight, 60);
    assert_eq!(params.progress_weight, 40);
    assert_eq!(params.alpha, 0.9);
    assert_eq!(
        params.delivered_threshold,
        AllocationParams::default().delivered_threshold
    );

    println!("✓ 恢复 {} 项", restored);
}

#[tokio::test]
async fn test_out_of_range_value_is_stored_but_rejected_at_run() {
    let (_tmp_db, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    // 格式合法即可写入，业务范围由运行前校验负责
    manager.set_param(config_keys::ALPHA, "1.5").unwrap();
    let params = manager.load_params().await.unwrap();
    assert_eq!(params.alpha, 1.5);
    assert!(params.validate().is_err());
}

#[test]
fn test_bad_snapshot_json_rejected() {
    let (_tmp_db, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    let result = manager.restore_config_from_snapshot("{not json");
    assert!(matches!(result, Err(ConfigError::Snapshot(_))));
}
