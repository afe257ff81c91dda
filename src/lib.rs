//! Scorebook - 作业分值分配与成绩汇总服务
//!
//! 科目满分按有效作业数量重新分配，作业分值变化后按比例调整已有提交分数，
//! 并维护学生总分。
//!
//! # 架构
//! - `cache`: 读缓存（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层，计分引擎位于 `services::scoring`
//! - `storage`: 记录存储层（SeaORM / 内存）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
