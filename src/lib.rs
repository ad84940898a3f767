// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含爬取控制用例和数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含商标记录、检查点、仓库接口和纯业务服务
pub mod domain;

/// 引擎模块
///
/// 注册处门户的会话管理、查询客户端和健康探测
pub mod engines;

/// 基础设施模块
///
/// 提供数据库、文档存储实现和指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和错误映射
pub mod presentation;

/// 工具模块
///
/// 提供日志初始化和重试策略
pub mod utils;

/// 工作器模块
///
/// 批量爬取循环和任务管理
pub mod workers;
