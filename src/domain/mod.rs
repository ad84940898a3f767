// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：商标记录、爬取检查点和门户会话
/// - 仓库接口（repositories）：文档存储抽象及其类型化封装
/// - 服务（services）：记录提取、双来源查询和重复检测
pub mod models;
pub mod repositories;
pub mod services;
