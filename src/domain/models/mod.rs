// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 爬取检查点（checkpoint）：批量扫描的进度与状态
/// - 门户会话（session）：注册处的视图状态令牌与 Cookie
/// - 商标记录（trademark）：从注册处页面提取的规范化数据
pub mod checkpoint;
pub mod session;
pub mod trademark;
