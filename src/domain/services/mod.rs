// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 代理人商标数量统计（brand_count_service）：按固定间隔逐个查询并写回代理人索引
/// - 重复联系人检测（duplicate_matcher）：基于编辑距离的姓名分组，纯函数
/// - 双来源查询（lookup_service）：先读缓存，再实时查询注册处
/// - 记录提取（record_extractor）：把注册处页面解析为商标记录，纯函数
pub mod brand_count_service;
pub mod duplicate_matcher;
pub mod lookup_service;
pub mod record_extractor;
