// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供文档存储特质的具体实现：数据库实现与内存实现
pub mod document_store_impl;
pub mod memory_store;
