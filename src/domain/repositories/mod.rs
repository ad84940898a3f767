// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 文档存储特质（document_store）是持久化层的抽象契约，具体实现由基础设施层提供；
/// 商标记录仓库、代理人仓库和检查点仓库在其之上提供类型化的读写。
pub mod attorney_repository;
pub mod checkpoint_repository;
pub mod document_store;
pub mod trademark_repository;
