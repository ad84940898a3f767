// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供批量爬取循环和爬取任务的生命周期管理
pub mod crawl_worker;
pub mod manager;

pub use crawl_worker::{CrawlJob, CrawlWorker};
pub use manager::CrawlManager;
