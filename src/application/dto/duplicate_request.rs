// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::duplicate_matcher::{DuplicateGroup, Prospect, Sensitivity};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 重复联系人检测请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DuplicateRequestDto {
    #[validate(length(min = 1, max = 10000))]
    pub prospects: Vec<Prospect>,
    #[serde(default)]
    pub sensitivity: Sensitivity,
}

/// 重复联系人检测响应
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateResponseDto {
    pub sensitivity: Sensitivity,
    /// 分组中涉及的联系人总数
    pub duplicate_count: usize,
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateResponseDto {
    pub fn new(sensitivity: Sensitivity, groups: Vec<DuplicateGroup>) -> Self {
        Self {
            sensitivity,
            duplicate_count: groups.iter().map(|g| g.prospects.len()).sum(),
            groups,
        }
    }
}
