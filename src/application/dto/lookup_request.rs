// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::trademark::TrademarkRecord;
use serde::{Deserialize, Serialize};

/// 申请号，接受字符串或数字
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApplicationKey {
    Text(String),
    Number(u64),
}

impl ApplicationKey {
    fn into_key(self) -> String {
        match self {
            ApplicationKey::Text(text) => text.trim().to_string(),
            ApplicationKey::Number(number) => number.to_string(),
        }
    }
}

/// 交互查询请求：单个申请号或申请号列表
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupRequestDto {
    #[serde(default)]
    pub application_number: Option<ApplicationKey>,
    #[serde(default)]
    pub application_numbers: Option<Vec<ApplicationKey>>,
}

impl LookupRequestDto {
    /// 是否为单个申请号的查询
    pub fn is_single(&self) -> bool {
        self.application_numbers.is_none() && self.application_number.is_some()
    }

    /// 要查询的申请号，列表优先，空白键被丢弃
    pub fn keys(self) -> Vec<String> {
        let keys = match (self.application_numbers, self.application_number) {
            (Some(list), _) => list,
            (None, Some(single)) => vec![single],
            (None, None) => Vec::new(),
        };
        keys.into_iter()
            .map(ApplicationKey::into_key)
            .filter(|key| !key.is_empty())
            .collect()
    }
}

/// 批量查询响应
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponseDto {
    pub count: usize,
    pub results: Vec<TrademarkRecord>,
}

impl From<Vec<TrademarkRecord>> for LookupResponseDto {
    fn from(results: Vec<TrademarkRecord>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}
