// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 商标申请记录实体
///
/// 由注册处页面提取或从文档存储读取得到的规范化记录。
/// `status = NotFound` 的记录除回显的查询键外不携带任何已填充的子映射。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrademarkRecord {
    /// 查询结果状态
    pub status: RecordStatus,
    /// 数据来源标记（缓存或实时抓取），提取阶段为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RecordSource>,
    /// 查询使用的申请号（回显）
    pub application_number: String,
    /// 基本信息
    pub general_data: GeneralData,
    /// 权利人
    pub holder: PartyData,
    /// 代理人
    pub attorney: PartyData,
    /// 营业场所
    pub establishment: EstablishmentData,
    /// 商品与服务描述，以 "; " 拼接
    pub goods_and_services: String,
}

impl TrademarkRecord {
    /// 创建一条未找到的记录，仅回显申请号
    pub fn not_found(application_number: impl Into<String>) -> Self {
        Self {
            status: RecordStatus::NotFound,
            application_number: application_number.into(),
            ..Default::default()
        }
    }

    /// 至少含有申请号、名称或权利人姓名之一时视为有效数据
    pub fn has_identifying_data(&self) -> bool {
        !self.general_data.application_number.is_empty()
            || !self.general_data.denomination.is_empty()
            || !self.holder.name.is_empty()
    }

    /// 标记数据来源
    pub fn with_source(mut self, source: RecordSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn is_found(&self) -> bool {
        self.status == RecordStatus::Found
    }
}

/// 记录状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// 已找到
    Found,
    /// 未找到
    #[default]
    NotFound,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordStatus::Found => write!(f, "found"),
            RecordStatus::NotFound => write!(f, "not_found"),
        }
    }
}

/// 记录来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordSource {
    /// 持久化缓存
    Cache,
    /// 实时抓取
    LiveScrape,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordSource::Cache => write!(f, "cache"),
            RecordSource::LiveScrape => write!(f, "live-scrape"),
        }
    }
}

/// 基本信息（DATOS GENERALES 区段）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralData {
    pub application_number: String,
    pub denomination: String,
    pub application_type: String,
    pub mark_type: String,
    pub filing_date: String,
    pub grant_date: String,
    pub validity_date: String,
    pub publication_date: String,
    pub registration_number: String,
    pub mark_description: String,
}

/// 当事人信息（权利人或代理人）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyData {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub nationality: String,
    pub email: String,
    pub phone: String,
}

impl PartyData {
    pub fn is_empty(&self) -> bool {
        *self == PartyData::default()
    }
}

/// 营业场所信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstablishmentData {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}
