// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 注册处页面提取器
//!
//! 把注册处返回的半结构化 HTML 表格解析为 [`TrademarkRecord`]。
//! 纯函数，无 I/O，相同输入总是得到相同输出。
//!
//! 解析分两步：先按文档顺序收集区段标题的位置，再把每个表格行
//! 归入位于它之前的最后一个标题所在的区段，最后按区段查规则表写入字段。

use crate::domain::models::trademark::{
    EstablishmentData, GeneralData, PartyData, RecordStatus, TrademarkRecord,
};
use scraper::{ElementRef, Html, Node};
use std::collections::HashSet;

/// 记录区段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    Holder,
    Attorney,
    Establishment,
    Products,
    Procedure,
}

/// 标题文本与区段的对应关系
const HEADINGS: &[(&str, Section)] = &[
    ("DATOS GENERALES", Section::General),
    ("TITULAR", Section::Holder),
    ("APODERADO", Section::Attorney),
    ("ESTABLECIMIENTO", Section::Establishment),
    ("PRODUCTOS", Section::Products),
    ("TRAMITE", Section::Procedure),
];

/// 文档中一个区段标题的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMarker {
    pub offset: usize,
    pub section: Section,
}

/// 键匹配规则
#[derive(Debug, Clone, Copy)]
enum KeyRule {
    Exact(&'static str),
    Contains(&'static str),
    /// 包含第一个子串且不包含第二个
    ContainsExcept(&'static str, &'static str),
}

impl KeyRule {
    fn matches(&self, key: &str) -> bool {
        match *self {
            KeyRule::Exact(expected) => key == expected,
            KeyRule::Contains(needle) => key.contains(needle),
            KeyRule::ContainsExcept(needle, excluded) => {
                key.contains(needle) && !key.contains(excluded)
            }
        }
    }
}

type Slot<T> = fn(&mut T) -> &mut String;

// 同一个键只命中表中第一条规则
const GENERAL_RULES: &[(KeyRule, Slot<GeneralData>)] = &[
    (
        KeyRule::ContainsExcept("NUMERO DE REGISTRO", "INTERNACIONAL"),
        |g| &mut g.registration_number,
    ),
    (KeyRule::Contains("EXPEDIENTE"), |g| &mut g.application_number),
    (KeyRule::Contains("PRESENTACION"), |g| &mut g.filing_date),
    (KeyRule::Contains("CONCESION"), |g| &mut g.grant_date),
    (KeyRule::Contains("VIGENCIA"), |g| &mut g.validity_date),
    (KeyRule::Contains("PUBLICACION"), |g| &mut g.publication_date),
    (KeyRule::Exact("DENOMINACION"), |g| &mut g.denomination),
    (KeyRule::Contains("DESCRIPCION"), |g| &mut g.mark_description),
    (KeyRule::Contains("TIPO DE SOLICITUD"), |g| &mut g.application_type),
    (KeyRule::Contains("TIPO DE MARCA"), |g| &mut g.mark_type),
];

const PARTY_RULES: &[(KeyRule, Slot<PartyData>)] = &[
    (KeyRule::Exact("NOMBRE"), |p| &mut p.name),
    (KeyRule::Exact("DIRECCION"), |p| &mut p.address),
    (KeyRule::Exact("POBLACION"), |p| &mut p.city),
    (KeyRule::Exact("CODIGO POSTAL"), |p| &mut p.postal_code),
    (KeyRule::Exact("PAIS"), |p| &mut p.country),
    (KeyRule::Exact("NACIONALIDAD"), |p| &mut p.nationality),
    (KeyRule::Exact("E-MAIL"), |p| &mut p.email),
    (KeyRule::Exact("TELEFONO"), |p| &mut p.phone),
];

const ESTABLISHMENT_RULES: &[(KeyRule, Slot<EstablishmentData>)] = &[
    (KeyRule::Exact("DIRECCION"), |e| &mut e.address),
    (KeyRule::Exact("POBLACION"), |e| &mut e.city),
    (KeyRule::Exact("CODIGO POSTAL"), |e| &mut e.postal_code),
    (KeyRule::Exact("PAIS"), |e| &mut e.country),
];

/// 产品区段中不计入商品与服务描述的表头键
const PRODUCT_HEADER_KEYS: &[&str] = &["CLASE", "DESCRIPCION"];

/// 表格中的一行键值对
#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyValueRow {
    offset: usize,
    key: String,
    value: String,
}

/// 从注册处页面提取商标记录
///
/// # 参数
///
/// * `html` - 注册处返回的完整页面
///
/// # 返回值
///
/// * `Some(TrademarkRecord)` - 申请号、名称或权利人姓名至少一项非空
/// * `None` - 页面中没有可识别的数据
pub fn extract(html: &str) -> Option<TrademarkRecord> {
    if html.trim().is_empty() {
        return None;
    }

    let document = Html::parse_document(html);
    let (markers, rows) = scan(&document);

    let mut record = TrademarkRecord::default();
    for row in &rows {
        apply_row(&mut record, section_at(&markers, row.offset), row);
    }

    if !record.has_identifying_data() {
        return None;
    }
    record.status = RecordStatus::Found;
    record.application_number = record.general_data.application_number.clone();
    Some(record)
}

/// 行所在的区段：偏移量不大于行偏移量的最后一个标题，之前没有标题时为基本信息
pub fn section_at(markers: &[SectionMarker], offset: usize) -> Section {
    markers
        .iter()
        .filter(|marker| marker.offset <= offset)
        .max_by_key(|marker| marker.offset)
        .map(|marker| marker.section)
        .unwrap_or(Section::General)
}

/// 规范化标签文本：去掉变音符号，转大写，合并空白，去掉结尾冒号
pub fn normalize_label(text: &str) -> String {
    let folded = deunicode::deunicode(&text.replace('\u{a0}', " ")).to_uppercase();
    let collapsed = collapse_whitespace(&folded);
    collapsed.trim_end_matches(':').trim_end().to_string()
}

fn heading_section(label: &str) -> Option<Section> {
    HEADINGS.iter().find_map(|(heading, section)| {
        let matched = label == *heading
            || label.starts_with(&format!("{heading} "))
            || label.ends_with(&format!(" {heading}"));
        matched.then_some(*section)
    })
}

/// 按先序遍历收集标题位置和键值行，先序序号即文档位置
fn scan(document: &Html) -> (Vec<SectionMarker>, Vec<KeyValueRow>) {
    let mut markers = Vec::new();
    let mut rows = Vec::new();
    let mut row_ids = HashSet::new();

    for (offset, node) in document.tree.root().descendants().enumerate() {
        match node.value() {
            Node::Text(text) => {
                if node.ancestors().any(|a| row_ids.contains(&a.id())) {
                    continue;
                }
                if let Some(section) = heading_section(&normalize_label(text)) {
                    markers.push(SectionMarker { offset, section });
                }
            }
            Node::Element(element) if element.name() == "tr" => {
                let Some(row) = ElementRef::wrap(node) else {
                    continue;
                };
                let nested = node
                    .descendants()
                    .skip(1)
                    .any(|n| matches!(n.value(), Node::Element(e) if e.name() == "tr"));
                if nested {
                    continue;
                }
                if let Some((key, value)) = key_value(row) {
                    row_ids.insert(node.id());
                    rows.push(KeyValueRow { offset, key, value });
                }
            }
            _ => {}
        }
    }

    (markers, rows)
}

/// 至少两个单元格且值非空时返回（键，值）
fn key_value(row: ElementRef<'_>) -> Option<(String, String)> {
    let cells: Vec<String> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .map(cell_text)
        .collect();

    if cells.len() < 2 || cells[1].is_empty() {
        return None;
    }
    let key = cells[0].trim_end_matches(':').trim_end().to_string();
    Some((key, cells[1].clone()))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let raw: String = cell.text().collect();
    collapse_whitespace(&raw.replace('\u{a0}', " "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn apply_row(record: &mut TrademarkRecord, section: Section, row: &KeyValueRow) {
    let key = normalize_label(&row.key);
    let value = row.value.clone();

    match section {
        Section::General => assign(&mut record.general_data, GENERAL_RULES, &key, value),
        Section::Holder => assign(&mut record.holder, PARTY_RULES, &key, value),
        Section::Attorney => assign(&mut record.attorney, PARTY_RULES, &key, value),
        Section::Establishment => {
            assign(&mut record.establishment, ESTABLISHMENT_RULES, &key, value)
        }
        Section::Products => {
            if !PRODUCT_HEADER_KEYS.contains(&key.as_str()) {
                if !record.goods_and_services.is_empty() {
                    record.goods_and_services.push_str("; ");
                }
                record.goods_and_services.push_str(&value);
            }
        }
        Section::Procedure => {}
    }
}

fn assign<T>(target: &mut T, rules: &[(KeyRule, Slot<T>)], key: &str, value: String) {
    if let Some((_, slot)) = rules.iter().find(|(rule, _)| rule.matches(key)) {
        *slot(target) = value;
    }
}

#[cfg(test)]
#[path = "record_extractor_test.rs"]
mod tests;
