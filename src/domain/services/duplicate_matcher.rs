// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 重复联系人检测
//!
//! 基于编辑距离的姓名相似度，附加"姓名子集"规则：
//! 较短姓名的每个词都必须与较长姓名中的某个词相同或高度相似。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 姓名子集规则中单词的相似度下限
const TOKEN_SIMILARITY: f64 = 0.85;

/// 匹配灵敏度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Strict,
    #[default]
    Moderate,
    Aggressive,
}

impl Sensitivity {
    /// 模糊匹配的相似度阈值
    pub fn threshold(&self) -> f64 {
        match self {
            Sensitivity::Strict => 0.95,
            Sensitivity::Moderate => 0.85,
            Sensitivity::Aggressive => 0.75,
        }
    }
}

/// 匹配类型，按可信度从高到低排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    Exact,
    CaseInsensitive,
    PartialName,
    Fuzzy,
}

/// 待检测的联系人
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

impl Prospect {
    fn completeness(&self) -> u32 {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
        let mut score = 0;
        if filled(&self.email) {
            score += 2;
        }
        if filled(&self.phone) {
            score += 2;
        }
        if filled(&self.company) {
            score += 1;
        }
        score
    }
}

/// 一组疑似重复的联系人
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// 组内第一个联系人的规范化姓名
    pub key: String,
    pub prospects: Vec<Prospect>,
    pub match_type: MatchType,
    /// 组内最低的相似度
    pub similarity: f64,
    /// 信息最完整的联系人，合并时建议保留
    pub suggested_keep_id: String,
}

/// 规范化姓名：去掉变音符号，转小写，只保留字母数字和空格，合并空白
pub fn normalize_name(name: &str) -> String {
    let folded = deunicode::deunicode(name).to_lowercase();
    let kept: String = folded
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 相似度：`(较长长度 - 编辑距离) / 较长长度`，两个空串视为完全相同
pub fn similarity(a: &str, b: &str) -> f64 {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    (longer - distance) as f64 / longer as f64
}

/// 较短姓名的每个词（长度大于 2）都能在较长姓名中找到相同或相似的词
pub fn is_name_subset(a: &str, b: &str) -> bool {
    let tokens = |name: &str| -> Vec<String> {
        name.split(' ')
            .filter(|part| part.chars().count() > 2)
            .map(str::to_string)
            .collect()
    };
    let (parts_a, parts_b) = (tokens(a), tokens(b));
    if parts_a.len() == parts_b.len() {
        return false;
    }

    let (shorter, longer) = if parts_a.len() < parts_b.len() {
        (parts_a, parts_b)
    } else {
        (parts_b, parts_a)
    };

    shorter.iter().all(|part| {
        longer
            .iter()
            .any(|candidate| candidate == part || similarity(part, candidate) > TOKEN_SIMILARITY)
    })
}

/// 查找疑似重复的联系人分组
///
/// 每个联系人最多属于一个分组。分组按匹配类型排序，同类型时成员多的在前。
pub fn find_duplicate_groups(prospects: &[Prospect], sensitivity: Sensitivity) -> Vec<DuplicateGroup> {
    let threshold = sensitivity.threshold();
    let normalized: Vec<String> = prospects.iter().map(|p| normalize_name(&p.name)).collect();
    let mut processed: HashSet<usize> = HashSet::new();
    let mut groups = Vec::new();

    for i in 0..prospects.len() {
        if processed.contains(&i) || normalized[i].is_empty() {
            continue;
        }

        let mut members = vec![i];
        let mut match_type = MatchType::Exact;
        let mut min_similarity = 1.0_f64;

        for j in (i + 1)..prospects.len() {
            if processed.contains(&j) || normalized[j].is_empty() {
                continue;
            }

            let (first, second) = (&normalized[i], &normalized[j]);
            let matched = if prospects[i].name == prospects[j].name {
                Some(MatchType::Exact)
            } else if first == second {
                Some(if match_type == MatchType::Exact {
                    MatchType::CaseInsensitive
                } else {
                    match_type
                })
            } else if is_name_subset(first, second) {
                min_similarity = min_similarity.min(similarity(first, second));
                Some(MatchType::PartialName)
            } else {
                let sim = similarity(first, second);
                if sim >= threshold && sim < 1.0 {
                    min_similarity = min_similarity.min(sim);
                    Some(MatchType::Fuzzy)
                } else {
                    None
                }
            };

            if let Some(kind) = matched {
                members.push(j);
                processed.insert(j);
                match_type = kind;
            }
        }

        if members.len() > 1 {
            processed.insert(i);
            let group: Vec<Prospect> = members.iter().map(|&idx| prospects[idx].clone()).collect();
            let suggested_keep_id = most_complete(&group);
            groups.push(DuplicateGroup {
                key: normalized[i].clone(),
                prospects: group,
                match_type,
                similarity: min_similarity,
                suggested_keep_id,
            });
        }
    }

    groups.sort_by(|a, b| {
        a.match_type
            .cmp(&b.match_type)
            .then_with(|| b.prospects.len().cmp(&a.prospects.len()))
    });
    groups
}

/// 组内信息最完整的联系人，得分相同时取靠前者
fn most_complete(group: &[Prospect]) -> String {
    let mut best = &group[0];
    for prospect in group.iter().skip(1) {
        if prospect.completeness() > best.completeness() {
            best = prospect;
        }
    }
    best.id.clone()
}
