//! 分诊结果类型：类别、标签集合、TriageResult 与兜底记录

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 「urgent」标签阈值：priority >= 70 才带 urgent
pub const URGENT_THRESHOLD: u8 = 70;
/// 缺失或无效优先级时的默认值
pub const DEFAULT_PRIORITY: u8 = 50;
pub const MAX_PRIORITY: u8 = 100;
/// 兜底标题取原文前 N 个字符
pub const FALLBACK_TITLE_CHARS: usize = 30;
/// 原文为空时的标题
pub const UNTITLED: &str = "Untitled request";
pub const URGENT_TAG: &str = "urgent";

/// 需求类别（封闭集合，未识别的值一律归为 Other）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Water,
    Food,
    Shelter,
    Medical,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Water,
        Category::Food,
        Category::Shelter,
        Category::Medical,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Water => "water",
            Category::Food => "food",
            Category::Shelter => "shelter",
            Category::Medical => "medical",
            Category::Other => "other",
        }
    }

    /// 大小写不敏感解析；不在集合内的值归为 Other
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 标签集合：保留插入顺序，不含重复
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", from = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入标签；已存在时返回 false
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// 按类别与优先级推导：{category} ∪ ({urgent} if priority >= URGENT_THRESHOLD)
    pub fn derive(category: Category, priority: u8) -> Self {
        let mut tags = Self::new();
        tags.insert(category.as_str());
        if priority >= URGENT_THRESHOLD {
            tags.insert(URGENT_TAG);
        }
        tags
    }
}

impl From<Vec<String>> for TagSet {
    fn from(raw: Vec<String>) -> Self {
        let mut tags = Self::new();
        for tag in raw {
            tags.insert(tag);
        }
        tags
    }
}

impl From<TagSet> for Vec<String> {
    fn from(tags: TagSet) -> Self {
        tags.0
    }
}

/// 分诊结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    pub title: String,
    pub category: Category,
    /// 0..=100
    pub priority: u8,
    pub tags: TagSet,
    pub notes: String,
}

impl TriageResult {
    /// 正常路径：标签由类别与优先级推导，priority 超界时取默认值
    pub fn derived(
        title: impl Into<String>,
        category: Category,
        priority: u8,
        notes: impl Into<String>,
    ) -> Self {
        let priority = if priority > MAX_PRIORITY {
            DEFAULT_PRIORITY
        } else {
            priority
        };
        Self {
            title: title.into(),
            category,
            priority,
            tags: TagSet::derive(category, priority),
            notes: notes.into(),
        }
    }

    /// 兜底记录：分类无法完成时使用。
    ///
    /// 注意标签固定为 {other, urgent}，与 priority=50 不满足阈值规则，这是沿用的既有行为。
    pub fn fallback(original_message: &str) -> Self {
        let mut tags = TagSet::new();
        tags.insert(Category::Other.as_str());
        tags.insert(URGENT_TAG);
        Self {
            title: default_title(original_message),
            category: Category::Other,
            priority: DEFAULT_PRIORITY,
            tags,
            notes: original_message.to_string(),
        }
    }

    pub fn is_urgent(&self) -> bool {
        self.tags.contains(URGENT_TAG)
    }
}

/// 原文前 FALLBACK_TITLE_CHARS 个字符；原文为空白时用 UNTITLED
pub fn default_title(original_message: &str) -> String {
    let title: String = original_message.chars().take(FALLBACK_TITLE_CHARS).collect();
    if title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}
