use starfield_core::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StarColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl StarColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const DEFAULT_COLOR: StarColor = StarColor::rgb(0x94, 0x00, 0xD3);

// First matching group wins.
const PALETTE: &[(&[&str], StarColor)] = &[
    (&["code", "coding", "programming", "编程", "代码"], StarColor::rgb(0xFF, 0x00, 0x00)),
    (&["design", "image", "设计", "图像"], StarColor::rgb(0xFF, 0x7F, 0x00)),
    (&["writing", "docs", "document", "写作", "文档"], StarColor::rgb(0xFF, 0xFF, 0x00)),
    (&["search", "research", "搜索", "研究"], StarColor::rgb(0x00, 0xFF, 0x00)),
    (&["chat", "assistant", "对话", "助手"], StarColor::rgb(0x00, 0x00, 0xFF)),
    (&["analysis", "analytics", "data", "分析", "数据"], StarColor::rgb(0x4B, 0x00, 0x82)),
];

pub fn color_for(tags: &str) -> StarColor {
    let lower = tags.to_lowercase();
    PALETTE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, c)| *c)
        .unwrap_or(DEFAULT_COLOR)
}

pub fn body_color(item: &Item) -> StarColor {
    item.color
        .as_deref()
        .and_then(StarColor::from_hex)
        .unwrap_or_else(|| color_for(&item.tags))
}
