use anyhow::{Context, Result};
use starfield_core::Item;
use std::fs;
use std::path::Path;

pub fn load_items_file(path: &Path) -> Result<Vec<Item>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read items file {}", path.display()))?;
    let items: Vec<Item> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse items file {}", path.display()))?;
    Ok(items)
}

const DEMO: &[(&str, &str, u64)] = &[
    ("Code Pilot", "code, assistant", 1840),
    ("Refactor Bot", "code, programming", 620),
    ("Lint Whisperer", "code", 75),
    ("Shader Sketch", "design, image", 1100),
    ("Palette Forge", "design", 240),
    ("Icon Mill", "image", 33),
    ("Draft Desk", "writing, docs", 530),
    ("Release Notes", "writing", 110),
    ("Glossary Keeper", "docs", 12),
    ("Deep Search", "search, research", 980),
    ("Paper Trail", "research", 205),
    ("Link Sifter", "search", 48),
    ("Chat Harbor", "chat, assistant", 1500),
    ("Standup Buddy", "chat", 150),
    ("Night Owl", "assistant", 21),
    ("Metric Lens", "analysis, data", 760),
    ("Query Garden", "data", 99),
    ("Trend Scope", "analytics", 55),
    ("Spare Parts", "misc", 5),
    ("Orbit Notes", "", 0),
];

pub fn demo_items() -> Vec<Item> {
    DEMO.iter()
        .enumerate()
        .map(|(i, (name, tags, popularity))| {
            let mut item = Item::new(&format!("demo-{i:02}"), name);
            item.tags = tags.to_string();
            item.popularity = *popularity;
            item.description = format!("{name} is a demo entry in the star field.");
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MagnitudeTable;
    use std::collections::HashSet;
    use tempfile::tempdir;

    #[test]
    fn demo_set_spans_every_tier() {
        let table = MagnitudeTable::default();
        let tiers: HashSet<u8> = demo_items()
            .iter()
            .map(|i| table.tier_for(i.popularity).tier)
            .collect();
        assert_eq!(tiers.len(), 7);

        let ids: HashSet<String> = demo_items().into_iter().map(|i| i.id.0).collect();
        assert_eq!(ids.len(), DEMO.len());
    }

    #[test]
    fn items_file_roundtrip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("items.json");
        fs::write(
            &path,
            r##"[{"id":"a","name":"A","tags":"code","popularity":1000,"color":"#00ff00"},
                {"id":"b","name":"B"}]"##,
        )
        .expect("write");

        let items = load_items_file(&path).expect("load");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].popularity, 1000);
        assert_eq!(items[1].popularity, 0);
    }

    #[test]
    fn bad_items_file_reports_path() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").expect("write");
        let err = load_items_file(&path).expect_err("should fail");
        assert!(format!("{err:#}").contains("broken.json"));
        assert!(load_items_file(&dir.path().join("missing.json")).is_err());
    }
}
