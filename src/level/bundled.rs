//! Level geometry compiled into the binary

use super::LevelData;

const STANDARD: [&str; 8] = [
    include_str!("levels/standard_1.json"),
    include_str!("levels/standard_2.json"),
    include_str!("levels/standard_3.json"),
    include_str!("levels/standard_4.json"),
    include_str!("levels/standard_5.json"),
    include_str!("levels/standard_6.json"),
    include_str!("levels/standard_7.json"),
    include_str!("levels/standard_8.json"),
];

const CUSTOM: [&str; 3] = [
    include_str!("levels/custom_1.json"),
    include_str!("levels/custom_2.json"),
    include_str!("levels/custom_3.json"),
];

fn parse(sources: &[&str], family: &str) -> Vec<LevelData> {
    sources
        .iter()
        .enumerate()
        .map(|(i, json)| match serde_json::from_str(json) {
            Ok(data) => data,
            Err(e) => panic!("bundled {} level {} is invalid: {}", family, i + 1, e),
        })
        .collect()
}

pub(super) fn standard_levels() -> Vec<LevelData> {
    parse(&STANDARD, "standard")
}

pub(super) fn custom_levels() -> Vec<LevelData> {
    parse(&CUSTOM, "custom")
}
