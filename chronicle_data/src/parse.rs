//! Parser for the block-structured catalog files.
//!
//! Each record is a run of `KEY: value` lines; records are separated by blank
//! lines. Keys are case-insensitive and lines starting with `#` are ignored.
//!
//! ```text
//! QUEST_ID: first_steps
//! TITLE: First Steps
//! DESCRIPTION: Your journey begins.
//! REWARD_XP: 50
//! REWARD_GOLD: 20
//! REQUIRED_LEVEL: 1
//! PREREQUISITE: NONE
//! ```

use std::collections::BTreeMap;

use crate::error::DataError;
use crate::{Effect, ItemCatalog, ItemDef, ItemKind, Prerequisite, QuestCatalog, QuestDef};

const QUEST_FIELDS: &[&str] = &[
    "QUEST_ID",
    "TITLE",
    "DESCRIPTION",
    "REWARD_XP",
    "REWARD_GOLD",
    "REQUIRED_LEVEL",
    "PREREQUISITE",
];

const ITEM_FIELDS: &[&str] = &["ITEM_ID", "NAME", "TYPE", "EFFECT", "COST", "DESCRIPTION"];

/// One blank-line separated record with the line number of each field.
#[derive(Debug)]
struct Block<'a> {
    start: usize,
    lines: Vec<(usize, &'a str)>,
}

/// Fields of a block after key normalization and duplicate checks.
struct FieldMap<'a> {
    kind: &'static str,
    start: usize,
    fields: BTreeMap<String, (usize, &'a str)>,
}
impl<'a> FieldMap<'a> {
    fn build(kind: &'static str, allowed: &[&str], block: &Block<'a>) -> Result<FieldMap<'a>, DataError> {
        let mut fields = BTreeMap::new();
        for &(line, text) in &block.lines {
            let (key, value) = text.split_once(':').ok_or_else(|| DataError::MalformedLine {
                line,
                text: text.to_string(),
            })?;
            let key = key.trim().to_ascii_uppercase();
            if !allowed.contains(&key.as_str()) {
                return Err(DataError::UnknownField { line, kind, key });
            }
            if fields.insert(key.clone(), (line, value.trim())).is_some() {
                return Err(DataError::DuplicateField { line, kind, key });
            }
        }
        Ok(FieldMap {
            kind,
            start: block.start,
            fields,
        })
    }

    fn get(&self, key: &'static str) -> Result<(usize, &'a str), DataError> {
        self.fields.get(key).copied().ok_or(DataError::MissingField {
            line: self.start,
            kind: self.kind,
            key,
        })
    }

    fn text(&self, key: &'static str) -> Result<String, DataError> {
        self.get(key).map(|(_, value)| value.to_string())
    }

    fn number(&self, key: &'static str) -> Result<u32, DataError> {
        let (line, value) = self.get(key)?;
        value.parse::<u32>().map_err(|_| DataError::InvalidNumber {
            line,
            key,
            value: value.to_string(),
        })
    }
}

fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block<'_>> = None;
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        current
            .get_or_insert_with(|| Block {
                start: line_no,
                lines: Vec::new(),
            })
            .lines
            .push((line_no, line));
    }
    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}

fn parse_quest_block(block: &Block<'_>) -> Result<QuestDef, DataError> {
    let fields = FieldMap::build("quest", QUEST_FIELDS, block)?;
    let required_level = fields.number("REQUIRED_LEVEL")?;
    if required_level == 0 {
        return Err(DataError::InvalidValue {
            line: fields.get("REQUIRED_LEVEL")?.0,
            key: "REQUIRED_LEVEL",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(QuestDef {
        id: fields.text("QUEST_ID")?,
        title: fields.text("TITLE")?,
        description: fields.text("DESCRIPTION")?,
        reward_xp: fields.number("REWARD_XP")?,
        reward_gold: fields.number("REWARD_GOLD")?,
        required_level,
        prerequisite: Prerequisite::parse(&fields.text("PREREQUISITE")?),
    })
}

fn parse_item_block(block: &Block<'_>) -> Result<ItemDef, DataError> {
    let fields = FieldMap::build("item", ITEM_FIELDS, block)?;
    let (type_line, type_text) = fields.get("TYPE")?;
    let kind = type_text.parse::<ItemKind>().map_err(|found| DataError::InvalidValue {
        line: type_line,
        key: "TYPE",
        reason: format!("'{found}' is not one of weapon, armor, consumable"),
    })?;
    let (effect_line, effect_text) = fields.get("EFFECT")?;
    let effect = effect_text
        .parse::<Effect>()
        .map_err(|source| DataError::InvalidEffect {
            line: effect_line,
            source,
        })?;
    Ok(ItemDef {
        id: fields.text("ITEM_ID")?,
        name: fields.text("NAME")?,
        kind,
        effect,
        cost: fields.number("COST")?,
        description: fields.text("DESCRIPTION")?,
    })
}

/// Parse every quest block in `text`, in file order.
///
/// # Errors
/// - on any malformed, unknown, duplicate, or missing field
/// - if the file contains no quest blocks
pub fn parse_quests(text: &str) -> Result<Vec<QuestDef>, DataError> {
    let blocks = split_blocks(text);
    if blocks.is_empty() {
        return Err(DataError::Empty { kind: "quest" });
    }
    blocks.iter().map(parse_quest_block).collect()
}

/// Parse every item block in `text`, in file order.
///
/// # Errors
/// - on any malformed, unknown, duplicate, or missing field
/// - if the file contains no item blocks
pub fn parse_items(text: &str) -> Result<Vec<ItemDef>, DataError> {
    let blocks = split_blocks(text);
    if blocks.is_empty() {
        return Err(DataError::Empty { kind: "item" });
    }
    blocks.iter().map(parse_item_block).collect()
}

/// Key parsed quests by id, rejecting duplicates.
///
/// # Errors
/// - if two quests share an id
pub fn build_quest_catalog(quests: Vec<QuestDef>) -> Result<QuestCatalog, DataError> {
    let mut catalog = QuestCatalog::new();
    for quest in quests {
        if catalog.contains_key(&quest.id) {
            return Err(DataError::DuplicateId {
                kind: "quest",
                id: quest.id,
            });
        }
        catalog.insert(quest.id.clone(), quest);
    }
    Ok(catalog)
}

/// Key parsed items by id, rejecting duplicates.
///
/// # Errors
/// - if two items share an id
pub fn build_item_catalog(items: Vec<ItemDef>) -> Result<ItemCatalog, DataError> {
    let mut catalog = ItemCatalog::new();
    for item in items {
        if catalog.contains_key(&item.id) {
            return Err(DataError::DuplicateId { kind: "item", id: item.id });
        }
        catalog.insert(item.id.clone(), item);
    }
    Ok(catalog)
}

/// Render a quest back into its block form.
pub fn format_quest(quest: &QuestDef) -> String {
    format!(
        "QUEST_ID: {}\nTITLE: {}\nDESCRIPTION: {}\nREWARD_XP: {}\nREWARD_GOLD: {}\nREQUIRED_LEVEL: {}\nPREREQUISITE: {}\n",
        quest.id,
        quest.title,
        quest.description,
        quest.reward_xp,
        quest.reward_gold,
        quest.required_level,
        quest.prerequisite
    )
}

/// Render an item back into its block form.
pub fn format_item(item: &ItemDef) -> String {
    format!(
        "ITEM_ID: {}\nNAME: {}\nTYPE: {}\nEFFECT: {}\nCOST: {}\nDESCRIPTION: {}\n",
        item.id, item.name, item.kind, item.effect, item.cost, item.description
    )
}
