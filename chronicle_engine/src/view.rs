//! View module.
//! Handlers push [`ViewItem`]s describing what happened; the view styles and
//! prints them all at once, grouped by [`Section`], before the next prompt.
use colored::Colorize;
use textwrap::{fill, termwidth};

use crate::combat::BattleState;
use crate::save_files::SaveStatus;
use crate::style::{GameStyle, indented_block, normal_block};

pub mod view_item;

pub use view_item::*;

const ICON_SUCCESS: &str = "\u{2611}"; // ✔
const ICON_FAILURE: &str = "\u{274C}"; // ✖
const ICON_ERROR: &str = "⚠︎"; // U+26A0 U+FE0E
const ICON_ENGINE: &str = "⚙";
const ICON_LEVEL: &str = "🎉"; // U+1F389
const ICON_REWARD: &str = "➕";
const ICON_HIT: &str = "⚔";
const ICON_HARMED: &str = "\u{2623}";
const ICON_HEALED: &str = "\u{2624}";
const ICON_DEATH: &str = "☠";

/// View aggregates information to be displayed on each pass through the REPL and then organizes
/// and displays the result.
#[derive(Debug, Clone)]
pub struct View {
    pub width: usize,
    pub items: Vec<ViewItem>,
}
impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self {
            width: termwidth(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(item);
    }

    /// Compose and display everything queued this turn, then clear the queue.
    pub fn flush(&mut self) {
        self.width = termwidth();
        let mut items = std::mem::take(&mut self.items);
        // stable: keeps push order within a section
        items.sort_by_key(ViewItem::section);

        let mut current: Option<Section> = None;
        for item in &items {
            let section = item.section();
            if current != Some(section) {
                let label = match section {
                    Section::Status => "status",
                    Section::Combat => "battle",
                    Section::DirectResult => "results",
                    Section::System => "game",
                };
                println!("{:.>width$}\n", label.section_style(), width = self.width);
                current = Some(section);
            }
            render(item);
        }
        if !items.is_empty() {
            println!();
        }
    }
}

fn render(item: &ViewItem) {
    match item {
        ViewItem::ActionSuccess(msg) => println!("{}", fill(&format!("{ICON_SUCCESS:<4}{msg}"), normal_block())),
        ViewItem::ActionFailure(msg) => {
            println!("{}", fill(&format!("{:<4}{}", ICON_FAILURE, msg.denied_style()), normal_block()));
        },
        ViewItem::Error(msg) => println!("{:<4}{}", ICON_ERROR.error_style(), msg.error_style()),
        ViewItem::EngineMessage(msg) => println!("{}", fill(&format!("{ICON_ENGINE:<4}{msg}"), normal_block())),
        ViewItem::CharacterSheet(sheet) => character_sheet(sheet),
        ViewItem::Inventory { lines, used, capacity } => inventory(lines, *used, *capacity),
        ViewItem::ShopListing { gold, lines } => shop_listing(*gold, lines),
        ViewItem::QuestList { heading, quests } => quest_list(heading, quests),
        ViewItem::QuestChain(titles) => {
            println!("{}", "Prerequisite chain".subheading_style());
            for (step, title) in titles.iter().enumerate() {
                println!("  {}. {}", step + 1, title.quest_style());
            }
        },
        ViewItem::QuestProgress {
            completed,
            total,
            percent,
            rewards,
        } => {
            println!("{}", "Quest progress".subheading_style());
            println!("  Completed {completed} of {total} quests ({percent:.1}%)");
            println!(
                "  Earned from quests: {} and {}",
                format!("{} xp", rewards.xp).xp_style(),
                format!("{} gold", rewards.gold).gold_style()
            );
        },
        ViewItem::RewardsGranted { source, rewards } => println!(
            "{:<4}{source}: +{} +{}",
            ICON_REWARD.bright_green(),
            format!("{} xp", rewards.xp).xp_style(),
            format!("{} gold", rewards.gold).gold_style()
        ),
        ViewItem::LevelUp { name, level } => println!(
            "{:<4}{}",
            ICON_LEVEL,
            format!("{name} reached level {level}! Health restored.").bright_blue()
        ),
        ViewItem::BattleStarted {
            enemy,
            health,
            strength,
        } => println!("A {} appears! ({health} hp, {strength} str)", enemy.enemy_style()),
        ViewItem::CombatEvent { text, tone } => {
            let line = match tone {
                CombatTone::PlayerHit => format!("{:<4}{text}", ICON_HIT.bright_white()),
                CombatTone::PlayerHarmed => format!("{:<4}{}", ICON_HARMED.damage_style(), text.damage_style()),
                CombatTone::Healed => format!("{:<4}{}", ICON_HEALED.heal_style(), text.heal_style()),
                CombatTone::Neutral => format!("    {}", text.italic()),
            };
            println!("{}", fill(&line, normal_block()));
        },
        ViewItem::BattleStatus {
            character_health,
            character_max,
            enemy,
            enemy_health,
            enemy_max,
        } => println!(
            "    You: {character_health}/{character_max} hp | {}: {enemy_health}/{enemy_max} hp",
            enemy.enemy_style()
        ),
        ViewItem::BattleEnded { enemy, state, turns } => {
            let verdict = match state {
                BattleState::PlayerWon => format!("You defeated the {enemy}").bright_green(),
                BattleState::EnemyWon => format!("The {enemy} has beaten you").bright_red(),
                BattleState::Escaped => format!("You got away from the {enemy}").yellow(),
                BattleState::NotStarted | BattleState::Active => format!("The fight with the {enemy} goes on").normal(),
            };
            println!("{verdict} after {turns} round{}.", if *turns == 1 { "" } else { "s" });
        },
        ViewItem::CharacterDeath { name, revive_cost } => {
            println!("{:<4}{}", ICON_DEATH.bright_red(), format!("{name} has fallen.").bright_red());
            println!("    Type `revive` to return to the temple ({revive_cost} gold).");
        },
        ViewItem::Help(lines) => {
            println!("{}", "Commands".subheading_style());
            for line in lines {
                println!("  {:<28}{}", line.command.highlight(), line.description);
            }
        },
        ViewItem::GameLoaded { name, file } => {
            println!("{:<4}Loaded {} from {}", ICON_ENGINE, name.highlight(), file.dimmed());
        },
        ViewItem::GameSaved { name, file } => {
            println!("{:<4}Saved {} to {}", ICON_ENGINE, name.highlight(), file.dimmed());
        },
        ViewItem::SavedGamesList { directory, entries } => saved_games(directory, entries),
        ViewItem::QuitSummary {
            name,
            level,
            completed,
            total,
        } => {
            println!("{}", "Farewell".subheading_style());
            println!("  {name} retires at level {level} with {completed} of {total} quests complete.");
        },
    }
}

fn character_sheet(sheet: &CharacterSheet) {
    println!(
        "{} the {} (level {})",
        sheet.name.highlight(),
        sheet.class,
        sheet.level
    );
    println!(
        "  Health {}/{}  Strength {}  Magic {}",
        sheet.health, sheet.max_health, sheet.strength, sheet.magic
    );
    println!(
        "  {}  {}",
        format!("XP {}/{}", sheet.experience, sheet.next_level).xp_style(),
        format!("Gold {}", sheet.gold).gold_style()
    );
    let slot = |item: &Option<String>| item.as_deref().map_or_else(|| "(none)".dimmed(), |id| id.item_style());
    println!("  Weapon: {}  Armor: {}", slot(&sheet.weapon), slot(&sheet.armor));
    println!(
        "  Quests: {} active, {} completed",
        sheet.active_quests, sheet.completed_quests
    );
}

fn inventory(lines: &[InventoryLine], used: usize, capacity: usize) {
    println!("{}", format!("Inventory ({used}/{capacity})").subheading_style());
    if lines.is_empty() {
        println!("    {}", "You are carrying nothing.".italic());
        return;
    }
    for line in lines {
        let count = if line.count > 1 { format!(" x{}", line.count) } else { String::new() };
        println!(
            "  • {}{count} [{}] {} {}",
            line.name.item_style(),
            line.item_id.dimmed(),
            line.kind,
            line.effect.dimmed()
        );
    }
}

fn shop_listing(gold: Option<u32>, lines: &[ShopLine]) {
    match gold {
        Some(gold) => println!(
            "{} (you have {})",
            "For sale".subheading_style(),
            format!("{gold} gold").gold_style()
        ),
        None => println!("{}", "For sale".subheading_style()),
    }
    for line in lines {
        let price = format!("{:>5} gold", line.cost);
        let price = if line.affordable { price.gold_style() } else { price.dimmed() };
        println!(
            "  {price}  {} [{}] {} {}",
            line.name.item_style(),
            line.item_id.dimmed(),
            line.kind,
            line.effect.dimmed()
        );
    }
}

fn quest_list(heading: &str, quests: &[QuestLine]) {
    println!("{}", heading.subheading_style());
    if quests.is_empty() {
        println!("    {}", "Nothing here yet.".italic());
        return;
    }
    for quest in quests {
        let title = match quest.mark {
            QuestMark::Available | QuestMark::Active => quest.title.quest_style(),
            QuestMark::Completed => quest.title.quest_complete_style(),
            QuestMark::Locked => quest.title.quest_locked_style(),
        };
        println!(
            "  • {title} [{}] lvl {} ({} xp, {} gold)",
            quest.quest_id.dimmed(),
            quest.required_level,
            quest.rewards.xp,
            quest.rewards.gold
        );
        if matches!(quest.mark, QuestMark::Available | QuestMark::Active) {
            println!("{}", fill(&quest.description, indented_block()).description_style());
        }
    }
}

fn saved_games(directory: &str, entries: &[crate::save_files::SaveEntry]) {
    println!("{}", format!("Saved characters in {directory}/").subheading_style());
    if entries.is_empty() {
        println!(
            "    {}",
            "No saved characters found. Use `new <name> <class>` to create one.".italic()
        );
        return;
    }
    for entry in entries {
        match &entry.status {
            SaveStatus::Ready { class, level } => {
                println!("  • {} - level {level} {class}", entry.name.highlight());
            },
            SaveStatus::Corrupted { message } => {
                println!("  • {} {}", entry.name.highlight(), format!("(unreadable: {message})").error_style());
            },
        }
    }
}
