//! Static game data registries
//!
//! Abilities, gadgets, target zones and enemies are loaded once from TOML and
//! never change during an encounter. Callers share one [`Registry`] behind an
//! `Arc`.

use ahash::AHashMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::abilities::definition::AbilityDef;
use crate::combat::record::EnemyTemplate;
use crate::combat::target_zone::ZoneTable;
use crate::core::error::RegistryError;
use crate::core::types::{AbilityId, CharacterClass, GadgetId};
use crate::gadgets::definition::GadgetDef;

const BUILTIN_ABILITIES: &str = include_str!("../../data/abilities.toml");
const BUILTIN_GADGETS: &str = include_str!("../../data/gadgets.toml");
const BUILTIN_ZONES: &str = include_str!("../../data/target_zones.toml");
const BUILTIN_ENEMIES: &str = include_str!("../../data/enemies.toml");

#[derive(Debug, Deserialize)]
struct AbilityFile {
    #[serde(default)]
    abilities: Vec<AbilityDef>,
}

#[derive(Debug, Deserialize)]
struct GadgetFile {
    #[serde(default)]
    gadgets: Vec<GadgetDef>,
}

#[derive(Debug, Deserialize)]
struct EnemyFile {
    #[serde(default)]
    enemies: Vec<EnemyTemplate>,
}

/// Immutable lookup tables for one game session
#[derive(Debug, Clone, Default)]
pub struct Registry {
    abilities: Vec<AbilityDef>,
    ability_index: AHashMap<AbilityId, usize>,
    gadgets: Vec<GadgetDef>,
    gadget_index: AHashMap<GadgetId, usize>,
    zones: ZoneTable,
    enemies: Vec<EnemyTemplate>,
    enemy_index: AHashMap<String, usize>,
}

impl Registry {
    /// Registry built from the data files compiled into the crate
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_sources(BUILTIN_ABILITIES, BUILTIN_GADGETS, BUILTIN_ZONES, BUILTIN_ENEMIES)
    }

    /// Shared handle to the built-in registry
    pub fn shared() -> Result<Arc<Self>, RegistryError> {
        Ok(Arc::new(Self::builtin()?))
    }

    /// Load `abilities.toml`, `gadgets.toml`, `target_zones.toml` and
    /// `enemies.toml` from a directory
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let dir = dir.as_ref();
        let abilities = fs::read_to_string(dir.join("abilities.toml"))?;
        let gadgets = fs::read_to_string(dir.join("gadgets.toml"))?;
        let zones = fs::read_to_string(dir.join("target_zones.toml"))?;
        let enemies = fs::read_to_string(dir.join("enemies.toml"))?;
        Self::from_sources(&abilities, &gadgets, &zones, &enemies)
    }

    pub fn from_sources(
        abilities: &str,
        gadgets: &str,
        zones: &str,
        enemies: &str,
    ) -> Result<Self, RegistryError> {
        let abilities: AbilityFile = toml::from_str(abilities)?;
        let gadgets: GadgetFile = toml::from_str(gadgets)?;
        let zones: ZoneTable = toml::from_str(zones)?;
        let enemies: EnemyFile = toml::from_str(enemies)?;

        let ability_index = index_by(&abilities.abilities, "ability", |a| a.id.clone())?;
        let gadget_index = index_by(&gadgets.gadgets, "gadget", |g| g.id.clone())?;
        let enemy_index = index_by(&enemies.enemies, "enemy", |e| e.id.clone())?;

        info!(
            abilities = abilities.abilities.len(),
            gadgets = gadgets.gadgets.len(),
            enemies = enemies.enemies.len(),
            "registry loaded"
        );

        Ok(Self {
            abilities: abilities.abilities,
            ability_index,
            gadgets: gadgets.gadgets,
            gadget_index,
            zones,
            enemies: enemies.enemies,
            enemy_index,
        })
    }

    pub fn ability(&self, id: &AbilityId) -> Option<&AbilityDef> {
        self.ability_index.get(id).map(|&idx| &self.abilities[idx])
    }

    pub fn gadget(&self, id: &GadgetId) -> Option<&GadgetDef> {
        self.gadget_index.get(id).map(|&idx| &self.gadgets[idx])
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemy_index.get(id).map(|&idx| &self.enemies[idx])
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    /// Abilities in file order
    pub fn abilities(&self) -> &[AbilityDef] {
        &self.abilities
    }

    /// Gadgets in file order
    pub fn gadgets(&self) -> &[GadgetDef] {
        &self.gadgets
    }

    pub fn enemies(&self) -> &[EnemyTemplate] {
        &self.enemies
    }

    /// Abilities a class learns, in file order
    pub fn class_abilities(&self, class: CharacterClass) -> Vec<AbilityId> {
        self.abilities
            .iter()
            .filter(|a| a.classes.contains(&class))
            .map(|a| a.id.clone())
            .collect()
    }
}

fn index_by<T, K, F>(items: &[T], kind: &'static str, key: F) -> Result<AHashMap<K, usize>, RegistryError>
where
    K: std::hash::Hash + Eq + std::fmt::Display,
    F: Fn(&T) -> K,
{
    let mut index = AHashMap::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let id = key(item);
        if index.contains_key(&id) {
            return Err(RegistryError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
        index.insert(id, idx);
    }
    Ok(index)
}
