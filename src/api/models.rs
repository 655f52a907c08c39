use serde::Deserialize;
use std::collections::HashMap;

use crate::analysis::records::{HeroId, HeroStatRecord};

// GET /players/{account_id}
#[derive(Debug, Deserialize)]
pub struct PlayerDto {
    #[serde(default)]
    pub profile: Option<ProfileDto>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProfileDto {
    #[serde(default)]
    pub personaname: Option<String>,
}

// GET /heroes
#[derive(Debug, Deserialize, Clone)]
pub struct HeroDto {
    pub id: HeroId,
    #[serde(default)]
    pub localized_name: String,
}

/// Fill in display names on hero stats from the hero metadata table.
/// Stats that already carry a name keep it.
pub fn attach_hero_names(stats: &mut [HeroStatRecord], heroes: &[HeroDto]) {
    let names: HashMap<HeroId, &str> = heroes
        .iter()
        .filter(|h| !h.localized_name.is_empty())
        .map(|h| (h.id, h.localized_name.as_str()))
        .collect();

    for stat in stats.iter_mut().filter(|s| s.name.is_none()) {
        if let Some(name) = names.get(&stat.hero_id) {
            stat.name = Some((*name).to_string());
        }
    }
}
