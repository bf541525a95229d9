// Fighting styles - the move set an actor attacks with

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;

use crate::engine::assets::{AssetLoader, AssetType};

use super::moves::MoveDefinition;

/// Kind of attack being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    /// Next move of the light chain
    Light,
    /// Held-then-released attack
    Medium,
    Heavy,
    Special,
    /// Evasive flip; only starts from neutral, never chains
    Acrobatic,
}

impl AttackKind {
    /// Whether this kind restarts the light chain
    pub fn resets_chain(&self) -> bool {
        !matches!(self, Self::Light)
    }
}

/// A named set of moves. Moves are shared and read-only once loaded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FightingStyle {
    pub name: String,
    /// Light combo chain, played in order
    pub light_attacks: Vec<Arc<MoveDefinition>>,
    pub medium_attack: Option<Arc<MoveDefinition>>,
    pub heavy_attack: Option<Arc<MoveDefinition>>,
    pub special_attack: Option<Arc<MoveDefinition>>,
    pub acrobatic_flip: Option<Arc<MoveDefinition>>,
}

impl FightingStyle {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_light(mut self, mv: MoveDefinition) -> Self {
        self.light_attacks.push(Arc::new(mv));
        self
    }

    pub fn with_medium(mut self, mv: MoveDefinition) -> Self {
        self.medium_attack = Some(Arc::new(mv));
        self
    }

    pub fn with_heavy(mut self, mv: MoveDefinition) -> Self {
        self.heavy_attack = Some(Arc::new(mv));
        self
    }

    pub fn with_special(mut self, mv: MoveDefinition) -> Self {
        self.special_attack = Some(Arc::new(mv));
        self
    }

    pub fn with_acrobatic(mut self, mv: MoveDefinition) -> Self {
        self.acrobatic_flip = Some(Arc::new(mv));
        self
    }

    /// Load a style from `<root>/styles/<name>` and run authoring validation on every move
    pub fn load(loader: &AssetLoader, name: &str) -> Result<Self> {
        let mut style: FightingStyle = loader.load_json(AssetType::Style, name)?;
        if style.name.is_empty() {
            style.name = name.trim_end_matches(".json").to_string();
        }
        let corrected = style.validate();
        log::info!(
            "Loaded style '{}' ({} light moves, {} corrected)",
            style.name,
            style.light_attacks.len(),
            corrected
        );
        Ok(style)
    }

    /// Validate every move, returning how many needed correcting
    pub fn validate(&mut self) -> usize {
        let mut corrected = 0;
        for mv in self.moves_mut() {
            if Arc::make_mut(mv).validate() {
                corrected += 1;
            }
        }
        corrected
    }

    fn moves_mut(&mut self) -> impl Iterator<Item = &mut Arc<MoveDefinition>> {
        self.light_attacks.iter_mut().chain(
            [
                &mut self.medium_attack,
                &mut self.heavy_attack,
                &mut self.special_attack,
                &mut self.acrobatic_flip,
            ]
            .into_iter()
            .flatten(),
        )
    }

    /// Light move at `combo_index`, wrapping around the chain
    pub fn light(&self, combo_index: usize) -> Option<&Arc<MoveDefinition>> {
        if self.light_attacks.is_empty() {
            return None;
        }
        self.light_attacks.get(combo_index % self.light_attacks.len())
    }

    /// Move for a non-chained attack kind
    pub fn single(&self, kind: AttackKind) -> Option<&Arc<MoveDefinition>> {
        match kind {
            AttackKind::Light => self.light(0),
            AttackKind::Medium => self.medium_attack.as_ref(),
            AttackKind::Heavy => self.heavy_attack.as_ref(),
            AttackKind::Special => self.special_attack.as_ref(),
            AttackKind::Acrobatic => self.acrobatic_flip.as_ref(),
        }
    }
}
