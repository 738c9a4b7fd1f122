use combat_content::ActorSpec;
use combat_core::{EntityId, Position, StatusEffects, StatusEntry};

/// A combatant owned by the host world.
#[derive(Clone, Debug)]
pub struct Actor {
    pub id: EntityId,
    pub name: String,
    pub hp: i64,
    pub max_hp: i64,
    pub attack: i64,
    pub position: Position,
    pub faction: u8,
    /// Flat accuracy bonus added to every hit chance.
    pub hit: i32,
    /// Flat evasion subtracted from incoming hit chance.
    pub flee: i32,
    /// Immune actors report `Immune` for every attack.
    pub immune: bool,
    pub statuses: StatusEffects,
}

impl Actor {
    pub fn new(id: EntityId, name: impl Into<String>, position: Position, faction: u8) -> Self {
        Self {
            id,
            name: name.into(),
            hp: 100,
            max_hp: 100,
            attack: 10,
            position,
            faction,
            hit: 0,
            flee: 0,
            immune: false,
            statuses: StatusEffects::new(),
        }
    }

    pub fn from_spec(spec: &ActorSpec) -> Self {
        Self::new(spec.entity(), spec.name.clone(), spec.position, spec.faction)
            .with_hp(spec.hp)
            .with_attack(spec.attack)
            .with_accuracy(spec.hit, spec.flee)
            .with_immunity(spec.immune)
    }

    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = hp;
        self.max_hp = hp;
        self
    }

    pub fn with_attack(mut self, attack: i64) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_accuracy(mut self, hit: i32, flee: i32) -> Self {
        self.hit = hit;
        self.flee = flee;
        self
    }

    pub fn with_immunity(mut self, immune: bool) -> Self {
        self.immune = immune;
        self
    }

    pub fn snapshot(&self, now: combat_core::Tick) -> ActorState {
        ActorState {
            id: self.id,
            name: self.name.clone(),
            hp: self.hp,
            max_hp: self.max_hp,
            position: self.position,
            faction: self.faction,
            statuses: self
                .statuses
                .iter()
                .filter(|entry| entry.is_active(now))
                .copied()
                .collect(),
        }
    }
}

/// Read-only copy of an actor for clients.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActorState {
    pub id: EntityId,
    pub name: String,
    pub hp: i64,
    pub max_hp: i64,
    pub position: Position,
    pub faction: u8,
    pub statuses: Vec<StatusEntry>,
}
