/// Balance ruleset selecting between alternative formulas of the same skill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Ruleset {
    #[default]
    Classic,
    Renewal,
}

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Ruleset stamped into every new cast context.
    pub ruleset: Ruleset,
    /// Maximum number of nested forwards/resumptions a single cast may spawn.
    pub max_chain_depth: u8,
    /// Ground unit groups one source may keep alive; the oldest is evicted past this.
    pub max_units_per_source: usize,
    /// Seed for the process-wide random source.
    pub rng_seed: u64,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Highest level any player skill may be registered with.
    pub const MAX_SKILL_LEVEL: u8 = 13;
    pub const MAX_DEFERRALS: usize = 8;
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_CHAIN_DEPTH: u8 = 4;
    pub const DEFAULT_MAX_UNITS_PER_SOURCE: usize = 25;
    pub const DEFAULT_RNG_SEED: u64 = 0x5EED_C0DE;

    pub fn new() -> Self {
        Self {
            ruleset: Ruleset::Classic,
            max_chain_depth: Self::DEFAULT_MAX_CHAIN_DEPTH,
            max_units_per_source: Self::DEFAULT_MAX_UNITS_PER_SOURCE,
            rng_seed: Self::DEFAULT_RNG_SEED,
        }
    }

    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
