//! Damage model and attack resolution

pub mod attack;
pub mod cause;
pub mod element;
pub mod indicator;
pub mod manager;
pub mod metadata;
pub mod packet;

pub use attack::{AttackKind, AttackMetadata, EntityMetadata, SharedAttack};
pub use cause::DamageCause;
pub use element::Element;
pub use indicator::{indicators, DamageIndicators, Indicator, IndicatorSink};
pub use manager::{
    AttackHandler, AttackOutcome, DamageManager, DamageOccurrence, Damager, OccurrenceKey,
};
pub use metadata::{DamageMetadata, MINIMAL_DAMAGE};
pub use packet::{DamagePacket, DamageType};
