use anyhow::Result as AnyResult;
use tile_siege_core::Event;

use crate::{AssetProvider, SoundSink};

/// Sound effects triggered by simulation events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// An enemy entered the field.
    Spawn,
    /// A tower was built.
    Build,
    /// A placement was refused.
    Denied,
    /// A tower fired.
    Shot,
    /// A tower destroyed an enemy.
    EnemyDown,
    /// An enemy reached the core.
    CoreHit,
    /// A wave was cleared.
    WaveClear,
    /// The core fell.
    Defeat,
}

impl SoundKey {
    /// Stable asset name of the sound.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spawn => "spawn",
            Self::Build => "build",
            Self::Denied => "denied",
            Self::Shot => "shot",
            Self::EnemyDown => "enemy_down",
            Self::CoreHit => "core_hit",
            Self::WaveClear => "wave_clear",
            Self::Defeat => "defeat",
        }
    }
}

/// Sound effect played for an event, if any.
#[must_use]
pub fn sound_for(event: &Event) -> Option<SoundKey> {
    match event {
        Event::EnemySpawned { .. } => Some(SoundKey::Spawn),
        Event::ObstaclePlaced { .. } => Some(SoundKey::Build),
        Event::PlacementRejected { .. } => Some(SoundKey::Denied),
        Event::TowerFired { .. } => Some(SoundKey::Shot),
        Event::EnemyDestroyed { .. } => Some(SoundKey::EnemyDown),
        Event::EnemyReachedGoal { .. } => Some(SoundKey::CoreHit),
        Event::WaveCompleted { .. } => Some(SoundKey::WaveClear),
        Event::ObjectiveDestroyed => Some(SoundKey::Defeat),
        Event::EnemyStranded { .. }
        | Event::PathsInvalidated { .. }
        | Event::WaveStarted { .. } => None,
    }
}

/// Plays the sound of every event whose effect the provider can resolve.
///
/// Returns the number of sounds played.
pub fn play_event_sounds(
    events: &[Event],
    assets: &dyn AssetProvider,
    sink: &mut dyn SoundSink,
) -> AnyResult<usize> {
    let mut played = 0;
    for key in events.iter().filter_map(sound_for) {
        if assets.sound(key).is_none() {
            tracing::debug!(sound = key.name(), "sound asset missing; skipping");
            continue;
        }
        sink.play_sound(key)?;
        played += 1;
    }
    Ok(played)
}
