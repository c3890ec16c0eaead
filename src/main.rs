//! Demo stage: the original site's hero effects in one window.

use sitefx::prelude::*;

fn main() -> Result<(), StageError> {
    env_logger::init();

    Stage::new()
        .with_title("sitefx")
        .with_plasma(PlasmaConfig {
            color: "#A8F0FF".to_string(),
            ..PlasmaConfig::default()
        })
        .with_particle_field(FieldConfig {
            count: 400,
            magnet_radius: 25.0,
            ring_radius: 12.0,
            color: "#A8F0FF".to_string(),
            particle_size: 1.5,
            ..FieldConfig::default()
        })
        .with_click_spark(SparkConfig::default())
        .with_typewriter(
            ["Innovation", "Collaboration", "Open Source", "Technology", "Community"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            TypewriterConfig::default(),
        )
        .run()
}
