use once_cell::sync::Lazy;

use crate::models::domain::SectionDefinition;

/// Default schema for `POST /api/studies/generate`. Order is the order
/// sections are rendered in; ids must stay unique.
pub static STUDY_SECTIONS: Lazy<Vec<SectionDefinition>> = Lazy::new(|| {
    vec![
        SectionDefinition::new(
            "context",
            "Context",
            "What is the historical and literary setting of this topic?",
        ),
        SectionDefinition::new(
            "observation",
            "Observation",
            "What do the key passages on this topic actually say?",
        ),
        SectionDefinition::new(
            "interpretation",
            "Interpretation",
            "What did this mean to its original audience?",
        ),
        SectionDefinition::new(
            "application",
            "Application",
            "How does this truth shape life and practice today?",
        ),
        SectionDefinition::new(
            "reflection",
            "Reflection",
            "What question should the reader sit with after studying this?",
        ),
    ]
});

/// Default schema for the game-shaped sibling endpoint
/// `POST /api/rooms/generate`. Rooms behave exactly like sections in the
/// pipeline; only the framing differs.
pub static ROOM_SECTIONS: Lazy<Vec<SectionDefinition>> = Lazy::new(|| {
    vec![
        SectionDefinition::new(
            "threshold",
            "The Threshold",
            "What opening scene draws the player into the topic?",
        ),
        SectionDefinition::new(
            "archive",
            "The Archive",
            "What background facts must the player uncover to proceed?",
        ),
        SectionDefinition::new(
            "crossing",
            "The Crossing",
            "What central tension or dilemma must the player resolve?",
        ),
        SectionDefinition::new(
            "sanctum",
            "The Sanctum",
            "What culminating insight rewards the player at the end?",
        ),
    ]
});
