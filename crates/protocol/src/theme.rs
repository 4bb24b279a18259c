use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Border,

    // Sections
    SectionEven,
    SectionOdd,
    SectionTitle,
    SectionBody,

    // Pinned process steps
    StepPast,
    StepActive,
    StepFuture,
    StepText,

    // Navigation dots
    NavDot,
    NavDotActive,

    // Lead-capture overlay
    ModalScrim,
    ModalSurface,
    ModalText,
}
