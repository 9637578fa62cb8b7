//! Block classification: every chunk gets exactly one label.
//!
//! The four core blocks (Anger, Anxiety, Depression, Guilt) are checked first
//! by name; secondary topics are checked next against ordered keyword lists.
//! First match wins; there is no scoring and no multi-label output. The
//! matching is deliberately coarse (lowercase substring), and the declaration
//! order below is part of the contract: retrieval filtering downstream
//! depends on it.

use serde::{Deserialize, Serialize};

/// Category label assigned to a chunk.
///
/// Serializes as the human-readable name (e.g. `"Mental Contamination"`),
/// which is what retrieval consumers filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockLabel {
    Anger,
    Anxiety,
    Depression,
    Guilt,
    #[serde(rename = "Mental Contamination")]
    MentalContamination,
    #[serde(rename = "Three Insights")]
    ThreeInsights,
    #[serde(rename = "ABCs")]
    Abcs,
    #[serde(rename = "Irrational Beliefs")]
    IrrationalBeliefs,
    Happiness,
    #[serde(rename = "Zen Meditation")]
    ZenMeditation,
    #[serde(rename = "Healthy Living")]
    HealthyLiving,
    General,
}

/// The four core emotional blocks, in check order.
pub const CORE_BLOCKS: [BlockLabel; 4] = [
    BlockLabel::Anger,
    BlockLabel::Anxiety,
    BlockLabel::Depression,
    BlockLabel::Guilt,
];

/// Secondary topic table, in check order. Consulted only when no core block
/// name appears in the chunk.
const TOPIC_KEYWORDS: [(BlockLabel, &[&str]); 11] = [
    (
        BlockLabel::MentalContamination,
        &["mental contamination", "contamination", "thought"],
    ),
    (
        BlockLabel::ThreeInsights,
        &["three insights", "first insight", "second insight", "third insight"],
    ),
    (
        BlockLabel::Abcs,
        &["abc", "activating event", "belief", "consequence", "emotional consequence"],
    ),
    (
        BlockLabel::IrrationalBeliefs,
        &["irrational belief", "seven irrational", "awfuliz", "must", "should"],
    ),
    (BlockLabel::Anger, &["anger", "formula for anger", "angry formula"]),
    (BlockLabel::Anxiety, &["anxiety", "formula for anxiety", "anxious formula"]),
    (
        BlockLabel::Depression,
        &["depression", "formula for depression", "depressed formula"],
    ),
    (BlockLabel::Guilt, &["guilt", "formula for guilt", "guilty formula"]),
    (
        BlockLabel::Happiness,
        &["happiness", "formula for happiness", "joy", "contentment"],
    ),
    (
        BlockLabel::ZenMeditation,
        &["zen", "meditation", "mindfulness", "ox-herding"],
    ),
    (BlockLabel::HealthyLiving, &["healthy body", "healthy mind", "body", "mind"]),
];

/// Topics listed under `additional_topics` in the output envelope.
pub const ADDITIONAL_TOPICS: [BlockLabel; 6] = [
    BlockLabel::MentalContamination,
    BlockLabel::Abcs,
    BlockLabel::ThreeInsights,
    BlockLabel::IrrationalBeliefs,
    BlockLabel::Happiness,
    BlockLabel::ZenMeditation,
];

impl BlockLabel {
    /// Human-readable name, as persisted in `block_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anger => "Anger",
            Self::Anxiety => "Anxiety",
            Self::Depression => "Depression",
            Self::Guilt => "Guilt",
            Self::MentalContamination => "Mental Contamination",
            Self::ThreeInsights => "Three Insights",
            Self::Abcs => "ABCs",
            Self::IrrationalBeliefs => "Irrational Beliefs",
            Self::Happiness => "Happiness",
            Self::ZenMeditation => "Zen Meditation",
            Self::HealthyLiving => "Healthy Living",
            Self::General => "General",
        }
    }

    /// Short code used in chapter summaries (first three letters, uppercased).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Anger => "ANG",
            Self::Anxiety => "ANX",
            Self::Depression => "DEP",
            Self::Guilt => "GUI",
            Self::MentalContamination => "MEN",
            Self::ThreeInsights => "THR",
            Self::Abcs => "ABC",
            Self::IrrationalBeliefs => "IRR",
            Self::Happiness => "HAP",
            Self::ZenMeditation => "ZEN",
            Self::HealthyLiving => "HEA",
            Self::General => "GEN",
        }
    }

    /// Lowercase, underscore-joined form used in `metadata.category`.
    pub fn category_slug(&self) -> String {
        self.as_str().to_lowercase().replace(' ', "_")
    }

    /// Map a curated knowledge-base chapter code to its label.
    ///
    /// These are the codes hand-assigned in the unified training data, not
    /// the summary codes from [`BlockLabel::code`]. Unknown codes fall back
    /// to `General`.
    pub fn from_chapter_code(code: &str) -> Self {
        match code {
            "ANG" => Self::Anger,
            "ANX" => Self::Anxiety,
            "DEP" => Self::Depression,
            "GUILT" => Self::Guilt,
            "MC" => Self::MentalContamination,
            "ABC" => Self::Abcs,
            "INS" => Self::ThreeInsights,
            "IRR" => Self::IrrationalBeliefs,
            "HAP" => Self::Happiness,
            _ => Self::General,
        }
    }
}

impl std::fmt::Display for BlockLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one chunk of text.
///
/// Core block names are tested first (case-insensitive substring on the name
/// itself), then the secondary keyword table in declaration order. Returns
/// `General` when nothing matches.
pub fn classify(text: &str) -> BlockLabel {
    let lower = text.to_lowercase();

    for block in CORE_BLOCKS {
        if lower.contains(&block.as_str().to_lowercase()) {
            return block;
        }
    }

    for (label, keywords) in TOPIC_KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return label;
        }
    }

    BlockLabel::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_block_wins_over_secondary_topic() {
        // "anger" is a core block; "meditation" is only a secondary keyword.
        let text = "When anger rises during meditation, notice it and return to the breath.";
        assert_eq!(classify(text), BlockLabel::Anger);
    }

    #[test]
    fn core_blocks_checked_in_order() {
        let text = "Depression and anxiety often travel together.";
        // Anxiety comes before Depression in the core list.
        assert_eq!(classify(text), BlockLabel::Anxiety);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("GUILT is the fourth block."), BlockLabel::Guilt);
        assert_eq!(classify("The ABCs of emotion"), BlockLabel::Abcs);
    }

    #[test]
    fn secondary_topics_matched_in_declaration_order() {
        // "thought" (Mental Contamination) appears before "belief" (ABCs)
        // in the table, so Mental Contamination wins regardless of position
        // in the text.
        let text = "Every belief begins as a passing thought.";
        assert_eq!(classify(text), BlockLabel::MentalContamination);

        // "zen" only: falls through to Zen Meditation.
        assert_eq!(classify("The old zen masters knew this."), BlockLabel::ZenMeditation);
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(
            classify("The weather was pleasant that day."),
            BlockLabel::General
        );
    }

    #[test]
    fn chapter_codes_map_to_labels() {
        assert_eq!(BlockLabel::from_chapter_code("ANG"), BlockLabel::Anger);
        assert_eq!(BlockLabel::from_chapter_code("GUILT"), BlockLabel::Guilt);
        assert_eq!(
            BlockLabel::from_chapter_code("MC"),
            BlockLabel::MentalContamination
        );
        assert_eq!(BlockLabel::from_chapter_code("INS"), BlockLabel::ThreeInsights);
        assert_eq!(BlockLabel::from_chapter_code("XYZ"), BlockLabel::General);
        assert_eq!(BlockLabel::from_chapter_code(""), BlockLabel::General);
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&BlockLabel::MentalContamination).unwrap();
        assert_eq!(json, "\"Mental Contamination\"");

        let back: BlockLabel = serde_json::from_str("\"ABCs\"").unwrap();
        assert_eq!(back, BlockLabel::Abcs);
    }

    #[test]
    fn category_slug_is_lowercase_underscored() {
        assert_eq!(BlockLabel::Anger.category_slug(), "anger");
        assert_eq!(
            BlockLabel::MentalContamination.category_slug(),
            "mental_contamination"
        );
        assert_eq!(BlockLabel::Abcs.category_slug(), "abcs");
    }

    #[test]
    fn codes_are_first_three_letters() {
        assert_eq!(BlockLabel::Anger.code(), "ANG");
        assert_eq!(BlockLabel::Guilt.code(), "GUI");
        assert_eq!(BlockLabel::ZenMeditation.code(), "ZEN");
        assert_eq!(BlockLabel::General.code(), "GEN");
    }
}
