use serde::{Deserialize, Serialize};

/// One of the six fixed provider voice identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceId(pub &'static str);

const PROFESSIONAL_FEMALE: VoiceId = VoiceId("aria");
const PROFESSIONAL_MALE: VoiceId = VoiceId("roger");
const FRIENDLY_FEMALE: VoiceId = VoiceId("sarah");
const FRIENDLY_MALE: VoiceId = VoiceId("charlie");
const ENERGETIC_FEMALE: VoiceId = VoiceId("jessica");
const ENERGETIC_MALE: VoiceId = VoiceId("brian");

/// Maps a free-form personality descriptor onto a voice.
///
/// Simple keyword match: tone (energetic/friendly/professional) crossed with
/// gender (male/female). Unmatched tone falls back to professional;
/// unmatched gender falls back to female.
pub fn select_voice(personality: &str) -> VoiceId {
    let normalized = personality.to_ascii_lowercase();
    let male = normalized.contains("male") && !normalized.contains("female");

    if normalized.contains("energetic") || normalized.contains("upbeat") {
        if male {
            ENERGETIC_MALE
        } else {
            ENERGETIC_FEMALE
        }
    } else if normalized.contains("friendly") || normalized.contains("warm") {
        if male {
            FRIENDLY_MALE
        } else {
            FRIENDLY_FEMALE
        }
    } else if male {
        PROFESSIONAL_MALE
    } else {
        PROFESSIONAL_FEMALE
    }
}

#[cfg(test)]
mod tests {
    use super::select_voice;

    #[test]
    fn tone_and_gender_cross_product() {
        assert_eq!(select_voice("energetic male host").0, "brian");
        assert_eq!(select_voice("Energetic and bubbly female").0, "jessica");
        assert_eq!(select_voice("warm, friendly male").0, "charlie");
        assert_eq!(select_voice("friendly").0, "sarah");
        assert_eq!(select_voice("professional male").0, "roger");
    }

    #[test]
    fn default_is_professional_female() {
        assert_eq!(select_voice("").0, "aria");
        assert_eq!(select_voice("stoic and mysterious").0, "aria");
    }

    #[test]
    fn female_keyword_is_not_mistaken_for_male() {
        assert_eq!(select_voice("professional female").0, "aria");
    }
}
