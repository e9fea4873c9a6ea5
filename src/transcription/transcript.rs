use std::collections::BTreeMap;

/// Rebuilds an ordered transcript from partial-result fragments.
///
/// The speech service delivers fragments out of order; each carries the
/// audio offset (milliseconds) where its text begins. Keeping them in an
/// ordered map keyed by that offset makes the rebuild a straight walk, and
/// re-delivery of an offset simply replaces the older fragment.
#[derive(Debug, Default)]
pub struct TranscriptAssembler {
    fragments: BTreeMap<u64, String>,
}

impl TranscriptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, audio_start: u64, text: impl Into<String>) {
        self.fragments.insert(audio_start, text.into());
    }

    /// The transcript so far, fragments joined in offset order.
    pub fn render(&self) -> String {
        self.fragments
            .values()
            .filter(|text| !text.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_render_in_offset_order_regardless_of_arrival() {
        let mut assembler = TranscriptAssembler::new();
        assembler.insert(3200, "soon");
        assembler.insert(0, "see");
        assembler.insert(1600, "you");
        assert_eq!(assembler.render(), "see you soon");
    }

    #[test]
    fn redelivered_offset_replaces_the_older_fragment() {
        let mut assembler = TranscriptAssembler::new();
        assembler.insert(0, "hullo");
        assembler.insert(0, "hello");
        assert_eq!(assembler.render(), "hello");
    }

    #[test]
    fn empty_fragments_do_not_pad_the_transcript() {
        let mut assembler = TranscriptAssembler::new();
        assembler.insert(0, "hello");
        assembler.insert(800, "");
        assembler.insert(1600, "there");
        assert_eq!(assembler.render(), "hello there");
    }

    #[test]
    fn render_is_stable_across_calls() {
        let mut assembler = TranscriptAssembler::new();
        assembler.insert(0, "hello");
        assert_eq!(assembler.render(), assembler.render());

        assembler.clear();
        assert!(assembler.is_empty());
        assert_eq!(assembler.render(), "");
    }
}
