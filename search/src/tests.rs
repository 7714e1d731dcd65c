use super::*;
use phrasemark_core::types::{Color, Phrase, PhraseStyle, StyleMap};
use proptest::prelude::*;
use rstest::rstest;
use std::sync::Arc;

mod common {
    use super::*;

    pub(super) const GREEN: Color = Color::rgb(0, 0xc0, 0);
    pub(super) const BLUE: Color = Color::rgb(0, 0, 0xc0);
    pub(super) const RED: Color = Color::rgb(0xc0, 0, 0);

    pub(super) fn style(phrase: &str, background: Color) -> PhraseStyle {
        PhraseStyle::new(
            Phrase::try_new(phrase.to_string()).unwrap(),
            background,
            Color::BLACK,
        )
    }

    pub(super) fn index_of(phrases: &[&str]) -> PhraseIndex {
        let map: StyleMap = phrases.iter().map(|p| style(p, GREEN)).collect();
        PhraseIndex::build(&map)
    }

    /// Matched substrings, in order.
    pub(super) fn matched<'t>(text: &'t str, index: &PhraseIndex) -> Vec<&'t str> {
        find_matches(text, index)
            .iter()
            .map(|span| span.text(text))
            .collect()
    }
}

mod index {
    use super::common::*;
    use super::*;

    #[test]
    fn test_orders_longest_first_with_stable_ties() {
        let index = index_of(&["ab", "abcd", "xy", "abc"]);
        let order: Vec<&str> = index.entries().iter().map(|e| e.phrase()).collect();
        assert_eq!(order, ["abcd", "abc", "ab", "xy"]);
    }

    #[rstest]
    #[case("US", true)]
    #[case("C++", true)]
    #[case("U.S.A.", true)]
    #[case("Remote (US)", false)]
    #[case("remote", false)]
    #[case("2024", false)]
    #[case("--", false)]
    #[case("ÉTÉ", true)]
    fn test_case_classification(#[case] phrase: &str, #[case] sensitive: bool) {
        let index = index_of(&[phrase]);
        let entry = &index.entries()[0];
        assert_eq!(entry.is_case_sensitive(), sensitive);
        assert_eq!(entry.folded().is_none(), sensitive);
    }

    #[test]
    fn test_length_is_measured_in_chars() {
        let index = index_of(&["ééé", "abcd"]);
        assert_eq!(index.entries()[0].phrase(), "abcd");
        assert_eq!(index.entries()[1].char_len(), 3);
    }
}

mod cache {
    use super::common::*;
    use super::*;

    #[test]
    fn test_same_arc_is_not_rebuilt() {
        let styles = Arc::new(StyleMap::from_iter([style("code", GREEN)]));
        let mut cache = IndexCache::new();

        let first = cache.get_or_build(&styles);
        let second = cache.get_or_build(&styles);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn test_new_arc_with_equal_contents_rebuilds() {
        let map = StyleMap::from_iter([style("code", GREEN)]);
        let mut cache = IndexCache::new();

        cache.get_or_build(&Arc::new(map.clone()));
        cache.get_or_build(&Arc::new(map));

        assert_eq!(cache.builds(), 2);
    }

    #[test]
    fn test_clear_drops_index() {
        let styles = Arc::new(StyleMap::from_iter([style("code", GREEN)]));
        let mut cache = IndexCache::new();
        cache.get_or_build(&styles);
        cache.clear();
        assert!(cache.current().is_none());
        cache.get_or_build(&styles);
        assert_eq!(cache.builds(), 2);
    }
}

mod find_matches {
    use super::common::*;
    use super::*;

    #[test]
    fn test_longest_phrase_wins_over_contained_ones() {
        let map = StyleMap::from_iter([
            style("remote", GREEN),
            style("US", BLUE),
            style("Remote (US)", RED),
        ]);
        let index = PhraseIndex::build(&map);
        let text = "London, England, GB / Remote (US) - fulltime";

        let spans = find_matches(text, &index);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(text), "Remote (US)");
        assert_eq!(spans[0].style.background, RED);
    }

    #[test]
    fn test_longer_phrase_consumes_shorter_prefix() {
        let map = StyleMap::from_iter([style("code", GREEN), style("code review", RED)]);
        let index = PhraseIndex::build(&map);
        let text = "Please do a code review";

        let spans = find_matches(text, &index);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(text), "code review");
        assert_eq!(spans[0].style.background, RED);
    }

    #[test]
    fn test_result_ignores_insertion_order() {
        let text = "Please do a code review, then code.";
        let forward = StyleMap::from_iter([style("code", GREEN), style("code review", RED)]);
        let backward = StyleMap::from_iter([style("code review", RED), style("code", GREEN)]);
        let forward = PhraseIndex::build(&forward);
        let backward = PhraseIndex::build(&backward);

        assert_eq!(find_matches(text, &forward), find_matches(text, &backward));
        assert_eq!(matched(text, &forward), ["code review", "code"]);
    }

    #[rstest]
    #[case::uppercase_only_exact("US", "us and US", &["US"])]
    #[case::lowercase_any_case("remote", "Remote REMOTE remote", &["Remote", "REMOTE", "remote"])]
    #[case::mixed_any_case("iPhone", "IPHONE iphone", &["IPHONE", "iphone"])]
    #[case::word_boundary_both_sides("cat", "cat concat cats cat_ (cat)", &["cat", "cat"])]
    #[case::digits_are_word_chars("v2", "v2 v22 av2", &["v2"])]
    #[case::punctuation_edge_is_exempt("-", "a-b", &["-"])]
    #[case::trailing_punctuation_exempt("++", "C++x", &["++"])]
    #[case::leading_word_edge_still_checked("C++", "xC++ C++", &["C++"])]
    #[case::buffer_edges_are_boundaries("go", "go", &["go"])]
    #[case::unicode_folding("straße", "STRASSE Straße", &["Straße"])]
    #[case::unicode_word_chars("été", "étés été", &["été"])]
    fn test_matching_rules(#[case] phrase: &str, #[case] text: &str, #[case] expected: &[&str]) {
        let index = index_of(&[phrase]);
        assert_eq!(matched(text, &index), expected);
    }

    #[test]
    fn test_spans_are_byte_offsets_on_char_boundaries() {
        let index = index_of(&["naïve"]);
        let text = "très naïve";
        let spans = find_matches(text, &index);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (6, 12));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_matches("anything", &PhraseIndex::default()).is_empty());
        assert!(find_matches("", &index_of(&["x"])).is_empty());
    }

    #[test]
    fn test_adjacent_matches_are_all_found() {
        let index = index_of(&["ab"]);
        assert_eq!(matched("ab ab,ab", &index), ["ab", "ab", "ab"]);
    }
}

mod properties {
    use super::common::*;
    use super::*;

    fn arb_phrases() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-cA-C_ -]{1,4}", 1..6).prop_filter(
            "phrases must survive trimming",
            |phrases| phrases.iter().all(|p| !p.trim().is_empty()),
        )
    }

    proptest! {
        /// Spans are sorted, non-overlapping and in bounds.
        #[test]
        fn prop_spans_sorted_and_disjoint(
            phrases in arb_phrases(),
            text in "[a-cA-C_ .é-]{0,40}",
        ) {
            let refs: Vec<&str> = phrases.iter().map(String::as_str).collect();
            let index = index_of(&refs);
            let spans = find_matches(&text, &index);

            for span in &spans {
                prop_assert!(span.start < span.end);
                prop_assert!(span.end <= text.len());
                prop_assert!(text.is_char_boundary(span.start));
                prop_assert!(text.is_char_boundary(span.end));
            }
            for pair in spans.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
        }

        /// Every span is its phrase, exact for case-sensitive phrases and
        /// case-folded otherwise.
        #[test]
        fn prop_spans_spell_their_phrase(
            phrases in arb_phrases(),
            text in "[a-cA-C_ -]{0,40}",
        ) {
            let refs: Vec<&str> = phrases.iter().map(String::as_str).collect();
            let index = index_of(&refs);

            for span in find_matches(&text, &index) {
                let found = span.text(&text);
                let phrase = span.style.phrase.as_str();
                let entry = index.entries().iter().find(|e| e.phrase() == phrase).unwrap();
                if entry.is_case_sensitive() {
                    prop_assert_eq!(found, phrase);
                } else {
                    prop_assert_eq!(found.to_lowercase(), phrase.to_lowercase());
                }
            }
        }
    }
}
