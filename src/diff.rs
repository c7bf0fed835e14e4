//! Unit-wise comparison of a word against a narrator's variant reading.
//!
//! A unit is one base character followed by its short-vowel and sukun marks.
//! Dot markers in the variant are visual separators: they are skipped when
//! aligning and never reported as different.

const DIACRITICS: [char; 4] = ['\u{064E}', '\u{0650}', '\u{064F}', '\u{0652}'];
const DOT_MARKERS: [char; 2] = ['.', '\u{066B}'];

/// A run of variant text that either matches the original or does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSegment {
    pub text: String,
    pub differs: bool,
}

fn is_diacritic(ch: char) -> bool {
    DIACRITICS.contains(&ch)
}

fn is_dot_marker(unit: &str) -> bool {
    unit.chars().next().is_some_and(|ch| DOT_MARKERS.contains(&ch))
}

/// Splits `text` into base-plus-diacritics units.
pub fn group_units(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        if is_diacritic(ch) && start.is_some() {
            continue;
        }
        if let Some(begin) = start {
            units.push(&text[begin..idx]);
        }
        start = Some(idx);
    }
    if let Some(begin) = start {
        units.push(&text[begin..]);
    }
    units
}

/// Marks each unit of `variant` against the unit at the same position in
/// `original`, then merges neighbouring units with the same mark.
pub fn compare(original: &str, variant: &str) -> Vec<DiffSegment> {
    let original = group_units(original);
    let mut aligned = original.iter();

    let mut segments: Vec<DiffSegment> = Vec::new();
    for unit in group_units(variant) {
        let differs = if is_dot_marker(unit) {
            false
        } else {
            aligned.next() != Some(&unit)
        };
        match segments.last_mut() {
            Some(last) if last.differs == differs => last.text.push_str(unit),
            _ => segments.push(DiffSegment {
                text: unit.to_string(),
                differs,
            }),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, differs: bool) -> DiffSegment {
        DiffSegment {
            text: text.to_string(),
            differs,
        }
    }

    #[test]
    fn diacritics_stay_with_their_base() {
        assert_eq!(group_units("مَلِك"), vec!["مَ", "لِ", "ك"]);
        assert_eq!(group_units(""), Vec::<&str>::new());
        // A leading mark has no base to attach to and stands alone.
        assert_eq!(group_units("\u{064E}ب"), vec!["\u{064E}", "ب"]);
    }

    #[test]
    fn changed_vowel_marks_only_that_unit() {
        assert_eq!(
            compare("مَلِك", "مُلِك"),
            vec![seg("مُ", true), seg("لِك", false)]
        );
        assert_eq!(compare("مَلِك", "مَلِك"), vec![seg("مَلِك", false)]);
    }

    #[test]
    fn dot_markers_are_skipped_for_alignment() {
        assert_eq!(
            compare("ملك", "م.لك"),
            vec![seg("م.لك", false)]
        );
        assert_eq!(
            compare("ملك", "م\u{066B}لا"),
            vec![seg("م\u{066B}ل", false), seg("ا", true)]
        );
    }

    #[test]
    fn longer_variant_marks_the_tail() {
        assert_eq!(compare("مل", "ملك"), vec![seg("مل", false), seg("ك", true)]);
        assert!(compare("ملك", "مل").iter().all(|s| !s.differs));
    }
}
