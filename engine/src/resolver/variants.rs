// Casing candidates and synthetic codes for name resolution
use std::collections::HashSet;

pub fn ascii_letter_count(input: &str) -> usize {
    input.chars().filter(char::is_ascii_alphabetic).count()
}

/// Every string obtained by independently upper/lower-casing each ASCII letter of the input.
///
/// Generation order counts a bitmask upward: mask 0 is all lowercase and bit `i`
/// uppercases the `i`-th ASCII letter. Non-ASCII characters (Hangul, digits,
/// punctuation) are copied unchanged. Yields exactly `2^k` distinct strings for
/// `k` letters, and a single unchanged string when `k == 0`.
#[derive(Debug, Clone)]
pub struct CaseVariants {
    chars: Vec<char>,
    letter_positions: Vec<usize>,
    next_mask: u64,
    end: u64,
}

impl CaseVariants {
    /// `None` when the input has 64 or more ASCII letters.
    pub fn new(input: &str) -> Option<Self> {
        let chars: Vec<char> = input.chars().collect();
        let letter_positions: Vec<usize> = chars
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_ascii_alphabetic())
            .map(|(i, _)| i)
            .collect();
        if letter_positions.len() >= 64 {
            return None;
        }
        Some(CaseVariants {
            chars,
            end: 1u64 << letter_positions.len(),
            letter_positions,
            next_mask: 0,
        })
    }

    #[cfg(test)]
    fn total(&self) -> u64 {
        self.end
    }
}

impl Iterator for CaseVariants {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next_mask >= self.end {
            return None;
        }
        let mask = self.next_mask;
        self.next_mask += 1;

        let mut chars = self.chars.clone();
        for (bit, &pos) in self.letter_positions.iter().enumerate() {
            chars[pos] = if mask & (1 << bit) != 0 {
                chars[pos].to_ascii_uppercase()
            } else {
                chars[pos].to_ascii_lowercase()
            };
        }
        Some(chars.into_iter().collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next_mask).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

pub fn case_variants(input: &str) -> Option<CaseVariants> {
    CaseVariants::new(input)
}

/// Literal, lowercase, UPPERCASE and Title Case, in that order, duplicates removed.
pub fn heuristic_casings(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(4);
    for candidate in [
        input.to_string(),
        input.to_ascii_lowercase(),
        input.to_ascii_uppercase(),
        title_case(input),
    ] {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if c.is_ascii_alphabetic() {
            out.push(if at_word_start { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() });
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = false;
        }
    }
    out
}

/// Attempt order used at add time: heuristic casings first, then the full
/// enumeration when the input has at most `max_enumerated_letters` ASCII letters.
pub fn candidate_plan(input: &str, max_enumerated_letters: u32) -> Vec<String> {
    let mut plan = heuristic_casings(input);
    if ascii_letter_count(input) <= max_enumerated_letters as usize {
        if let Some(variants) = CaseVariants::new(input) {
            let mut seen: HashSet<String> = plan.iter().cloned().collect();
            for variant in variants {
                if seen.insert(variant.clone()) {
                    plan.push(variant);
                }
            }
        }
    }
    plan
}

/// Placeholder code for names missing from the reference table: the sum of the
/// Unicode scalar values, in decimal, right-padded with '0' and cut to 6 characters.
/// Deterministic but not unique; distinct names can share a code.
pub fn synthetic_code(name: &str) -> String {
    let sum: u64 = name.chars().map(|c| u64::from(u32::from(c))).sum();
    let mut code = sum.to_string();
    while code.len() < 6 {
        code.push('0');
    }
    code.truncate(6);
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_letters_single_unchanged_candidate() {
        for input in ["삼성전자", "005930", "&-1", "  "] {
            let variants: Vec<String> = case_variants(input).unwrap().collect();
            assert_eq!(variants, vec![input.to_string()], "input {:?}", input);
        }
    }

    #[test]
    fn test_variant_count_is_two_to_the_k() {
        for input in ["a", "Ab", "sk하이닉스", "naver", "삼성SDI", "abcdefgh", "x1y2z3"] {
            let k = ascii_letter_count(input);
            let variants: Vec<String> = case_variants(input).unwrap().collect();
            assert_eq!(variants.len(), 1 << k, "input {:?}", input);
            let unique: HashSet<&String> = variants.iter().collect();
            assert_eq!(unique.len(), variants.len());
            for v in &variants {
                assert!(v.eq_ignore_ascii_case(input));
                assert_eq!(v.chars().count(), input.chars().count());
                for (a, b) in v.chars().zip(input.chars()) {
                    if !b.is_ascii_alphabetic() {
                        assert_eq!(a, b);
                    }
                }
            }
        }
    }

    #[test]
    fn test_generation_order_starts_all_lowercase() {
        let variants: Vec<String> = case_variants("Ab1").unwrap().collect();
        assert_eq!(variants, vec!["ab1", "Ab1", "aB1", "AB1"]);
    }

    #[test]
    fn test_too_many_letters_refused() {
        assert!(case_variants(&"a".repeat(64)).is_none());
        assert_eq!(case_variants(&"a".repeat(63)).unwrap().total(), 1u64 << 63);
    }

    #[test]
    fn test_heuristics_deduplicate() {
        assert_eq!(heuristic_casings("naver"), vec!["naver", "NAVER", "Naver"]);
        assert_eq!(heuristic_casings("삼성"), vec!["삼성"]);
        assert_eq!(heuristic_casings("sk hynix"), vec!["sk hynix", "SK HYNIX", "Sk Hynix"]);
    }

    #[test]
    fn test_candidate_plan_covers_all_variants_once() {
        let plan = candidate_plan("samsung", 8);
        assert_eq!(plan.len(), 128);
        assert_eq!(&plan[..3], &["samsung", "SAMSUNG", "Samsung"]);
        let unique: HashSet<&String> = plan.iter().collect();
        assert_eq!(unique.len(), 128);
    }

    #[test]
    fn test_candidate_plan_above_threshold_is_heuristics_only() {
        let plan = candidate_plan("samsung", 6);
        assert_eq!(plan, vec!["samsung", "SAMSUNG", "Samsung"]);
    }

    #[test]
    fn test_synthetic_code_deterministic_six_chars() {
        assert_eq!(synthetic_code("kia"), "309000"); // 107 + 105 + 97
        assert_eq!(synthetic_code("kia"), synthetic_code("kia"));
        let hangul = synthetic_code("삼성전자");
        assert_eq!(hangul.len(), 6);
        assert_eq!(hangul, synthetic_code("삼성전자"));
        assert_eq!(synthetic_code(""), "000000");
    }

    #[test]
    fn test_synthetic_code_truncates_long_sums() {
        // 1,000 Hangul syllables sum to well over six digits.
        let long = "가".repeat(1000);
        let expected: String = (0xAC00u64 * 1000).to_string().chars().take(6).collect();
        assert_eq!(synthetic_code(&long), expected);
    }
}
