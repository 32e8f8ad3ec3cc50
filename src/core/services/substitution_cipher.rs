use std::collections::HashMap;

/// Shop vocabulary and its obfuscated spelling. Keeps trade posts from
/// tripping keyword filters while staying readable to people.
pub const SHOP_WORDS: [(&str, &str); 13] = [
    ("سعر", "س3ر"),
    ("تبادل", "تbادل"),
    ("متوفر", "مت9فر"),
    ("مطلوب", "مطل9ب"),
    ("عرض", "3رض"),
    ("عروضكم", "3ر9ضكم"),
    ("عرضك", "3رضك"),
    ("رصيد", "ر9يد"),
    ("طلب", "طلb"),
    ("رصيدك", "ر9يدك"),
    ("رصيدكم", "ر9يدكم"),
    ("طلبات", "طلbات"),
    ("خاص", "خا9"),
];

/// Whole-word substitution over a fixed dictionary.
///
/// Text is split on whitespace and rejoined with single spaces. Only tokens
/// that equal a dictionary key exactly are replaced; everything else passes
/// through untouched.
pub struct SubstitutionCipher {
    forward: HashMap<&'static str, &'static str>,
    inverse: HashMap<&'static str, &'static str>,
}

impl SubstitutionCipher {
    pub fn new(words: &[(&'static str, &'static str)]) -> Self {
        Self {
            forward: words.iter().copied().collect(),
            inverse: words.iter().map(|&(plain, coded)| (coded, plain)).collect(),
        }
    }

    pub fn encrypt(&self, text: &str) -> String {
        substitute(&self.forward, text)
    }

    pub fn decrypt(&self, text: &str) -> String {
        substitute(&self.inverse, text)
    }
}

impl Default for SubstitutionCipher {
    fn default() -> Self {
        Self::new(&SHOP_WORDS)
    }
}

fn substitute(map: &HashMap<&'static str, &'static str>, text: &str) -> String {
    text.split_whitespace()
        .map(|token| map.get(token).copied().unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}
