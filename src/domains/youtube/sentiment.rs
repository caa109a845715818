//! Naive lexicon-based title sentiment.

/// Word polarities in [-1, 1].
const LEXICON: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("brilliant", 0.9),
    ("easy", 0.43),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("fast", 0.2),
    ("free", 0.4),
    ("fun", 0.3),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("incredible", 0.9),
    ("love", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("powerful", 0.3),
    ("success", 0.3),
    ("wonderful", 1.0),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broken", -0.4),
    ("dead", -0.2),
    ("difficult", -0.5),
    ("fail", -0.5),
    ("hard", -0.29),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("mistake", -0.3),
    ("mistakes", -0.3),
    ("sad", -0.5),
    ("scam", -0.8),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const NEGATIONS: &[&str] = &["not", "never", "no", "don't", "isn't", "aren't", "won't"];

/// Polarity of one title in [-1, 1]; 0 when no lexicon word occurs.
///
/// A negation directly before a word flips it and halves its weight.
pub fn title_polarity(title: &str) -> f64 {
    let lowered = title.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();

    let mut scores = Vec::new();
    for (i, word) in words.iter().enumerate() {
        let Some((_, polarity)) = LEXICON.iter().find(|(w, _)| w == word) else {
            continue;
        };
        let negated = i > 0 && NEGATIONS.contains(&words[i - 1]);
        scores.push(if negated { -0.5 * polarity } else { *polarity });
    }

    if scores.is_empty() {
        return 0.0;
    }
    (scores.iter().sum::<f64>() / scores.len() as f64).clamp(-1.0, 1.0)
}

/// Mean polarity over all titles, 0 for an empty set.
pub fn average_polarity<'a>(titles: impl IntoIterator<Item = &'a str>) -> f64 {
    let (sum, count) = titles
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), t| (sum + title_polarity(t), count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
