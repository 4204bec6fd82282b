//! String helpers: similarity ratio and province slugs

/// Edit distance between two strings, counted in characters.
///
/// With `transpositions`, swapping two adjacent characters costs a single
/// edit (optimal string alignment distance).
pub fn edit_distance(first: &str, second: &str, transpositions: bool) -> usize {
    let a: Vec<char> = first.chars().collect();
    let b: Vec<char> = second.chars().collect();

    // (a.len()+1) x (b.len()+1) table, row-major
    let width = b.len() + 1;
    let mut table = vec![0usize; (a.len() + 1) * width];
    for i in 0..=a.len() {
        table[i * width] = i;
    }
    for j in 0..=b.len() {
        table[j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            let mut best = (table[(i - 1) * width + j] + 1)
                .min(table[i * width + j - 1] + 1)
                .min(table[(i - 1) * width + j - 1] + substitution);

            if transpositions
                && i > 1
                && j > 1
                && a[i - 2] == b[j - 1]
                && a[i - 1] == b[j - 2]
            {
                best = best.min(table[(i - 2) * width + j - 2] + 1);
            }

            table[i * width + j] = best;
        }
    }

    table[a.len() * width + b.len()]
}

/// Similarity ratio of two pieces of text: `(lensum - ldist) / lensum`.
///
/// 0.0 means not similar at all, 1.0 means identical. Two empty strings
/// have a ratio of 0.
pub fn levenshtein_ratio(first: &str, second: &str, transpositions: bool) -> f64 {
    let lensum = first.chars().count() + second.chars().count();
    if lensum == 0 {
        return 0.0;
    }

    let ldist = edit_distance(first, second, transpositions);
    (lensum - ldist) as f64 / lensum as f64
}

/// Province name to slug: lowercase, spaces to dashes.
pub fn slugify_province(name: &str) -> String {
    name.replace(' ', "-").to_lowercase()
}

/// Province slug to name: dashes to spaces, title case.
///
/// KwaZulu-Natal keeps its dash and inner capital.
pub fn deslugify_province(slug: &str) -> String {
    if slug == "kwazulu-natal" {
        return "KwaZulu-Natal".to_string();
    }
    title_case(&slug.replace('-', " "))
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
